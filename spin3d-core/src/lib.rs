/// spin3d Core Library - software 3D pipeline for a spinning mesh
///
/// This library turns a triangle mesh into an ordered list of flat-shaded 2D
/// polygons: transform, backface cull, light, project, and painter's sort.
/// Display surfaces, input and windowing live in the front-end crates.

pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod gpu;
pub mod math;
pub mod obj;
pub mod projection;
pub mod shading;
pub mod sort;
pub mod transform;

// Re-export commonly used types
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use frame::{AnimationState, DrawCommand, DrawList, FrameOrchestrator, FrameStats};
pub use geometry::{Color, Mesh, Triangle};
pub use math::{Mat4, Vec4};
pub use projection::{Projection, Viewport};
pub use shading::{Lighting, Winding};
