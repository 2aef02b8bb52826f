/// Matrices and vertex data for hosts that rasterize on the GPU
///
/// A GPU host keeps its own depth buffer, so it needs neither culling nor
/// sorting from us: only the model and combined model-view-projection
/// matrices for the current angle, plus an interleaved vertex buffer.
use crate::error::Result;
use crate::geometry::Mesh;
use crate::math::{direction, point, Mat4, Vec4};
use crate::projection::gl_perspective;
use crate::shading::{face_normal, Winding};
use crate::transform::{look_at, rotation_x, rotation_z};

/// Floats per vertex in [`vertex_buffer`]: position then normal
pub const VERTEX_STRIDE: usize = 6;

/// Look-at camera for the GPU path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpuCamera {
    pub eye: Vec4,
    pub target: Vec4,
    pub up: Vec4,
    pub fov_degrees: f32,
    /// width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl GpuCamera {
    /// Camera `distance` units up the +z axis looking at the origin
    pub fn looking_at_origin(distance: f32, aspect: f32) -> Self {
        Self {
            eye: point(0.0, 0.0, distance),
            target: point(0.0, 0.0, 0.0),
            up: direction(0.0, 1.0, 0.0),
            fov_degrees: 60.0,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Uniforms for one GPU frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpuFrame {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub mvp: Mat4,
}

impl GpuFrame {
    pub fn new(angle: f32, camera: &GpuCamera) -> Result<Self> {
        let model = rotation_z(angle) * rotation_x(angle * 0.5);
        let view = look_at(&camera.eye, &camera.target, &camera.up)?;
        let projection = gl_perspective(
            camera.fov_degrees.to_radians(),
            camera.aspect,
            camera.near,
            camera.far,
        )?;
        Ok(Self {
            model,
            view,
            projection,
            mvp: projection * view * model,
        })
    }
}

/// Column-major layout expected by GLSL/WGSL `mat4` uniforms
pub fn to_column_major(m: &Mat4) -> [f32; 16] {
    let mut out = [0.0; 16];
    out.copy_from_slice(m.as_slice());
    out
}

/// Interleaved `[px, py, pz, nx, ny, nz]` per vertex, three vertices per
/// triangle, each carrying its face's flat normal.
pub fn vertex_buffer(mesh: &Mesh, winding: Winding) -> Result<Vec<f32>> {
    let mut buffer = Vec::with_capacity(mesh.len() * 3 * VERTEX_STRIDE);
    for triangle in mesh {
        let normal = face_normal(triangle, winding)?;
        for v in &triangle.vertices {
            buffer.extend_from_slice(&[v.x, v.y, v.z, normal.x, normal.y, normal.z]);
        }
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_column_major_layout() {
        let m = crate::transform::translation(1.0, 2.0, 3.0);
        let flat = to_column_major(&m);
        assert_eq!(&flat[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(flat[15], 1.0);
        assert_eq!(flat[3], 0.0);
    }

    #[test]
    fn test_frame_at_zero_angle() {
        let camera = GpuCamera::looking_at_origin(4.0, 1.5);
        let frame = GpuFrame::new(0.0, &camera).unwrap();
        assert_relative_eq!(frame.model, Mat4::identity(), epsilon = 1e-6);

        // The origin sits 4 units in front of the camera: clip w = 4
        let clip = frame.mvp * point(0.0, 0.0, 0.0);
        assert_relative_eq!(clip.w, 4.0, epsilon = 1e-5);
        assert_relative_eq!(clip.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_camera_fails() {
        let mut camera = GpuCamera::looking_at_origin(4.0, 1.5);
        camera.eye = camera.target;
        assert!(GpuFrame::new(0.0, &camera).is_err());
    }

    #[test]
    fn test_vertex_buffer_layout() {
        let cube = Mesh::cube(2.0);
        let buffer = vertex_buffer(&cube, Winding::Clockwise).unwrap();
        assert_eq!(buffer.len(), 12 * 3 * VERTEX_STRIDE);

        // Every flat normal points away from the cube's center
        for vertex in buffer.chunks(VERTEX_STRIDE) {
            let outward = vertex[0] * vertex[3] + vertex[1] * vertex[4] + vertex[2] * vertex[5];
            assert!(outward > 0.0);
        }
    }
}
