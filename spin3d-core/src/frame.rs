//! Frame orchestration
//!
//! One tick runs the whole pipeline for the current angle and distance:
//! model transform, backface cull and flat shade, project to pixels, then
//! sort back-to-front. The result is a draw list the display fills in order.
use log::{debug, trace};
use nalgebra::Point2;

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::geometry::{Color, Mesh, Triangle};
use crate::math::{point, Mat4, Vec4};
use crate::projection::{Projection, Viewport};
use crate::shading::{cull_and_shade, Lighting, Winding};
use crate::sort::{avg_z, depth_sort};
use crate::transform::{model_matrix, transform_triangle};

/// One filled polygon for the display surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub points: [Point2<f32>; 3],
    pub color: Color,
    /// Mean camera-space z, the painter's sort key
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub submitted: usize,
    pub culled: usize,
    /// Triangles skipped because of a degenerate normal or a zero w
    pub dropped: usize,
    pub drawn: usize,
}

/// Polygons of one frame, ordered back to front
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    pub stats: FrameStats,
}

impl DrawList {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Frames are still produced but the angle holds still
    Idle,
    Animating,
}

/// Drives the pipeline for a mesh and owns the animation state between
/// ticks.
#[derive(Debug, Clone)]
pub struct FrameOrchestrator {
    mesh: Mesh,
    projection: Projection,
    viewport: Viewport,
    lighting: Lighting,
    winding: Winding,
    camera: Vec4,
    state: AnimationState,
    angle: f32,
    rotation_step: f32,
    distance: f32,
    min_distance: f32,
}

impl FrameOrchestrator {
    pub fn new(mesh: Mesh, config: &RenderConfig, width: u32, height: u32) -> Result<Self> {
        let viewport = Viewport::new(width, height).with_flip_y(config.flip_y);
        let projection = Projection::new(config.fov, viewport.aspect(), config.near, config.far)?;

        if !(config.min_distance.is_finite() && config.min_distance > config.near) {
            return Err(Error::DegenerateProjectionParameters(format!(
                "minimum distance {} must lie beyond the near plane {}",
                config.min_distance, config.near
            )));
        }

        let mut orchestrator = Self {
            mesh,
            projection,
            viewport,
            lighting: config.lighting()?,
            winding: config.winding,
            camera: point(0.0, 0.0, 0.0),
            state: AnimationState::Animating,
            angle: 0.0,
            rotation_step: 0.0,
            distance: config.min_distance,
            min_distance: config.min_distance,
        };
        orchestrator.set_rotation_step(config.rotation_step);
        orchestrator.set_distance(config.distance);
        Ok(orchestrator)
    }

    /// Advance the angle when animating, then render the frame
    pub fn tick(&mut self) -> DrawList {
        if self.state == AnimationState::Animating {
            self.angle += self.rotation_step;
        }
        self.render()
    }

    /// Render the current state without advancing it
    pub fn render(&self) -> DrawList {
        self.render_with(&self.model_matrix())
    }

    /// Run the pipeline with an explicit model-to-camera transform in place
    /// of the one derived from the angle and distance.
    pub fn render_with(&self, model: &Mat4) -> DrawList {
        let mut stats = FrameStats {
            submitted: self.mesh.len(),
            ..FrameStats::default()
        };
        let mut commands = Vec::with_capacity(self.mesh.len());

        for (index, triangle) in self.mesh.iter().enumerate() {
            match self.render_triangle(triangle, model) {
                Ok(Some(command)) => commands.push(command),
                Ok(None) => stats.culled += 1,
                Err(e) => {
                    debug!("dropping triangle {}: {}", index, e);
                    stats.dropped += 1;
                }
            }
        }

        depth_sort(&mut commands);
        stats.drawn = commands.len();
        trace!(
            "frame at angle {:.3}: {} drawn, {} culled, {} dropped",
            self.angle,
            stats.drawn,
            stats.culled,
            stats.dropped
        );

        DrawList { commands, stats }
    }

    fn render_triangle(&self, triangle: &Triangle, model: &Mat4) -> Result<Option<DrawCommand>> {
        let camera_space = transform_triangle(triangle, model);
        let shaded =
            match cull_and_shade(&camera_space, &self.camera, &self.lighting, self.winding)? {
                Some(shaded) => shaded,
                None => return Ok(None),
            };

        let points = self.projection.project_triangle(&shaded, &self.viewport)?;
        Ok(Some(DrawCommand {
            points,
            color: shaded.color.unwrap_or(Color::BLACK),
            depth: avg_z(&shaded),
        }))
    }

    pub fn model_matrix(&self) -> Mat4 {
        model_matrix(self.angle, self.distance)
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn winding(&self) -> Winding {
        self.winding
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn pause(&mut self) {
        self.state = AnimationState::Idle;
    }

    pub fn resume(&mut self) {
        self.state = AnimationState::Animating;
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            AnimationState::Idle => AnimationState::Animating,
            AnimationState::Animating => AnimationState::Idle,
        };
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        if angle.is_finite() {
            self.angle = angle;
        }
    }

    pub fn rotation_step(&self) -> f32 {
        self.rotation_step
    }

    /// Negative steps clamp to zero
    pub fn set_rotation_step(&mut self, step: f32) {
        self.rotation_step = if step.is_finite() { step.max(0.0) } else { 0.0 };
    }

    pub fn adjust_rotation_step(&mut self, delta: f32) {
        self.set_rotation_step(self.rotation_step + delta);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Distances closer than the configured minimum clamp to it
    pub fn set_distance(&mut self, distance: f32) {
        if distance.is_finite() {
            self.distance = distance.max(self.min_distance);
        }
    }

    pub fn adjust_distance(&mut self, delta: f32) {
        self.set_distance(self.distance + delta);
    }

    /// Follow a resized display surface
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let viewport = Viewport::new(width, height).with_flip_y(self.viewport.flip_y);
        self.projection = self.projection.with_aspect(viewport.aspect())?;
        self.viewport = viewport;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orchestrator(mesh: Mesh) -> FrameOrchestrator {
        FrameOrchestrator::new(mesh, &RenderConfig::default(), 800, 600).unwrap()
    }

    #[test]
    fn test_tick_advances_only_when_animating() {
        let mut frames = orchestrator(Mesh::cube(1.0));
        frames.set_rotation_step(0.25);
        frames.tick();
        frames.tick();
        assert!((frames.angle() - 0.5).abs() < 1e-6);

        frames.pause();
        assert_eq!(frames.state(), AnimationState::Idle);
        frames.tick();
        assert!((frames.angle() - 0.5).abs() < 1e-6);

        frames.toggle_pause();
        assert_eq!(frames.state(), AnimationState::Animating);
        frames.tick();
        assert!((frames.angle() - 0.75).abs() < 1e-6);

        frames.pause();
        frames.set_angle(2.0);
        frames.set_angle(f32::INFINITY);
        assert_eq!(frames.angle(), 2.0);
        frames.resume();
        assert_eq!(frames.state(), AnimationState::Animating);
        frames.tick();
        assert!((frames.angle() - 2.25).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_step_and_distance_clamps() {
        let mut frames = orchestrator(Mesh::cube(1.0));
        frames.set_rotation_step(0.01);
        frames.adjust_rotation_step(-0.05);
        assert_eq!(frames.rotation_step(), 0.0);

        frames.set_distance(3.0);
        frames.adjust_distance(-10.0);
        assert_eq!(frames.distance(), RenderConfig::default().min_distance);
        frames.set_distance(f32::NAN);
        assert_eq!(frames.distance(), RenderConfig::default().min_distance);
    }

    #[test]
    fn test_rejects_min_distance_inside_near_plane() {
        let config = RenderConfig {
            near: 1.0,
            min_distance: 0.5,
            ..RenderConfig::default()
        };
        let result = FrameOrchestrator::new(Mesh::cube(1.0), &config, 80, 24);
        assert!(matches!(
            result,
            Err(Error::DegenerateProjectionParameters(_))
        ));
    }

    #[test]
    fn test_cube_shows_at_most_three_faces() {
        let mut frames = orchestrator(Mesh::cube(2.0));
        for _ in 0..40 {
            let list = frames.tick();
            assert!(list.len() <= 6, "{} triangles drawn", list.len());
            assert!(!list.is_empty());
            assert_eq!(
                list.stats.drawn + list.stats.culled + list.stats.dropped,
                list.stats.submitted
            );
            assert!(list.commands.windows(2).all(|w| w[0].depth >= w[1].depth));
        }
    }

    #[test]
    fn test_front_face_of_unrotated_cube() {
        let frames = orchestrator(Mesh::cube(2.0));
        let list = frames.render();
        // Only the -z face points back at the camera
        assert_eq!(list.len(), 2);
        for command in list.iter() {
            assert_eq!(command.color, Color::WHITE);
            assert!((command.depth - 9.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_triangle_is_dropped_not_fatal() {
        let good = Triangle::new(
            point(0.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            point(0.0, 1.0, 0.0),
        );
        let sliver = Triangle::new(
            point(0.0, 0.0, 0.0),
            point(1.0, 1.0, 0.0),
            point(2.0, 2.0, 0.0),
        );
        let frames = orchestrator(Mesh::new(vec![sliver, good]));
        let list = frames.render();
        assert_eq!(list.stats.dropped, 1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_triangle_on_camera_plane_is_dropped() {
        let config = RenderConfig {
            distance: 0.5,
            min_distance: 0.2,
            ..RenderConfig::default()
        };
        // Pushed 0.5 along +z, the first vertex lands exactly on z = 0 while
        // the face still points at the camera
        let tri = Triangle::new(
            point(0.0, -1.0, -0.5),
            point(1.0, 0.0, 0.5),
            point(0.0, 1.0, 0.5),
        );
        let frames = FrameOrchestrator::new(Mesh::new(vec![tri]), &config, 100, 100).unwrap();
        let list = frames.render();
        assert!(list.is_empty());
        assert_eq!(list.stats.culled, 0);
        assert_eq!(list.stats.dropped, 1);
    }

    #[test]
    fn test_triangle_reaching_behind_camera_is_dropped() {
        let mesh = crate::obj::parse_obj("v 0 0 -1\nv 1 0 5\nv 0 1 5\nf 1 3 2\n").unwrap();
        let frames = orchestrator(mesh);
        let list = frames.render_with(&Mat4::identity());
        assert!(list.is_empty());
        assert_eq!(list.stats.culled, 0);
        assert_eq!(list.stats.dropped, 1);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut frames = orchestrator(Mesh::cube(1.0));
        frames.resize(200, 100).unwrap();
        assert_eq!(frames.viewport().width, 200);
        assert!((frames.projection().aspect() - 0.5).abs() < 1e-6);
        assert!(frames.resize(200, 0).is_err());
    }
}
