//! Backface culling and flat shading
//!
//! One face normal and one directional light per triangle; no interpolation.
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{Color, Triangle};
use crate::math::{self, Vec4};

/// Which vertex order marks the front of a face, as seen from the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    #[default]
    Clockwise,
    CounterClockwise,
}

/// Outward unit normal of a triangle under the given front-face winding.
///
/// With `line1 = p2 - p1` and `line2 = p3 - p1`, counter-clockwise faces use
/// `cross(line1, line2)` and clockwise faces the opposite orientation.
pub fn face_normal(triangle: &Triangle, winding: Winding) -> Result<Vec4> {
    let [p1, p2, p3] = &triangle.vertices;
    let line1 = math::sub(p2, p1);
    let line2 = math::sub(p3, p1);

    let normal = match winding {
        Winding::Clockwise => math::cross(&line2, &line1),
        Winding::CounterClockwise => math::cross(&line1, &line2),
    };
    math::normalize(&normal)
}

/// Alignment of the face normal with the ray from the camera to the face.
/// Negative means the face points toward the camera.
pub fn visibility(normal: &Vec4, p1: &Vec4, camera: &Vec4) -> f32 {
    math::dot(normal, &math::sub(p1, camera))
}

pub fn is_front_facing(normal: &Vec4, p1: &Vec4, camera: &Vec4) -> bool {
    visibility(normal, p1, camera) < 0.0
}

/// Single directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    direction: Vec4,
    base_color: Color,
}

impl Lighting {
    /// `direction` points from the surface toward the light; it is normalized
    /// here so the per-triangle dot product is a cosine.
    pub fn new(direction: Vec4, base_color: Color) -> Result<Self> {
        let mut direction = math::normalize(&direction)?;
        direction.w = 0.0;
        Ok(Self {
            direction,
            base_color,
        })
    }

    pub fn direction(&self) -> &Vec4 {
        &self.direction
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    /// Lambert term in [0, 1]
    pub fn intensity(&self, normal: &Vec4) -> f32 {
        let dp = math::dot(normal, &self.direction);
        if dp.is_finite() {
            dp.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn shade_color(&self, normal: &Vec4) -> Color {
        self.base_color.scaled(self.intensity(normal))
    }
}

impl Default for Lighting {
    /// White light shining from behind the camera along -z
    fn default() -> Self {
        Self {
            direction: math::direction(0.0, 0.0, -1.0),
            base_color: Color::WHITE,
        }
    }
}

/// Cull a camera-space triangle and shade it if it survives.
///
/// Returns `Ok(None)` for back faces. A zero-area triangle fails with
/// `DegenerateVector`.
pub fn cull_and_shade(
    triangle: &Triangle,
    camera: &Vec4,
    lighting: &Lighting,
    winding: Winding,
) -> Result<Option<Triangle>> {
    let normal = face_normal(triangle, winding)?;
    if !is_front_facing(&normal, triangle.p1(), camera) {
        return Ok(None);
    }
    Ok(Some(triangle.with_color(lighting.shade_color(&normal))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::math::{direction, point};
    use approx::assert_relative_eq;

    fn facing_camera() -> Triangle {
        Triangle::new(
            point(0.0, 0.0, 5.0),
            point(1.0, 0.0, 5.0),
            point(0.0, 1.0, 5.0),
        )
    }

    fn swapped(t: &Triangle) -> Triangle {
        Triangle::new(*t.p1(), *t.p3(), *t.p2())
    }

    #[test]
    fn test_clockwise_normal_points_at_camera() {
        let n = face_normal(&facing_camera(), Winding::Clockwise).unwrap();
        assert_relative_eq!(n, direction(0.0, 0.0, -1.0), epsilon = 1e-6);

        let n = face_normal(&facing_camera(), Winding::CounterClockwise).unwrap();
        assert_relative_eq!(n, direction(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_backface_sign() {
        let camera = point(0.0, 0.0, 0.0);
        let front = facing_camera();
        let n = face_normal(&front, Winding::Clockwise).unwrap();
        assert!(visibility(&n, front.p1(), &camera) < 0.0);

        let back = swapped(&front);
        let n = face_normal(&back, Winding::Clockwise).unwrap();
        assert!(visibility(&n, back.p1(), &camera) >= 0.0);
        assert!(!is_front_facing(&n, back.p1(), &camera));
    }

    #[test]
    fn test_cull_and_shade() {
        let camera = point(0.0, 0.0, 0.0);
        let lighting = Lighting::default();

        let shaded = cull_and_shade(&facing_camera(), &camera, &lighting, Winding::Clockwise)
            .unwrap()
            .expect("front face survives");
        assert_eq!(shaded.color, Some(Color::WHITE));
        assert_eq!(shaded.vertices, facing_camera().vertices);

        let culled =
            cull_and_shade(&swapped(&facing_camera()), &camera, &lighting, Winding::Clockwise)
                .unwrap();
        assert!(culled.is_none());

        // The same vertex order is a front face under the other convention
        let ccw = cull_and_shade(
            &swapped(&facing_camera()),
            &camera,
            &lighting,
            Winding::CounterClockwise,
        )
        .unwrap();
        assert!(ccw.is_some());
    }

    #[test]
    fn test_flat_shading_extremes() {
        let lighting = Lighting::new(direction(0.0, 0.0, -3.0), Color::WHITE).unwrap();
        assert_eq!(lighting.shade_color(&direction(0.0, 0.0, -1.0)), Color::gray(255));
        assert_eq!(lighting.shade_color(&direction(1.0, 0.0, 0.0)), Color::gray(0));
        // Facing away from the light clamps to zero rather than going negative
        assert_eq!(lighting.intensity(&direction(0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn test_degenerate_triangle_and_light() {
        let flat = Triangle::new(
            point(0.0, 0.0, 5.0),
            point(1.0, 1.0, 5.0),
            point(2.0, 2.0, 5.0),
        );
        let camera = point(0.0, 0.0, 0.0);
        let result = cull_and_shade(&flat, &camera, &Lighting::default(), Winding::Clockwise);
        assert!(matches!(result, Err(Error::DegenerateVector)));

        assert!(Lighting::new(direction(0.0, 0.0, 0.0), Color::WHITE).is_err());
    }
}
