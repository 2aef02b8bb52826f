/// Perspective projection and viewport mapping
use nalgebra::Point2;
use std::f32::consts::PI;

use crate::error::{Error, Result};
use crate::geometry::Triangle;
use crate::math::{self, Mat4, Vec4};
use crate::transform::transform_triangle;

fn validate(fov: f32, aspect: f32, near: f32, far: f32) -> Result<()> {
    let bad = |reason: String| Err(Error::DegenerateProjectionParameters(reason));

    if !(fov.is_finite() && fov > 0.0 && fov < PI) {
        return bad(format!("field of view {} rad is outside (0, pi)", fov));
    }
    let tan = (fov * 0.5).tan();
    if !tan.is_finite() || tan.abs() < math::EPSILON {
        return bad(format!("tan(fov / 2) is singular for fov {} rad", fov));
    }
    if !(aspect.is_finite() && aspect > 0.0) {
        return bad(format!("aspect ratio {} must be positive", aspect));
    }
    if !(near.is_finite() && near > 0.0) {
        return bad(format!("near plane {} must be positive", near));
    }
    if !far.is_finite() || far - near < math::EPSILON {
        return bad(format!("far plane {} must lie beyond near plane {}", far, near));
    }
    Ok(())
}

/// Perspective projection for a camera at the origin looking down +z.
///
/// `fov` is the vertical field of view in radians and `aspect` is
/// height / width; it scales x so square geometry stays square on a
/// non-square viewport. After multiplying a camera-space point, w holds the
/// point's camera-space z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    matrix: Mat4,
}

impl Projection {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        validate(fov, aspect, near, far)?;

        let f = 1.0 / (fov * 0.5).tan();
        let q = far / (far - near);
        #[rustfmt::skip]
        let matrix = Mat4::new(
            aspect * f, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, q, -near * q,
            0.0, 0.0, 1.0, 0.0,
        );

        Ok(Self {
            fov,
            aspect,
            near,
            far,
            matrix,
        })
    }

    /// Same projection for a resized viewport
    pub fn with_aspect(&self, aspect: f32) -> Result<Self> {
        Self::new(self.fov, aspect, self.near, self.far)
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Project one camera-space point to normalized device coordinates.
    ///
    /// Points on or behind the camera plane have no image and fail with
    /// `DivideByZero`.
    pub fn to_ndc(&self, camera_space: &Vec4) -> Result<Vec4> {
        clip_to_ndc(&math::mul_vec(&self.matrix, camera_space))
    }

    /// Project a camera-space triangle all the way to pixel coordinates.
    ///
    /// Fails with `DivideByZero` when any vertex lands on or behind the
    /// camera plane.
    pub fn project_triangle(
        &self,
        triangle: &Triangle,
        viewport: &Viewport,
    ) -> Result<[Point2<f32>; 3]> {
        let projected = transform_triangle(triangle, &self.matrix);
        let [a, b, c] = &projected.vertices;
        let ndc = [clip_to_ndc(a)?, clip_to_ndc(b)?, clip_to_ndc(c)?];

        let screen = ndc.map(|v| viewport.to_screen(&v));
        if screen.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(Error::DivideByZero);
        }
        Ok(screen)
    }
}

fn clip_to_ndc(clip: &Vec4) -> Result<Vec4> {
    // w carries camera z; anything not in front of the camera would mirror
    if clip.w.is_nan() || clip.w <= math::EPSILON {
        return Err(Error::DivideByZero);
    }
    math::perspective_divide(clip)
}

/// OpenGL-style perspective matrix for a right-handed camera looking down -z.
///
/// Unlike [`Projection`], `aspect` here is width / height. Depth maps to
/// [-1, 1] and w holds the negated view-space z.
pub fn gl_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4> {
    validate(fov, aspect, near, far)?;

    let f = 1.0 / (fov * 0.5).tan();
    let q = near - far;
    #[rustfmt::skip]
    let matrix = Mat4::new(
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, (far + near) / q, 2.0 * far * near / q,
        0.0, 0.0, -1.0, 0.0,
    );
    Ok(matrix)
}

/// Maps normalized device coordinates to pixels.
///
/// NDC x and y in [-1, 1] are shifted to [0, 2] and scaled by half the
/// viewport size. The pixel origin is the top-left corner of a y-down
/// display surface. Without `flip_y`, NDC +y maps to larger pixel rows
/// (down the screen); with `flip_y`, NDC +y points up the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub flip_y: bool,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            flip_y: false,
        }
    }

    pub fn with_flip_y(self, flip_y: bool) -> Self {
        Self { flip_y, ..self }
    }

    /// height / width, the aspect convention of [`Projection`]
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width.max(1) as f32
    }

    pub fn to_screen(&self, ndc: &Vec4) -> Point2<f32> {
        let half_w = 0.5 * self.width as f32;
        let half_h = 0.5 * self.height as f32;
        let y = if self.flip_y { 1.0 - ndc.y } else { ndc.y + 1.0 };
        Point2::new((ndc.x + 1.0) * half_w, y * half_h)
    }

    /// Inverse of [`Viewport::to_screen`]
    pub fn to_ndc(&self, screen: &Point2<f32>) -> Point2<f32> {
        let half_w = 0.5 * self.width as f32;
        let half_h = 0.5 * self.height as f32;
        let y = screen.y / half_h;
        let y = if self.flip_y { 1.0 - y } else { y - 1.0 };
        Point2::new(screen.x / half_w - 1.0, y)
    }

    pub fn contains(&self, p: &Point2<f32>) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width as f32 && p.y <= self.height as f32
    }
}
