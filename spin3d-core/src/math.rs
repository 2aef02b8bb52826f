//! Linear algebra kernel
//!
//! Homogeneous vectors and 4x4 matrices backed by nalgebra. Every matrix in
//! the crate follows one convention: column vectors with the matrix on the
//! left, so `v' = M * v` and a composite transform reads right-to-left
//! (`M = M_last * ... * M_first`).
//!
//! The 3D operations (`add`, `sub`, `scale`, `div`, `dot`, `cross`,
//! `length`, `normalize`) act on x, y and z only. The result keeps the
//! w component of the left operand.
use nalgebra::{Matrix4, Vector4};

use crate::error::{Error, Result};

pub type Vec4 = Vector4<f32>;
pub type Mat4 = Matrix4<f32>;

/// Magnitudes below this are treated as zero by `div` and `normalize`
pub const EPSILON: f32 = 1e-6;

/// A position (w = 1), affected by translation and projection
pub fn point(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 1.0)
}

/// A pure direction (w = 0), unaffected by translation
pub fn direction(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 0.0)
}

pub fn add(a: &Vec4, b: &Vec4) -> Vec4 {
    Vec4::new(a.x + b.x, a.y + b.y, a.z + b.z, a.w)
}

pub fn sub(a: &Vec4, b: &Vec4) -> Vec4 {
    Vec4::new(a.x - b.x, a.y - b.y, a.z - b.z, a.w)
}

pub fn scale(v: &Vec4, k: f32) -> Vec4 {
    Vec4::new(v.x * k, v.y * k, v.z * k, v.w)
}

/// Divide x, y and z by `k`
pub fn div(v: &Vec4, k: f32) -> Result<Vec4> {
    if !k.is_finite() || k.abs() < EPSILON {
        return Err(Error::DivideByZero);
    }
    Ok(Vec4::new(v.x / k, v.y / k, v.z / k, v.w))
}

pub fn dot(a: &Vec4, b: &Vec4) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Right-handed cross product; the result is a direction (w = 0)
pub fn cross(a: &Vec4, b: &Vec4) -> Vec4 {
    direction(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

pub fn length(v: &Vec4) -> f32 {
    dot(v, v).sqrt()
}

pub fn normalize(v: &Vec4) -> Result<Vec4> {
    let len = length(v);
    if !len.is_finite() || len < EPSILON {
        return Err(Error::DegenerateVector);
    }
    Ok(Vec4::new(v.x / len, v.y / len, v.z / len, v.w))
}

pub fn mul_vec(m: &Mat4, v: &Vec4) -> Vec4 {
    m * v
}

/// `a * b`: applies `b` first, then `a`
pub fn mul_mat(a: &Mat4, b: &Mat4) -> Mat4 {
    a * b
}

/// Divide x, y and z by w. The result is a point with w = 1.
pub fn perspective_divide(v: &Vec4) -> Result<Vec4> {
    let mut divided = div(v, v.w)?;
    divided.w = 1.0;
    if !is_finite(&divided) {
        return Err(Error::DivideByZero);
    }
    Ok(divided)
}

pub fn is_finite(v: &Vec4) -> bool {
    v.iter().all(|c| c.is_finite())
}
