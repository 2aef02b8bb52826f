/// Matrix factory and the per-vertex transform stage
///
/// All matrices are laid out for column vectors (`v' = M * v`).
use crate::error::Result;
use crate::geometry::Triangle;
use crate::math::{self, Mat4, Vec4};

/// Rotation about the X axis (radians, right-hand rule)
#[rustfmt::skip]
pub fn rotation_x(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, c, -s, 0.0,
        0.0, s, c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation about the Y axis (radians, right-hand rule)
#[rustfmt::skip]
pub fn rotation_y(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::new(
        c, 0.0, s, 0.0,
        0.0, 1.0, 0.0, 0.0,
        -s, 0.0, c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation about the Z axis (radians, right-hand rule)
#[rustfmt::skip]
pub fn rotation_z(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::new(
        c, -s, 0.0, 0.0,
        s, c, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Translation; only moves points (w = 1)
#[rustfmt::skip]
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::new(
        1.0, 0.0, 0.0, x,
        0.0, 1.0, 0.0, y,
        0.0, 0.0, 1.0, z,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[rustfmt::skip]
pub fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Mat4::new(
        sx, 0.0, 0.0, 0.0,
        0.0, sy, 0.0, 0.0,
        0.0, 0.0, sz, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Right-handed view matrix: the camera at `eye` looks toward `target`
/// down its local -z axis.
#[rustfmt::skip]
pub fn look_at(eye: &Vec4, target: &Vec4, up: &Vec4) -> Result<Mat4> {
    let zaxis = math::normalize(&math::sub(eye, target))?;
    let xaxis = math::normalize(&math::cross(up, &zaxis))?;
    let yaxis = math::cross(&zaxis, &xaxis);

    Ok(Mat4::new(
        xaxis.x, xaxis.y, xaxis.z, -math::dot(&xaxis, eye),
        yaxis.x, yaxis.y, yaxis.z, -math::dot(&yaxis, eye),
        zaxis.x, zaxis.y, zaxis.z, -math::dot(&zaxis, eye),
        0.0, 0.0, 0.0, 1.0,
    ))
}

/// Local rotation of the spinning mesh: Z first, then X at half speed
pub fn spin_rotation(angle: f32) -> Mat4 {
    rotation_x(angle * 0.5) * rotation_z(angle)
}

/// Full model transform for one frame.
///
/// The mesh spins in place about its own origin, then is pushed `distance`
/// units down the +z axis in front of the camera.
pub fn model_matrix(angle: f32, distance: f32) -> Mat4 {
    translation(0.0, 0.0, distance) * spin_rotation(angle)
}

/// Apply `matrix` to each vertex, producing a new triangle
pub fn transform_triangle(triangle: &Triangle, matrix: &Mat4) -> Triangle {
    let [p1, p2, p3] = &triangle.vertices;
    Triangle {
        vertices: [
            math::mul_vec(matrix, p1),
            math::mul_vec(matrix, p2),
            math::mul_vec(matrix, p3),
        ],
        color: triangle.color,
    }
}
