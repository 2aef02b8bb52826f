/// Geometry primitives for the software pipeline
use crate::error::{Error, Result};
use crate::math::{point, Vec4};
use crate::transform::{scale, transform_triangle};

/// RGB fill color of a shaded triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Scale each channel by `intensity` (clamped to [0, 1]), rounding to the
    /// nearest level.
    pub fn scaled(self, intensity: f32) -> Self {
        let k = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let channel = |c: u8| (c as f32 * k).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Mean of the three channels, used by front-ends that only have a
    /// brightness ramp.
    pub fn luminance(self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

/// A triangle face: three homogeneous vertices and the color assigned by the
/// shading stage (`None` before shading).
///
/// Triangles are plain values; every pipeline stage returns a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec4; 3],
    pub color: Option<Color>,
}

impl Triangle {
    pub fn new(p1: Vec4, p2: Vec4, p3: Vec4) -> Self {
        Self {
            vertices: [p1, p2, p3],
            color: None,
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self {
            color: Some(color),
            ..self
        }
    }

    pub fn p1(&self) -> &Vec4 {
        &self.vertices[0]
    }

    pub fn p2(&self) -> &Vec4 {
        &self.vertices[1]
    }

    pub fn p3(&self) -> &Vec4 {
        &self.vertices[2]
    }
}

/// A triangle mesh, built once and read-only while rendering
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Build a mesh from a vertex list and faces of three 1-based indices.
    ///
    /// An index of 0 or past the end of `vertices` is reported as
    /// `MalformedInput` with `line` set to the 1-based face number.
    pub fn from_indexed(vertices: &[[f32; 3]], faces: &[[usize; 3]]) -> Result<Self> {
        let resolve = |face_no: usize, index: usize| -> Result<Vec4> {
            index
                .checked_sub(1)
                .and_then(|i| vertices.get(i))
                .map(|&[x, y, z]| point(x, y, z))
                .ok_or_else(|| {
                    Error::malformed(
                        face_no,
                        format!(
                            "vertex index {} out of range 1..={}",
                            index,
                            vertices.len()
                        ),
                    )
                })
        };

        let triangles = faces
            .iter()
            .enumerate()
            .map(|(i, &[a, b, c])| {
                let face_no = i + 1;
                Ok(Triangle::new(
                    resolve(face_no, a)?,
                    resolve(face_no, b)?,
                    resolve(face_no, c)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { triangles })
    }

    /// Axis-aligned cube centered on the origin, wound so every front face
    /// is clockwise when seen from outside.
    pub fn cube(size: f32) -> Self {
        let corners = [
            point(-1.0, -1.0, -1.0),
            point(1.0, -1.0, -1.0),
            point(1.0, 1.0, -1.0),
            point(-1.0, 1.0, -1.0),
            point(-1.0, -1.0, 1.0),
            point(1.0, -1.0, 1.0),
            point(1.0, 1.0, 1.0),
            point(-1.0, 1.0, 1.0),
        ];
        let faces: [[usize; 3]; 12] = [
            // +z
            [5, 7, 6],
            [5, 8, 7],
            // -z
            [1, 2, 3],
            [1, 3, 4],
            // +x
            [2, 7, 3],
            [2, 6, 7],
            // -x
            [1, 4, 8],
            [1, 8, 5],
            // +y
            [4, 3, 7],
            [4, 7, 8],
            // -y
            [1, 6, 2],
            [1, 5, 6],
        ];

        let half = size / 2.0;
        let to_size = scale(half, half, half);
        let triangles = faces
            .iter()
            .map(|&[a, b, c]| {
                let unit = Triangle::new(corners[a - 1], corners[b - 1], corners[c - 1]);
                transform_triangle(&unit, &to_size)
            })
            .collect();

        Self { triangles }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
