/// Loader for the triangulated subset of the Wavefront OBJ format
///
/// Only `v` and `f` records matter. Normals, texture coordinates, groups and
/// materials are skipped, as are the `/`-separated auxiliary indices on face
/// vertex references (`f 1//4 2//4 3//4`).
use log::{debug, info};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map_res, opt, rest},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Triangle};
use crate::math::{point, Vec4};

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// A record keyword followed by its whitespace-separated fields
fn record(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    let (input, keyword) = preceded(space0, token)(input)?;
    let (input, fields) = many0(preceded(space1, token))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, (keyword, fields)))
}

/// `7`, `7/2`, `7//3` or `7/2/3`; only the leading position index is kept
fn vertex_ref(input: &str) -> IResult<&str, usize> {
    let (input, index) = map_res(digit1, |s: &str| s.parse::<usize>())(input)?;
    let (input, _) = opt(preceded(char('/'), rest))(input)?;
    Ok((input, index))
}

fn parse_coordinate(field: &str, line: usize) -> Result<f32> {
    match all_consuming(float::<&str, nom::error::Error<&str>>)(field) {
        Ok((_, value)) if value.is_finite() => Ok(value),
        Ok(_) => Err(Error::malformed(line, format!("non-finite coordinate '{}'", field))),
        Err(_) => Err(Error::malformed(line, format!("invalid coordinate '{}'", field))),
    }
}

fn resolve_ref(field: &str, vertices: &[Vec4], line: usize) -> Result<Vec4> {
    if field.starts_with('-') {
        return Err(Error::malformed(
            line,
            format!("relative vertex reference '{}' is not supported", field),
        ));
    }
    let index = match all_consuming(vertex_ref)(field) {
        Ok((_, index)) => index,
        Err(_) => {
            return Err(Error::malformed(
                line,
                format!("invalid vertex reference '{}'", field),
            ))
        }
    };

    index
        .checked_sub(1)
        .and_then(|i| vertices.get(i))
        .copied()
        .ok_or_else(|| {
            Error::malformed(
                line,
                format!(
                    "vertex index {} out of range 1..={}",
                    index,
                    vertices.len()
                ),
            )
        })
}

/// Parse OBJ text into a mesh. Any malformed record fails the whole load.
pub fn parse_obj(input: &str) -> Result<Mesh> {
    let mut vertices: Vec<Vec4> = Vec::new();
    let mut triangles = Vec::new();
    let mut skipped = 0usize;

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (keyword, fields) = match record(line) {
            Ok((_, parsed)) => parsed,
            Err(_) => return Err(Error::malformed(line_no, "unreadable record")),
        };

        match keyword {
            "v" => {
                if fields.len() < 3 {
                    return Err(Error::malformed(
                        line_no,
                        format!("vertex needs 3 coordinates, found {}", fields.len()),
                    ));
                }
                let x = parse_coordinate(fields[0], line_no)?;
                let y = parse_coordinate(fields[1], line_no)?;
                let z = parse_coordinate(fields[2], line_no)?;
                vertices.push(point(x, y, z));
            }
            "f" => {
                if fields.len() < 3 {
                    return Err(Error::malformed(
                        line_no,
                        format!("face needs 3 vertex references, found {}", fields.len()),
                    ));
                }
                if fields.len() > 3 {
                    return Err(Error::malformed(
                        line_no,
                        format!(
                            "face has {} vertices; only triangulated meshes are supported",
                            fields.len()
                        ),
                    ));
                }
                triangles.push(Triangle::new(
                    resolve_ref(fields[0], &vertices, line_no)?,
                    resolve_ref(fields[1], &vertices, line_no)?,
                    resolve_ref(fields[2], &vertices, line_no)?,
                ));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("skipped {} unsupported OBJ records", skipped);
    }
    Ok(Mesh::new(triangles))
}

/// Read and parse an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mesh = parse_obj(&text)?;
    info!("loaded {} triangles from {}", mesh.len(), path.display());
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# single triangle
v 0.0 0.0 5.0
v 1.0 0.0 5.0
v 0.0 1.0 5.0
vn 0.0 0.0 -1.0
f 1//1 2//1 3//1
";

    fn line_of(err: Error) -> usize {
        match err {
            Error::MalformedInput { line, .. } => line,
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_single_triangle() {
        let mesh = parse_obj(TRIANGLE).unwrap();
        assert_eq!(mesh.len(), 1);
        let tri = &mesh.triangles()[0];
        assert_eq!(*tri.p1(), point(0.0, 0.0, 5.0));
        assert_eq!(*tri.p3(), point(0.0, 1.0, 5.0));
    }

    #[test]
    fn test_auxiliary_indices_ignored() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/4/2 2/5 3\n";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(*mesh.triangles()[0].p2(), point(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_tabs_windows_newlines_and_unknown_records() {
        let text = "o thing\r\nv\t-1.5e0 2 3 1.0\r\ng group\r\nv 0 0 0\r\nv 1 1 1\r\ns off\r\nf 3 2 1\r\n";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(*mesh.triangles()[0].p3(), point(-1.5, 2.0, 3.0));
    }

    #[test]
    fn test_empty_input_gives_empty_mesh() {
        assert!(parse_obj("# nothing here\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_records() {
        assert_eq!(line_of(parse_obj("v 1 2\n").unwrap_err()), 1);
        assert_eq!(line_of(parse_obj("v 1 2 abc\n").unwrap_err()), 1);
        assert_eq!(line_of(parse_obj("v 1 2 nan\n").unwrap_err()), 1);
        assert_eq!(line_of(parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err()), 3);
        assert_eq!(
            line_of(parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3 4\n").unwrap_err()),
            5
        );
    }

    #[test]
    fn test_bad_indices() {
        let base = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";
        for face in ["f 0 1 2", "f 1 2 4", "f -1 -2 -3", "f a b c"] {
            let text = format!("{}{}\n", base, face);
            assert_eq!(line_of(parse_obj(&text).unwrap_err()), 4, "{}", face);
        }
    }

    #[test]
    fn test_index_must_refer_to_vertices_seen_so_far() {
        let text = "v 0 0 0\nv 1 0 0\nf 1 2 3\nv 0 1 0\n";
        assert_eq!(line_of(parse_obj(text).unwrap_err()), 3);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_obj("/definitely/not/here.obj");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
