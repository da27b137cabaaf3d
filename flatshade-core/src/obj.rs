//! Wavefront (.obj) text parser for vertex and face records
use nom::{
    bytes::complete::{tag, take_till, take_till1},
    character::complete::{char, i64 as integer, space1},
    combinator::{opt, rest},
    multi::separated_list0,
    number::complete::double,
    sequence::{pair, preceded},
    IResult,
};
use std::fs;
use std::path::Path;

use crate::error::ParseError;
use crate::geometry::{Face, Mesh};
use crate::math::Vector3;

/// Faces with more vertices than this are skipped.
pub const MAX_FACE_VERTICES: usize = 4;

/// A line of mesh text, split into its tokens
#[derive(Debug, PartialEq)]
enum Record<'a> {
    Vertex(Vec<&'a str>),
    Face(Vec<&'a str>),
    Ignored,
}

/// Parse mesh text into a [`Mesh`]
///
/// Vertex components that fail to parse become NaN. Faces with more than
/// four vertices are dropped. A face that references a vertex which has not
/// been declared before it is an error.
pub fn parse(text: &str) -> Result<Mesh, ParseError> {
    let mut mesh = Mesh::new();
    let mut dropped = 0usize;

    for (line_idx, line) in text.lines().enumerate() {
        let line_no = line_idx + 1;

        match record(line) {
            Record::Vertex(tokens) => {
                let component = |i: usize| tokens.get(i).map_or(f64::NAN, |t| float_prefix(t));
                mesh.add_vertex(Vector3::new(component(0), component(1), component(2)));
            }
            Record::Face(groups) => {
                if groups.len() > MAX_FACE_VERTICES {
                    dropped += 1;
                    continue;
                }
                if groups.len() < 3 {
                    return Err(ParseError::TooFewVertices {
                        line: line_no,
                        count: groups.len(),
                    });
                }

                let indices = groups
                    .iter()
                    .map(|group| vertex_index(group, line_no, mesh.vertex_count()))
                    .collect::<Result<Vec<_>, _>>()?;
                let positions: Vec<Vector3> = indices.iter().map(|&i| mesh.vertices[i]).collect();
                let count = positions.len();
                let face = Face::from_positions(indices, &positions)
                    .ok_or(ParseError::TooFewVertices { line: line_no, count })?;

                mesh.add_face(face);
            }
            Record::Ignored => {}
        }
    }

    mesh.update_center();

    log::debug!(
        "parsed mesh: {} vertices, {} faces ({} n-gons dropped)",
        mesh.vertex_count(),
        mesh.face_count(),
        dropped
    );

    Ok(mesh)
}

/// Read and parse a mesh file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Mesh, ParseError> {
    let text = fs::read_to_string(path.as_ref())?;
    log::debug!("loaded {} bytes from {}", text.len(), path.as_ref().display());
    parse(&text)
}

fn record(line: &str) -> Record<'_> {
    if let Ok((_, tokens)) = tokens_after("v")(line) {
        return Record::Vertex(tokens);
    }
    if let Ok((_, groups)) = tokens_after("f")(line) {
        return Record::Face(groups);
    }
    Record::Ignored
}

/// Keyword, whitespace, then whitespace-separated tokens.
fn tokens_after<'a>(keyword: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<&'a str>> {
    preceded(pair(tag(keyword), space1), separated_list0(space1, token))
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// Leading vertex subtoken of `vertex[/texture[/normal]]`.
fn face_group(input: &str) -> IResult<&str, &str> {
    let (input, vertex) = take_till(|c: char| c == '/')(input)?;
    let (input, _texture) = opt(preceded(char('/'), take_till(|c: char| c == '/')))(input)?;
    let (input, _normal) = opt(preceded(char('/'), rest))(input)?;
    Ok((input, vertex))
}

/// Longest numeric prefix of `token`, or NaN.
fn float_prefix(token: &str) -> f64 {
    double::<_, nom::error::Error<&str>>(token).map_or(f64::NAN, |(_, v)| v)
}

/// Resolves a 1-based face group to a 0-based vertex index.
fn vertex_index(group: &str, line: usize, vertex_count: usize) -> Result<usize, ParseError> {
    let invalid = || ParseError::InvalidIndex {
        line,
        token: group.to_string(),
    };

    let (_, vertex) = face_group(group).map_err(|_| invalid())?;
    let (_, index) = integer::<_, nom::error::Error<&str>>(vertex).map_err(|_| invalid())?;

    if index < 1 || index as u64 > vertex_count as u64 {
        return Err(ParseError::IndexOutOfRange {
            line,
            index,
            vertex_count,
        });
    }

    Ok(index as usize - 1)
}
