//! Narrow PLY reader for one well-known scan dataset.
//!
//! This is deliberately not a general PLY parser: the caller supplies the
//! expected record counts and the reader trusts them, skipping the header
//! until the `end_header` sentinel and then reading exactly that many
//! fixed-layout records. The `checked` variants additionally cross-check
//! the counts declared in the header and the per-face arity field.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Lines},
    path::Path,
};

use corelib::{Error, Result};

use crate::mesh::MeshData;

/// Line marking the end of the PLY header.
pub const END_HEADER: &str = "end_header";

/// Expected record counts for one dataset, supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlyCounts {
    pub vertices: usize,
    pub faces: usize,
}

/// Counts for the Stanford bunny scan this viewer targets.
pub const BUNNY_COUNTS: PlyCounts = PlyCounts {
    vertices: 35_947,
    faces: 69_451,
};

/// Load a mesh from a file path, trusting `counts`.
pub fn load_ply_from_path(path: impl AsRef<Path>, counts: PlyCounts) -> Result<MeshData> {
    let path = path.as_ref();
    log::info!("Loading PLY mesh from {}", path.display());
    let file = File::open(path)?;
    load_ply_from_reader(BufReader::new(file), counts)
}

/// Load a mesh from a [`BufRead`] implementation, trusting `counts`.
pub fn load_ply_from_reader<R: BufRead>(reader: R, counts: PlyCounts) -> Result<MeshData> {
    parse_ply(reader, counts, false)
}

/// Convenience helper to parse a PLY string literal.
pub fn load_ply_from_str(contents: &str, counts: PlyCounts) -> Result<MeshData> {
    parse_ply(io::Cursor::new(contents), counts, false)
}

/// Like [`load_ply_from_path`], but validates header-declared counts
/// against `counts` and requires every face to be a triangle.
pub fn load_ply_checked_from_path(path: impl AsRef<Path>, counts: PlyCounts) -> Result<MeshData> {
    let path = path.as_ref();
    log::info!("Loading PLY mesh (checked) from {}", path.display());
    let file = File::open(path)?;
    load_ply_checked_from_reader(BufReader::new(file), counts)
}

/// Checked variant of [`load_ply_from_reader`].
pub fn load_ply_checked_from_reader<R: BufRead>(reader: R, counts: PlyCounts) -> Result<MeshData> {
    parse_ply(reader, counts, true)
}

/// Checked variant of [`load_ply_from_str`].
pub fn load_ply_checked_from_str(contents: &str, counts: PlyCounts) -> Result<MeshData> {
    parse_ply(io::Cursor::new(contents), counts, true)
}

fn parse_ply<R: BufRead>(reader: R, counts: PlyCounts, strict: bool) -> Result<MeshData> {
    let mut lines = reader.lines().enumerate();

    skip_header(&mut lines, counts, strict)?;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(counts.vertices);
    for _ in 0..counts.vertices {
        let (line_no, line) = next_record(&mut lines, "vertex", positions.len(), counts.vertices)?;
        let mut fields = line.split_whitespace();
        let x = parse_float(fields.next(), line_no, "x coordinate")?;
        let y = parse_float(fields.next(), line_no, "y coordinate")?;
        let z = parse_float(fields.next(), line_no, "z coordinate")?;
        // Scan records carry confidence and intensity; parse and discard.
        parse_float(fields.next(), line_no, "confidence")?;
        parse_float(fields.next(), line_no, "intensity")?;
        positions.push([x, y, z]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(counts.faces * 3);
    for face in 0..counts.faces {
        let (line_no, line) = next_record(&mut lines, "face", face, counts.faces)?;
        let mut fields = line.split_whitespace();
        let arity = parse_integer(fields.next(), line_no, "vertex count")?;
        if strict && arity != 3 {
            return Err(Error::format(format!(
                "face on line {} has {} vertices, expected 3",
                line_no + 1,
                arity
            )));
        }
        indices.push(parse_integer(fields.next(), line_no, "first index")?);
        indices.push(parse_integer(fields.next(), line_no, "second index")?);
        indices.push(parse_integer(fields.next(), line_no, "third index")?);
    }

    Ok(MeshData::new(positions, indices))
}

/// Consume header lines up to and including the sentinel. In strict mode,
/// cross-check any `element vertex N` / `element face N` declarations.
fn skip_header<R: BufRead>(
    lines: &mut std::iter::Enumerate<Lines<R>>,
    counts: PlyCounts,
    strict: bool,
) -> Result<()> {
    for (line_no, line) in lines {
        let line = line?;
        let trimmed = line.trim_end();
        if trimmed == END_HEADER {
            return Ok(());
        }
        if !strict {
            continue;
        }
        if let Some(declared) = trimmed.strip_prefix("element vertex ") {
            let declared = parse_integer(Some(declared.trim()), line_no, "vertex element count")?;
            if declared as usize != counts.vertices {
                return Err(Error::format(format!(
                    "header declares {} vertices, expected {}",
                    declared, counts.vertices
                )));
            }
        } else if let Some(declared) = trimmed.strip_prefix("element face ") {
            let declared = parse_integer(Some(declared.trim()), line_no, "face element count")?;
            if declared as usize != counts.faces {
                return Err(Error::format(format!(
                    "header declares {} faces, expected {}",
                    declared, counts.faces
                )));
            }
        }
    }
    Err(Error::format(format!(
        "end of file before `{END_HEADER}` sentinel"
    )))
}

fn next_record<R: BufRead>(
    lines: &mut std::iter::Enumerate<Lines<R>>,
    what: &str,
    have: usize,
    want: usize,
) -> Result<(usize, String)> {
    let (line_no, line) = lines.next().ok_or_else(|| {
        Error::format(format!(
            "expected {want} {what} records, file ended after {have}"
        ))
    })?;
    Ok((line_no, line?))
}

fn parse_float(token: Option<&str>, line_no: usize, what: &str) -> Result<f32> {
    let token =
        token.ok_or_else(|| Error::format(format!("missing {} on line {}", what, line_no + 1)))?;
    token.parse::<f32>().map_err(|_| {
        Error::format(format!(
            "failed to parse {} '{}' on line {}",
            what,
            token,
            line_no + 1
        ))
    })
}

fn parse_integer(token: Option<&str>, line_no: usize, what: &str) -> Result<u32> {
    let token =
        token.ok_or_else(|| Error::format(format!("missing {} on line {}", what, line_no + 1)))?;
    token.parse::<u32>().map_err(|_| {
        Error::format(format!(
            "failed to parse {} '{}' on line {}",
            what,
            token,
            line_no + 1
        ))
    })
}
