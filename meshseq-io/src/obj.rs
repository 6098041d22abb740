//! OBJ format support
//!
//! Reading goes through the raw parser of the `obj` crate so vertex order is
//! exactly the order of `v` lines in the file; polygons with more than three
//! corners are split into a triangle fan. Writing emits only `v` and `f`
//! records, which is all a frame carries.

use crate::{IoError, MeshReader, MeshWriter};
use meshseq_core::{Face, Frame, Point3f, Result};
use ::obj::raw::object::Polygon;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub struct ObjReader;
pub struct ObjWriter;

impl MeshReader for ObjReader {
    fn read_frame<P: AsRef<Path>>(path: P) -> Result<Frame> {
        let path = path.as_ref();
        let file = File::open(path).map_err(IoError::from)?;
        Ok(parse_frame(BufReader::new(file), path)?)
    }
}

impl MeshWriter for ObjWriter {
    fn write_frame<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<()> {
        let file = File::create(path.as_ref()).map_err(IoError::from)?;
        let mut writer = BufWriter::new(file);
        write_frame_to(frame, &mut writer).map_err(IoError::from)?;
        writer.flush().map_err(IoError::from)?;
        Ok(())
    }
}

/// Parse an OBJ stream into a frame. `origin` is only used in error messages.
pub fn parse_frame<R: BufRead>(input: R, origin: &Path) -> std::result::Result<Frame, IoError> {
    let raw = ::obj::raw::parse_obj(input).map_err(|e| IoError::ParseError {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertices: Vec<Point3f> = raw
        .positions
        .iter()
        .map(|&(x, y, z, _w)| Point3f::new(x, y, z))
        .collect();

    let mut faces: Vec<Face> = Vec::with_capacity(raw.polygons.len());
    for polygon in &raw.polygons {
        let corners = polygon_positions(polygon);
        if corners.len() < 3 {
            return Err(IoError::ParseError {
                path: origin.to_path_buf(),
                message: format!("polygon {} has {} corners", faces.len(), corners.len()),
            });
        }
        for i in 1..corners.len() - 1 {
            faces.push([corners[0], corners[i], corners[i + 1]]);
        }
    }

    let frame = Frame::from_vertices_and_faces(vertices, faces);
    if let Some((face, index)) = frame.first_invalid_index() {
        return Err(IoError::IndexOutOfRange {
            path: origin.to_path_buf(),
            face,
            index,
            count: frame.vertex_count(),
        });
    }

    Ok(frame)
}

/// Position indices of a polygon, whatever attributes it carries
fn polygon_positions(polygon: &Polygon) -> Vec<usize> {
    match polygon {
        Polygon::P(corners) => corners.clone(),
        Polygon::PT(corners) => corners.iter().map(|&(p, _)| p).collect(),
        Polygon::PN(corners) => corners.iter().map(|&(p, _)| p).collect(),
        Polygon::PTN(corners) => corners.iter().map(|&(p, _, _)| p).collect(),
    }
}

/// Serialize a frame as `v` and `f` records with 1-based indices
pub fn write_frame_to<W: Write>(frame: &Frame, out: &mut W) -> std::io::Result<()> {
    for v in &frame.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &frame.faces {
        writeln!(out, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }
    Ok(())
}
