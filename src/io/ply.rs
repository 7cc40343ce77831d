//! ASCII PLY-style quad mesh reader and writer.
//!
//! # Supported format
//! ```text
//! ply
//! format ascii 1.0
//! element vertex 4
//! property float x
//! ...
//! element face 1
//! property list uchar int vertex_indices
//! end_header
//! 0 0 0 -1 -1 0 1
//! 1 0 0  1 -1 0 1
//! 1 1 0  1  1 0 1
//! 0 1 0 -1  1 0 1
//! 4 0 1 2 3
//! ```
//!
//! - Counts come from the last token of the header lines containing
//!   `element vertex` and `element face`; other header lines are ignored.
//! - Vertex lines are `x y z vx vy vz s`; extra tokens are ignored.
//! - Face lines are `4 v0 v1 v2 v3` with zero-based indices.
//! - Blank lines after `end_header` are skipped.
//!
//! # Limitations
//! - Binary PLY is not supported.
//! - Only quadrilateral faces are accepted.
//! - Property declarations are not interpreted: the column layout is fixed.

use crate::io::{MeshReader, MeshWriter};
use crate::mesh_error::MeshError;
use crate::topology::mesh::{Mesh, build_mesh};
use crate::topology::vertex::Vertex;
use std::io::{Read, Write};

const END_HEADER: &str = "end_header";
const VERTEX_ELEMENT: &str = "element vertex";
const FACE_ELEMENT: &str = "element face";

/// Reader for the ASCII quad mesh format above.
#[derive(Debug, Default, Clone)]
pub struct PlyReader;

impl PlyReader {
    fn parse_count(line_no: usize, line: &str) -> Result<usize, MeshError> {
        let raw = line
            .split_whitespace()
            .last()
            .ok_or_else(|| MeshError::format(line_no, "missing element count"))?;
        raw.parse::<usize>()
            .map_err(|_| MeshError::format(line_no, format!("invalid element count: {raw}")))
    }

    fn parse_real(line_no: usize, raw: &str) -> Result<f64, MeshError> {
        raw.parse::<f64>()
            .map_err(|_| MeshError::format(line_no, format!("invalid number: {raw}")))
    }

    fn parse_index(line_no: usize, raw: &str) -> Result<usize, MeshError> {
        raw.parse::<usize>()
            .map_err(|_| MeshError::format(line_no, format!("invalid vertex index: {raw}")))
    }

    /// `(vertex count, face count, line number of end_header)`.
    fn parse_header<'a>(
        lines: &mut impl Iterator<Item = (usize, &'a str)>,
    ) -> Result<(usize, usize, usize), MeshError> {
        let mut n_vertices = None;
        let mut n_faces = None;
        let mut last = 0;
        for (line_no, line) in lines.by_ref() {
            last = line_no;
            if line.contains(END_HEADER) {
                let n_vertices = n_vertices
                    .ok_or_else(|| MeshError::format(line_no, "header has no vertex count"))?;
                let n_faces =
                    n_faces.ok_or_else(|| MeshError::format(line_no, "header has no face count"))?;
                return Ok((n_vertices, n_faces, line_no));
            }
            if line.contains(VERTEX_ELEMENT) {
                n_vertices = Some(Self::parse_count(line_no, line)?);
            } else if line.contains(FACE_ELEMENT) {
                n_faces = Some(Self::parse_count(line_no, line)?);
            }
        }
        Err(MeshError::format(last, "missing end_header"))
    }

    fn parse_vertex(line_no: usize, line: &str) -> Result<Vertex, MeshError> {
        let mut parts = line.split_whitespace();
        let mut values = [0.0; 7];
        for (slot, name) in values
            .iter_mut()
            .zip(["x", "y", "z", "vx", "vy", "vz", "s"])
        {
            let raw = parts
                .next()
                .ok_or_else(|| MeshError::format(line_no, format!("missing {name}")))?;
            *slot = Self::parse_real(line_no, raw)?;
        }
        let [x, y, z, vx, vy, vz, s] = values;
        Ok(Vertex::new([x, y, z], [vx, vy, vz], s))
    }

    fn parse_face(line_no: usize, line: &str, n_vertices: usize) -> Result<[usize; 4], MeshError> {
        let mut parts = line.split_whitespace();
        let count_raw = parts
            .next()
            .ok_or_else(|| MeshError::format(line_no, "missing face vertex count"))?;
        let count = Self::parse_index(line_no, count_raw)?;
        if count != 4 {
            return Err(MeshError::format(
                line_no,
                format!("face has {count} vertices, only quads are supported"),
            ));
        }
        let mut quad = [0usize; 4];
        for slot in &mut quad {
            let raw = parts
                .next()
                .ok_or_else(|| MeshError::format(line_no, "face lists fewer than 4 indices"))?;
            let idx = Self::parse_index(line_no, raw)?;
            if idx >= n_vertices {
                return Err(MeshError::format(
                    line_no,
                    format!("vertex index {idx} out of range, mesh has {n_vertices}"),
                ));
            }
            *slot = idx;
        }
        Ok(quad)
    }
}

impl MeshReader for PlyReader {
    fn read<R: Read>(&self, mut reader: R) -> Result<Mesh, MeshError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        let mut lines = contents.lines().enumerate().map(|(idx, line)| (idx + 1, line));

        let (n_vertices, n_faces, header_end) = Self::parse_header(&mut lines)?;
        let mut data = lines.filter(|(_, line)| !line.trim().is_empty());
        let mut last = header_end;

        // Header counts are untrusted; buffers grow with the data actually read.
        let mut vertices = Vec::new();
        for i in 0..n_vertices {
            let (line_no, line) = data.next().ok_or_else(|| {
                MeshError::format(last, format!("expected {n_vertices} vertices, found {i}"))
            })?;
            last = line_no;
            vertices.push(Self::parse_vertex(line_no, line)?);
        }

        let mut faces = Vec::new();
        for i in 0..n_faces {
            let (line_no, line) = data.next().ok_or_else(|| {
                MeshError::format(last, format!("expected {n_faces} faces, found {i}"))
            })?;
            last = line_no;
            faces.push(Self::parse_face(line_no, line, n_vertices)?);
        }

        log::debug!("parsed {n_vertices} vertices and {n_faces} faces");
        build_mesh(vertices, faces)
    }
}

/// Writer producing input the [`PlyReader`] accepts.
///
/// Faces are written in cached corner order, counter-clockwise from the
/// lower-left corner.
#[derive(Debug, Default, Clone)]
pub struct PlyWriter;

impl MeshWriter for PlyWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshError> {
        writeln!(writer, "ply")?;
        writeln!(writer, "format ascii 1.0")?;
        writeln!(writer, "{VERTEX_ELEMENT} {}", mesh.vertices().len())?;
        for name in ["x", "y", "z", "vx", "vy", "vz", "s"] {
            writeln!(writer, "property float {name}")?;
        }
        writeln!(writer, "{FACE_ELEMENT} {}", mesh.num_faces())?;
        writeln!(writer, "property list uchar int vertex_indices")?;
        writeln!(writer, "{END_HEADER}")?;
        for v in mesh.vertices() {
            let [x, y, z] = v.position;
            let [vx, vy, vz] = v.vector;
            writeln!(writer, "{x} {y} {z} {vx} {vy} {vz} {}", v.scalar)?;
        }
        for face in mesh.faces() {
            let [a, b, c, d] = face.corners();
            writeln!(writer, "4 {a} {b} {c} {d}")?;
        }
        writer.flush()?;
        Ok(())
    }
}
