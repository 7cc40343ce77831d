//! Quadrilateral faces of a structured, axis-aligned grid.
//!
//! A face is given as four vertex indices in traversal order. Construction
//! checks that the four positions are the corners of an axis-aligned
//! rectangle in the x–y plane and that the traversal walks around it (either
//! orientation). The validated face caches its extents and its vertices in
//! corner order `[(x1,y1), (x2,y1), (x2,y2), (x1,y2)]`, so interpolation
//! never depends on which vertex the input listed first.

use crate::geometry::bilinear::{CellField, CellFrame};
use crate::mesh_error::MeshError;
use crate::topology::vertex::Vertex;
use itertools::{Itertools, MinMaxResult};

/// Relative tolerance when snapping vertex coordinates to the cell extents.
const SNAP_TOL: f64 = 1e-9;

/// A validated quad cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadFace {
    vertices: [usize; 4],
    corners: [usize; 4],
    field: CellField,
}

fn invalid(face: usize, message: impl std::fmt::Display) -> MeshError {
    MeshError::InvalidGeometry(format!("face {face}: {message}"))
}

fn extent(face: usize, axis: &str, values: impl Iterator<Item = f64>) -> Result<[f64; 2], MeshError> {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::MinMax(lo, hi) if hi > lo => Ok([lo, hi]),
        _ => Err(invalid(face, format!("zero {axis} extent"))),
    }
}

/// Which of the extremes `value` sits on, if any.
fn snap(value: f64, range: [f64; 2]) -> Option<bool> {
    let tol = SNAP_TOL * (range[1] - range[0]);
    if (value - range[0]).abs() <= tol {
        Some(false)
    } else if (value - range[1]).abs() <= tol {
        Some(true)
    } else {
        None
    }
}

impl QuadFace {
    /// Validate face `index` with the given traversal against `all` vertices.
    pub fn new(index: usize, vertices: [usize; 4], all: &[Vertex]) -> Result<Self, MeshError> {
        let mut points = [[0.0; 3]; 4];
        for (slot, &v) in vertices.iter().enumerate() {
            let vertex = all.get(v).ok_or_else(|| {
                invalid(
                    index,
                    format!("references vertex {v}, mesh has {}", all.len()),
                )
            })?;
            points[slot] = vertex.position;
        }

        let x = extent(index, "x", points.iter().map(|p| p[0]))?;
        let y = extent(index, "y", points.iter().map(|p| p[1]))?;

        // Corner id per traversal slot: 0 (x1,y1), 1 (x2,y1), 2 (x2,y2), 3 (x1,y2).
        let mut corner_of = [0usize; 4];
        let mut corners = [usize::MAX; 4];
        for (slot, p) in points.iter().enumerate() {
            let (Some(hi_x), Some(hi_y)) = (snap(p[0], x), snap(p[1], y)) else {
                return Err(invalid(index, "not an axis-aligned rectangle"));
            };
            let corner = match (hi_x, hi_y) {
                (false, false) => 0,
                (true, false) => 1,
                (true, true) => 2,
                (false, true) => 3,
            };
            if corners[corner] != usize::MAX {
                return Err(invalid(index, "two vertices share a corner"));
            }
            corners[corner] = vertices[slot];
            corner_of[slot] = corner;
        }

        let walks_around = corner_of
            .iter()
            .circular_tuple_windows()
            .all(|(a, b)| matches!((b + 4 - a) % 4, 1 | 3));
        if !walks_around {
            return Err(invalid(index, "traversal crosses the cell diagonal"));
        }

        let samples = corners.map(|v| all[v].vector);
        Ok(Self {
            vertices,
            corners,
            field: CellField::new(CellFrame::new(x, y), samples),
        })
    }

    /// Vertex indices in input traversal order.
    #[inline]
    pub fn vertices(&self) -> [usize; 4] {
        self.vertices
    }

    /// Vertex indices in corner order `(x1,y1), (x2,y1), (x2,y2), (x1,y2)`.
    #[inline]
    pub fn corners(&self) -> [usize; 4] {
        self.corners
    }

    #[inline]
    pub fn frame(&self) -> &CellFrame {
        self.field.frame()
    }

    /// Interpolated `vx`/`vy` over this cell.
    #[inline]
    pub fn field(&self) -> &CellField {
        &self.field
    }
}
