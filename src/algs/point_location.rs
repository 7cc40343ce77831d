//! Map a world point to the face that contains it.
//!
//! Both strategies answer with the *first* face, in face order, whose closed
//! extent contains the point, so switching strategy never changes a result:
//!
//! - [`LinearScan`] tests every face, `O(n_faces)` per query.
//! - [`CellGrid`] buckets faces into a uniform grid over their combined
//!   extent. Each bucket lists, in ascending order, every face whose extent
//!   overlaps it; a query only tests the faces of the bucket holding the
//!   point. Bucket indices come from a monotone map of the coordinate, so a
//!   face containing the point always overlaps that bucket.

use crate::mesh_error::MeshError;
use crate::topology::face::QuadFace;
use crate::topology::mesh::Mesh;
use serde::{Deserialize, Serialize};

/// Largest automatic grid resolution per axis.
const MAX_AUTO_RESOLUTION: usize = 1024;
/// Largest bucket count an explicit resolution may ask for.
pub const MAX_GRID_BUCKETS: usize = MAX_AUTO_RESOLUTION * MAX_AUTO_RESOLUTION;

/// Point-location query over the faces of a mesh.
pub trait PointLocator {
    /// Index of the first face containing `(x, y)`, if any.
    fn locate(&self, x: f64, y: f64) -> Option<usize>;
}

/// Selects the point-location strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "strategy")]
pub enum PointLocation {
    LinearScan,
    /// `resolution: None` sizes the grid from the face count.
    UniformGrid { resolution: Option<[usize; 2]> },
}

impl Default for PointLocation {
    fn default() -> Self {
        PointLocation::UniformGrid { resolution: None }
    }
}

impl PointLocation {
    pub fn validate(&self) -> Result<(), MeshError> {
        let PointLocation::UniformGrid {
            resolution: Some([nx, ny]),
        } = *self
        else {
            return Ok(());
        };
        if nx == 0 || ny == 0 {
            return Err(MeshError::InvalidConfig(format!(
                "grid resolution must be non-zero, got [{nx}, {ny}]"
            )));
        }
        match nx.checked_mul(ny) {
            Some(buckets) if buckets <= MAX_GRID_BUCKETS => Ok(()),
            _ => Err(MeshError::InvalidConfig(format!(
                "grid resolution [{nx}, {ny}] exceeds {MAX_GRID_BUCKETS} buckets"
            ))),
        }
    }
}

/// Scan all faces in order.
#[derive(Clone, Copy, Debug)]
pub struct LinearScan<'a> {
    faces: &'a [QuadFace],
}

impl<'a> LinearScan<'a> {
    pub fn new(faces: &'a [QuadFace]) -> Self {
        Self { faces }
    }
}

impl PointLocator for LinearScan<'_> {
    fn locate(&self, x: f64, y: f64) -> Option<usize> {
        self.faces.iter().position(|f| f.frame().contains(x, y))
    }
}

/// Uniform bucket grid over the faces' combined x–y extent.
#[derive(Clone, Debug)]
pub struct CellGrid<'a> {
    faces: &'a [QuadFace],
    origin: [f64; 2],
    cell_size: [f64; 2],
    dims: [usize; 2],
    buckets: Vec<Vec<usize>>,
}

impl<'a> CellGrid<'a> {
    /// Build with a resolution of about `√n_faces` buckets per axis.
    pub fn new(faces: &'a [QuadFace]) -> Self {
        let side = ((faces.len() as f64).sqrt().ceil() as usize).clamp(1, MAX_AUTO_RESOLUTION);
        Self::build(faces, [side, side])
    }

    /// Build with an explicit `[nx, ny]` resolution.
    pub fn with_resolution(faces: &'a [QuadFace], resolution: [usize; 2]) -> Result<Self, MeshError> {
        PointLocation::UniformGrid {
            resolution: Some(resolution),
        }
        .validate()?;
        Ok(Self::build(faces, resolution))
    }

    fn build(faces: &'a [QuadFace], dims: [usize; 2]) -> Self {
        let mut lo = [f64::INFINITY; 2];
        let mut hi = [f64::NEG_INFINITY; 2];
        for face in faces {
            let frame = face.frame();
            lo[0] = lo[0].min(frame.x[0]);
            lo[1] = lo[1].min(frame.y[0]);
            hi[0] = hi[0].max(frame.x[1]);
            hi[1] = hi[1].max(frame.y[1]);
        }
        if faces.is_empty() {
            lo = [0.0; 2];
            hi = [1.0; 2];
        }
        let cell_size = [
            (hi[0] - lo[0]) / dims[0] as f64,
            (hi[1] - lo[1]) / dims[1] as f64,
        ];

        let mut grid = Self {
            faces,
            origin: lo,
            cell_size,
            dims,
            buckets: vec![Vec::new(); dims[0] * dims[1]],
        };
        for (idx, face) in faces.iter().enumerate() {
            let frame = face.frame();
            // Face extents start at or after the origin, so both ends map.
            let (Some(i0), Some(i1), Some(j0), Some(j1)) = (
                grid.axis_index(0, frame.x[0]),
                grid.axis_index(0, frame.x[1]),
                grid.axis_index(1, frame.y[0]),
                grid.axis_index(1, frame.y[1]),
            ) else {
                continue;
            };
            for j in j0..=j1 {
                for i in i0..=i1 {
                    grid.buckets[j * dims[0] + i].push(idx);
                }
            }
        }
        log::debug!(
            "cell grid {}x{} over {} faces, largest bucket {}",
            dims[0],
            dims[1],
            faces.len(),
            grid.buckets.iter().map(Vec::len).max().unwrap_or(0)
        );
        grid
    }

    /// Bucket coordinate along `axis`, clamped to the last bucket; `None`
    /// below the origin or for `NaN`.
    #[inline]
    fn axis_index(&self, axis: usize, value: f64) -> Option<usize> {
        let r = (value - self.origin[axis]) / self.cell_size[axis];
        if !(r >= 0.0) {
            return None;
        }
        Some((r.floor() as usize).min(self.dims[axis] - 1))
    }

    pub fn dims(&self) -> [usize; 2] {
        self.dims
    }
}

impl PointLocator for CellGrid<'_> {
    fn locate(&self, x: f64, y: f64) -> Option<usize> {
        let i = self.axis_index(0, x)?;
        let j = self.axis_index(1, y)?;
        self.buckets[j * self.dims[0] + i]
            .iter()
            .copied()
            .find(|&f| self.faces[f].frame().contains(x, y))
    }
}

/// Either strategy behind one type.
#[derive(Clone, Debug)]
pub enum Locator<'a> {
    Linear(LinearScan<'a>),
    Grid(CellGrid<'a>),
}

impl<'a> Locator<'a> {
    pub fn new(mesh: &'a Mesh, strategy: &PointLocation) -> Result<Self, MeshError> {
        Ok(match strategy {
            PointLocation::LinearScan => Locator::Linear(LinearScan::new(mesh.faces())),
            PointLocation::UniformGrid { resolution: None } => {
                Locator::Grid(CellGrid::new(mesh.faces()))
            }
            PointLocation::UniformGrid {
                resolution: Some(res),
            } => Locator::Grid(CellGrid::with_resolution(mesh.faces(), *res)?),
        })
    }
}

impl PointLocator for Locator<'_> {
    #[inline]
    fn locate(&self, x: f64, y: f64) -> Option<usize> {
        match self {
            Locator::Linear(l) => l.locate(x, y),
            Locator::Grid(g) => g.locate(x, y),
        }
    }
}
