//! The mesh model: owned vertices, validated quad faces and global bounds.
//!
//! # Example
//! ```rust
//! use field_topology::topology::mesh::build_mesh;
//! use field_topology::topology::vertex::Vertex;
//!
//! let v = |x: f64, y: f64, vx: f64, vy: f64| Vertex::new([x, y, 0.0], [vx, vy, 0.0], 0.0);
//! let mesh = build_mesh(
//!     vec![
//!         v(0.0, 0.0, -1.0, -1.0),
//!         v(1.0, 0.0, 1.0, -1.0),
//!         v(1.0, 1.0, 1.0, 1.0),
//!         v(0.0, 1.0, -1.0, 1.0),
//!     ],
//!     vec![[0, 1, 2, 3]],
//! )?;
//! assert_eq!(mesh.num_faces(), 1);
//! assert_eq!(mesh.bounds().max, [1.0, 1.0, 0.0]);
//! # Ok::<(), field_topology::mesh_error::MeshError>(())
//! ```

use crate::debug_invariants::DebugInvariants;
use crate::geometry::bounds::BoundingBox;
use crate::mesh_error::MeshError;
use crate::topology::face::QuadFace;
use crate::topology::vertex::Vertex;
use static_assertions::assert_impl_all;

/// Vertices, quad faces and the bounding box derived from them.
#[derive(Clone, Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<QuadFace>,
    bounds: BoundingBox,
}

assert_impl_all!(Mesh: Send, Sync);

/// Build a mesh from vertices and quad faces given as vertex index quadruples.
///
/// Fails with [`MeshError::InvalidGeometry`] when there are no vertices, a
/// vertex is not finite, or a face is not an axis-aligned rectangle.
pub fn build_mesh(vertices: Vec<Vertex>, faces: Vec<[usize; 4]>) -> Result<Mesh, MeshError> {
    Mesh::new(vertices, faces)
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<[usize; 4]>) -> Result<Self, MeshError> {
        if let Some(idx) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::InvalidGeometry(format!(
                "vertex {idx} has a non-finite value"
            )));
        }
        let bounds = BoundingBox::from_points(vertices.iter().map(|v| v.position))
            .ok_or_else(|| MeshError::InvalidGeometry("mesh has no vertices".into()))?;
        let faces = faces
            .into_iter()
            .enumerate()
            .map(|(idx, quad)| QuadFace::new(idx, quad, &vertices))
            .collect::<Result<Vec<_>, _>>()?;

        let mesh = Self {
            vertices,
            faces,
            bounds,
        };
        mesh.debug_assert_invariants();
        log::debug!(
            "built mesh: {} vertices, {} faces, bounds {:?}..{:?}",
            mesh.vertices.len(),
            mesh.faces.len(),
            mesh.bounds.min,
            mesh.bounds.max
        );
        Ok(mesh)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[QuadFace] {
        &self.faces
    }

    #[inline]
    pub fn face(&self, index: usize) -> Option<&QuadFace> {
        self.faces.get(index)
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Bounding box over all vertex positions.
    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }
}

impl DebugInvariants for Mesh {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        for (idx, face) in self.faces.iter().enumerate() {
            let frame = face.frame();
            for (corner, &v) in face.corners().iter().enumerate() {
                let vertex = self.vertices.get(v).ok_or_else(|| {
                    MeshError::InvalidGeometry(format!("face {idx} lost vertex {v}"))
                })?;
                if !self.bounds.contains(vertex.position) {
                    return Err(MeshError::InvalidGeometry(format!(
                        "vertex {v} lies outside the mesh bounds"
                    )));
                }
                let expected_x = frame.x[usize::from(corner == 1 || corner == 2)];
                let expected_y = frame.y[usize::from(corner >= 2)];
                let tol = 1e-9 * frame.width().max(frame.height());
                if (vertex.x() - expected_x).abs() > tol || (vertex.y() - expected_y).abs() > tol {
                    return Err(MeshError::InvalidGeometry(format!(
                        "face {idx} corner {corner} is vertex {v}, which is not at ({expected_x}, {expected_y})"
                    )));
                }
            }
        }
        Ok(())
    }
}
