//! Mesh vertices: position plus the sampled vector and scalar fields.

use serde::{Deserialize, Serialize};

/// A point in 3D world space.
pub type Point3 = [f64; 3];

/// One mesh vertex. Immutable once the mesh is built.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// World position `(x, y, z)`.
    pub position: Point3,
    /// Vector sample `(vx, vy, vz)`.
    pub vector: [f64; 3],
    /// Scalar sample `s`.
    pub scalar: f64,
}

impl Vertex {
    pub fn new(position: Point3, vector: [f64; 3], scalar: f64) -> Self {
        Self {
            position,
            vector,
            scalar,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position[1]
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.position[2]
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.position.iter().chain(self.vector.iter()).all(|v| v.is_finite())
            && self.scalar.is_finite()
    }
}
