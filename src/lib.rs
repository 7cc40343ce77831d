#![cfg_attr(docsrs, feature(doc_cfg))]
//! # field-topology
//!
//! field-topology extracts the topology of a 2D vector field sampled on a
//! structured, axis-aligned quad mesh. It finds the critical points of the
//! bilinear interpolant in every cell, classifies each from the trace and
//! determinant of the Jacobian, and traces a streamline through each one.
//!
//! ## Features
//! - Exact bilinear root finding per cell, including cells where the field is
//!   linear
//! - Five-way classification: nodal source, nodal sink, saddle point, center,
//!   focus
//! - Fixed-step streamline tracing with grid-accelerated point location
//! - An ASCII PLY-style reader and writer for meshes carrying vector and
//!   scalar samples
//! - Optional `rayon` parallelism over faces and seeds
//!
//! ## Usage
//! ```rust
//! use field_topology::prelude::*;
//!
//! let input = "ply
//! element vertex 4
//! element face 1
//! end_header
//! 0 0 0 1 -1 0 1
//! 1 0 0 1 1 0 1
//! 1 1 0 -1 1 0 1
//! 0 1 0 -1 -1 0 1
//! 4 0 1 2 3
//! ";
//! let mesh = PlyReader.read(input.as_bytes())?;
//! let report = mesh.analyze(&AnalysisConfig::default())?;
//! assert_eq!(report.singularities.len(), 1);
//! assert_eq!(report.singularities[0].classification, Classification::Center);
//! # Ok::<(), MeshError>(())
//! ```
//!
//! The library logs through the [`log`] facade and installs no logger.

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod mesh_generation;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::analysis::{AnalysisConfig, AnalysisReport};
    pub use crate::algs::classify::Classification;
    pub use crate::algs::point_location::{PointLocation, PointLocator};
    pub use crate::algs::singularity::Singularity;
    pub use crate::algs::streamline::{
        Direction, Streamline, StreamlineConfig, StreamlineIntegrator, Termination,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::ply::{PlyReader, PlyWriter};
    pub use crate::io::{MeshReader, MeshWriter};
    pub use crate::mesh_error::MeshError;
    pub use crate::mesh_generation::quad_mesh;
    pub use crate::topology::mesh::{Mesh, build_mesh};
    pub use crate::topology::vertex::Vertex;
}
