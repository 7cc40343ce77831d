//! Mesh I/O.
//!
//! Readers parse a text mesh carrying per-vertex vector and scalar samples
//! and hand the result to [`build_mesh`](crate::topology::mesh::build_mesh),
//! so a successfully read mesh is always geometrically valid.

pub mod ply;

use crate::mesh_error::MeshError;
use crate::topology::mesh::Mesh;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Trait for readers that produce a validated [`Mesh`].
pub trait MeshReader {
    /// Parse a mesh from a reader.
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshError>;

    /// Open `path` and parse it.
    fn read_path(&self, path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
        let path = path.as_ref();
        log::debug!("reading mesh from {}", path.display());
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }
}

/// Trait for writers that serialize a [`Mesh`].
pub trait MeshWriter {
    /// Write the mesh to a writer.
    fn write<W: Write>(&self, writer: W, mesh: &Mesh) -> Result<(), MeshError>;
}
