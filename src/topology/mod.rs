//! Mesh model: vertices carrying field samples, validated quad faces, and
//! the [`Mesh`](mesh::Mesh) that owns them.

pub mod face;
pub mod mesh;
pub mod vertex;
