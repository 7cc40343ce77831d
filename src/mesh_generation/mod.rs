//! Structured quad meshes sampled from an analytic field.
//!
//! Vertices are laid out row-major, vertex `(i, j)` at index
//! `j * (nx + 1) + i`, and face `(i, j)` at index `j * nx + i` with the
//! counter-clockwise corners `[v(i,j), v(i+1,j), v(i+1,j+1), v(i,j+1)]`.
//! Every vertex sits in the `z = 0` plane, carries the vector
//! `(vx, vy, 0)` and the scalar `|v|`.

use crate::mesh_error::MeshError;
use crate::topology::mesh::{Mesh, build_mesh};
use crate::topology::vertex::Vertex;

fn invalid_geometry(message: impl Into<String>) -> MeshError {
    MeshError::InvalidGeometry(message.into())
}

/// Build an `nx × ny` grid over `[min, max]` with `field(x, y) = [vx, vy]`.
///
/// # Example
/// ```rust
/// use field_topology::mesh_generation::quad_mesh;
///
/// let mesh = quad_mesh(2, 1, [0.0, 0.0], [2.0, 1.0], |x, y| [x, -y])?;
/// assert_eq!(mesh.vertices().len(), 6);
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.vertices()[4].vector, [1.0, -1.0, 0.0]);
/// # Ok::<(), field_topology::mesh_error::MeshError>(())
/// ```
pub fn quad_mesh<F>(
    nx: usize,
    ny: usize,
    min: [f64; 2],
    max: [f64; 2],
    field: F,
) -> Result<Mesh, MeshError>
where
    F: Fn(f64, f64) -> [f64; 2],
{
    if nx == 0 || ny == 0 {
        return Err(invalid_geometry("nx and ny must be positive"));
    }
    if !min.iter().chain(max.iter()).all(|v| v.is_finite()) {
        return Err(invalid_geometry("mesh extent must be finite"));
    }
    if !(max[0] > min[0] && max[1] > min[1]) {
        return Err(invalid_geometry(format!(
            "max {max:?} must exceed min {min:?} on both axes"
        )));
    }

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        // Pin the last row/column to `max` so the extent is exact.
        let y = if j == ny { max[1] } else { min[1] + dy * j as f64 };
        for i in 0..=nx {
            let x = if i == nx { max[0] } else { min[0] + dx * i as f64 };
            let [vx, vy] = field(x, y);
            vertices.push(Vertex::new([x, y, 0.0], [vx, vy, 0.0], vx.hypot(vy)));
        }
    }

    let mut faces = Vec::with_capacity(nx * ny);
    let row_stride = nx + 1;
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * row_stride + i;
            let v1 = v0 + 1;
            let v3 = v0 + row_stride;
            let v2 = v3 + 1;
            faces.push([v0, v1, v2, v3]);
        }
    }

    log::debug!("generated {nx}x{ny} quad mesh over {min:?}..{max:?}");
    build_mesh(vertices, faces)
}
