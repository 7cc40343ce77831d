use field_topology::algs::classify::Classification;
use field_topology::algs::singularity::locate_in_face;
use field_topology::mesh_error::{DegeneracyKind, MeshError};
use field_topology::prelude::*;
use proptest::prelude::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Unit cell with corner vectors given at (0,0), (1,0), (1,1), (0,1).
fn unit_cell(vx: [f64; 4], vy: [f64; 4]) -> Mesh {
    let pos = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let vertices = (0..4)
        .map(|i| Vertex::new([pos[i][0], pos[i][1], 0.0], [vx[i], vy[i], 0.0], 0.0))
        .collect();
    build_mesh(vertices, vec![[0, 1, 2, 3]]).unwrap()
}

#[test]
fn unit_cell_root_at_center_is_a_source() {
    let mesh = unit_cell([-1.0, 1.0, 1.0, -1.0], [-1.0, -1.0, 1.0, 1.0]);
    let found = mesh.find_singularities();
    assert_eq!(found.len(), 1);
    let s = &found[0];
    assert!(approx(s.coordinates[0], 0.5) && approx(s.coordinates[1], 0.5));
    assert_eq!(s.coordinates[2], 0.0);
    // vx = 2x − 1, vy = 2y − 1: J = diag(2, 2).
    assert!(approx(s.analysis.trace, 4.0));
    assert!(approx(s.analysis.determinant, 4.0));
    assert_eq!(s.classification, Classification::NodalSource);
    assert_eq!(s.color, Classification::NodalSource.color());
}

#[test]
fn rotational_unit_cell_is_a_center() {
    let mesh = unit_cell([1.0, 1.0, -1.0, -1.0], [-1.0, 1.0, 1.0, -1.0]);
    let found = mesh.find_singularities();
    assert_eq!(found.len(), 1);
    assert!(approx(found[0].parametric[0], 0.5) && approx(found[0].parametric[1], 0.5));
    assert_eq!(found[0].analysis.trace, 0.0);
    assert_eq!(found[0].classification, Classification::Center);
}

#[test]
fn vertex_order_does_not_change_the_result() {
    let pos = [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]];
    let vec = [[1.0, 1.0], [-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]];
    let vertices = (0..4)
        .map(|i| Vertex::new([pos[i][0], pos[i][1], 0.0], [vec[i][0], vec[i][1], 0.0], 0.0))
        .collect();
    // Clockwise traversal starting at the top-right corner.
    let mesh = build_mesh(vertices, vec![[0, 3, 2, 1]]).unwrap();
    let found = mesh.find_singularities();
    assert_eq!(found.len(), 1);
    assert!(approx(found[0].coordinates[0], 0.5) && approx(found[0].coordinates[1], 0.5));
    assert_eq!(found[0].classification, Classification::NodalSource);
}

#[test]
fn zero_field_is_degenerate_without_panicking() {
    let mesh = unit_cell([0.0; 4], [0.0; 4]);
    assert!(mesh.find_singularities().is_empty());

    let err = locate_in_face(&mesh, 0).unwrap_err();
    assert!(err.is_recoverable());
    assert!(matches!(
        err,
        MeshError::DegenerateCell {
            face: 0,
            kind: DegeneracyKind::SingularLinearSystem
        }
    ));

    let report = mesh.analyze(&AnalysisConfig::default()).unwrap();
    assert!(report.singularities.is_empty());
    assert_eq!(report.degenerate_faces, vec![0]);
}

#[test]
fn out_of_range_face_is_invalid_geometry() {
    let mesh = unit_cell([1.0; 4], [1.0; 4]);
    assert!(matches!(
        locate_in_face(&mesh, 3),
        Err(MeshError::InvalidGeometry(_))
    ));
}

#[test]
fn root_on_shared_edge_belongs_to_no_cell() {
    // vx = x − 1, vy = y − 0.5 on [0,2]×[0,1] split at x = 1.
    let mesh = quad_mesh(2, 1, [0.0, 0.0], [2.0, 1.0], |x, y| [x - 1.0, y - 0.5]).unwrap();
    assert!(mesh.find_singularities().is_empty());
}

proptest! {
    #[test]
    fn roots_are_interior_with_small_residual(
        vx in prop::array::uniform4(-1.0..1.0f64),
        vy in prop::array::uniform4(-1.0..1.0f64),
    ) {
        let mesh = unit_cell(vx, vy);
        let scale = vx.iter().chain(vy.iter()).fold(0.0f64, |m, v| m.max(v.abs()));
        let field = mesh.faces()[0].field();
        for s in mesh.find_singularities() {
            let [u, v] = s.parametric;
            prop_assert!(u > 0.0 && u < 1.0 && v > 0.0 && v < 1.0);
            prop_assert_eq!(s.coordinates[2], 0.0);
            let [rx, ry] = field.sample_parametric(u, v);
            prop_assert!(rx.abs() <= 1e-7 * scale && ry.abs() <= 1e-7 * scale);
        }
    }
}
