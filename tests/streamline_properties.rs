use field_topology::algs::point_location::{CellGrid, LinearScan};
use field_topology::prelude::*;
use proptest::prelude::*;

fn assert_pass_bounded(mesh: &Mesh, line: &Streamline, max_steps: usize) {
    for pass in [&line.backward, &line.forward] {
        assert!(pass.points.len() <= max_steps);
        assert!(pass.points.iter().flatten().all(|c| c.is_finite()));
        let inside = match pass.termination {
            Termination::OutOfBounds => pass.points.len().saturating_sub(1),
            _ => pass.points.len(),
        };
        assert!(
            pass.points[..inside].iter().all(|p| mesh.bounds().contains(*p)),
            "{:?} pass left the box before terminating",
            pass.direction
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn streamlines_are_bounded_and_finite(
        coeffs in prop::array::uniform6(-2.0..2.0f64),
        seed in (0.0..=1.0f64, 0.0..=1.0f64),
        step_size in 0.005..0.5f64,
        max_steps in 1usize..200,
    ) {
        let [a, b, c, d, e, f] = coeffs;
        let mesh = quad_mesh(5, 4, [0.0, 0.0], [1.0, 1.0], |x, y| {
            [a * x + b * y + c, d * x + e * y + f]
        }).unwrap();
        let config = StreamlineConfig { step_size, max_steps, ..StreamlineConfig::default() };
        let integrator = StreamlineIntegrator::new(&mesh, config).unwrap();
        let line = integrator.trace([seed.0, seed.1, 0.0]);

        prop_assert!(line.len() <= 2 * max_steps);
        prop_assert_eq!(line.points().len(), line.len());
        assert_pass_bounded(&mesh, &line, max_steps);
    }
}

#[test]
fn one_streamline_per_singularity_seeded_at_it() {
    let mesh = quad_mesh(3, 3, [-1.0, -1.0], [1.0, 1.0], |x, y| [x, -y]).unwrap();
    let found = mesh.find_singularities();
    let lines = mesh.trace_streamlines(&found);
    assert_eq!(lines.len(), found.len());
    for (s, line) in found.iter().zip(&lines) {
        assert_eq!(line.seed, s.coordinates);
        assert_pass_bounded(&mesh, line, StreamlineConfig::default().max_steps);
    }
}

/// 2×2 grid over [0,2]² without the top-right face, flow along +x.
fn l_shaped() -> Mesh {
    let mut vertices = Vec::new();
    for j in 0..3 {
        for i in 0..3 {
            vertices.push(Vertex::new([i as f64, j as f64, 0.0], [1.0, 0.0, 0.0], 1.0));
        }
    }
    build_mesh(vertices, vec![[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6]]).unwrap()
}

fn assert_stops_at_the_notch<L: PointLocator>(mesh: &Mesh, locator: L) {
    let config = StreamlineConfig {
        step_size: 0.125,
        ..StreamlineConfig::default()
    };
    let integrator = StreamlineIntegrator::with_locator(mesh, locator, config).unwrap();
    let pass = integrator.trace_pass([0.5, 1.5, 0.0], Direction::Forward);

    assert_eq!(pass.termination, Termination::NoContainingCell);
    assert!(pass.termination.left_domain());
    let xs: Vec<f64> = pass.points.iter().map(|p| p[0]).collect();
    assert_eq!(xs, vec![0.625, 0.75, 0.875, 1.0, 1.125]);

    // Every point but the last lies in a face; the last is in the notch,
    // still inside the bounding box.
    let (last, inner) = pass.points.split_last().unwrap();
    let linear = LinearScan::new(mesh.faces());
    assert!(inner.iter().all(|p| linear.locate(p[0], p[1]).is_some()));
    assert_eq!(linear.locate(last[0], last[1]), None);
    assert!(mesh.bounds().contains(*last));
}

#[test]
fn pass_into_a_hole_ends_without_a_containing_cell() {
    let mesh = l_shaped();
    assert_stops_at_the_notch(&mesh, LinearScan::new(mesh.faces()));
    assert_stops_at_the_notch(&mesh, CellGrid::new(mesh.faces()));
    assert_stops_at_the_notch(&mesh, CellGrid::with_resolution(mesh.faces(), [5, 3]).unwrap());

    let integrator = StreamlineIntegrator::with_defaults(&mesh);
    let line = integrator.trace([0.5, 1.5, 0.0]);
    assert_eq!(line.forward.termination, Termination::NoContainingCell);
    assert_eq!(line.backward.termination, Termination::OutOfBounds);
}

#[test]
fn point_order_is_backward_reversed_then_forward() {
    let mesh = quad_mesh(2, 2, [0.0, 0.0], [1.0, 1.0], |_, _| [0.0, 1.0]).unwrap();
    let config = StreamlineConfig {
        step_size: 0.125,
        ..StreamlineConfig::default()
    };
    assert!(mesh.trace_streamlines_with(&[], &config).unwrap().is_empty());

    let integrator = StreamlineIntegrator::new(&mesh, config).unwrap();
    let line = integrator.trace([0.25, 0.5, 0.0]);
    let ys: Vec<f64> = line.points().iter().map(|p| p[1]).collect();
    assert_eq!(
        ys,
        vec![-0.125, 0.0, 0.125, 0.25, 0.375, 0.625, 0.75, 0.875, 1.0, 1.125]
    );
    assert_eq!(line.pass(Direction::Backward).points[0][1], 0.375);
}

#[test]
fn config_loads_from_json_with_defaults() {
    let config: StreamlineConfig = serde_json::from_str(r#"{ "step_size": 0.1 }"#).unwrap();
    assert_eq!(config.step_size, 0.1);
    assert_eq!(config.max_steps, StreamlineConfig::default().max_steps);
    assert_eq!(config.point_location, PointLocation::UniformGrid { resolution: None });

    let config: StreamlineConfig = serde_json::from_str(
        r#"{ "max_steps": 10, "point_location": { "strategy": "linear_scan" } }"#,
    )
    .unwrap();
    assert_eq!(config.point_location, PointLocation::LinearScan);

    let analysis: AnalysisConfig = serde_json::from_str(
        r#"{ "streamline": { "point_location": { "strategy": "uniform_grid", "resolution": [8, 4] } } }"#,
    )
    .unwrap();
    assert_eq!(
        analysis.streamline.point_location,
        PointLocation::UniformGrid { resolution: Some([8, 4]) }
    );
    assert_eq!(analysis.center_tolerance, AnalysisConfig::default().center_tolerance);

    let json = serde_json::to_string(&AnalysisConfig::default()).unwrap();
    let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, AnalysisConfig::default());
}

#[test]
fn oversized_resolution_from_json_is_rejected() {
    let mesh = quad_mesh(2, 2, [0.0, 0.0], [1.0, 1.0], |x, y| [x, y]).unwrap();
    for resolution in ["[100000, 100000]", "[18446744073709551615, 2]"] {
        let json = format!(
            r#"{{ "streamline": {{ "point_location": {{ "strategy": "uniform_grid", "resolution": {resolution} }} }} }}"#
        );
        let config: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert!(
            matches!(mesh.analyze(&config), Err(MeshError::InvalidConfig(_))),
            "resolution {resolution} accepted"
        );
    }
}

#[test]
fn zero_resolution_from_json_is_rejected() {
    let mesh = quad_mesh(2, 2, [0.0, 0.0], [1.0, 1.0], |x, y| [x, y]).unwrap();
    let config: AnalysisConfig = serde_json::from_str(
        r#"{ "streamline": { "point_location": { "strategy": "uniform_grid", "resolution": [0, 4] } } }"#,
    )
    .unwrap();
    assert!(matches!(mesh.analyze(&config), Err(MeshError::InvalidConfig(_))));
}
