//! Locate critical points of the bilinear field inside each cell.
//!
//! With `f` and `g` the interpolants of `vx` and `vy`, a cell's singularities
//! are the parameters `(s, t) ∈ (0,1)²` where both vanish. The cross term is
//! eliminated through the line `a11·g − b11·f = c00 + c10·s + c01·t = 0`:
//!
//! ```text
//! c00 = a11·b00 − a00·b11    c10 = a11·b10 − a10·b11    c01 = a11·b01 − a01·b11
//! A = −a11·c10    B = −(a11·c00 + a01·c10 − a10·c01)    C = a00·c01 − a01·c00
//! ```
//!
//! and `A·s² + B·s + C = 0` is solved for `s`, with `t` read back off the
//! line. When both cross terms vanish the field is linear and the 2×2 system
//! is solved directly; when `A = 0` the polynomial is solved as a line.
//! Roots on the cell boundary are dropped, so a singularity exactly on a
//! shared edge belongs to no cell.
//!
//! Singularities are planar: the returned `z` is always `0`.

use crate::algs::classify::{Classification, JacobianAnalysis};
use crate::geometry::bilinear::{BilinearPatch, CellField, Component};
use crate::mesh_error::{DegeneracyKind, MeshError};
use crate::topology::mesh::Mesh;
use crate::topology::vertex::Point3;
use serde::{Deserialize, Serialize};

/// Relative size below which a coefficient counts as zero.
const EPS: f64 = 1e-12;
/// Relative residual a root must reach in both components to be accepted.
const RESIDUAL_TOL: f64 = 1e-8;
/// Parametric distance below which two accepted roots are the same root.
const ROOT_MERGE_TOL: f64 = 1e-9;

/// A classified critical point of the interpolated field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Singularity {
    pub classification: Classification,
    /// World position; `z` is fixed at `0`.
    pub coordinates: Point3,
    /// Display color of the classification, components in `[0, 1]`.
    pub color: [f32; 3],
    /// Index of the face the root was found in.
    pub face: usize,
    /// Cell-local `(s, t)`, strictly inside `(0,1)²`.
    pub parametric: [f64; 2],
    pub analysis: JacobianAnalysis,
}

/// An unclassified root of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRoot {
    pub parametric: [f64; 2],
    pub coordinates: Point3,
}

/// Find the singularities of face `face` of `mesh`.
///
/// Returns [`MeshError::DegenerateCell`] when the cell's equations collapse
/// and no finite root set can be extracted; callers treat that cell as
/// having no singularities.
pub fn locate_in_face(mesh: &Mesh, face: usize) -> Result<Vec<CellRoot>, MeshError> {
    let quad = mesh.face(face).ok_or_else(|| {
        MeshError::InvalidGeometry(format!(
            "face {face} out of range, mesh has {}",
            mesh.num_faces()
        ))
    })?;
    locate_in_cell(quad.field()).map_err(|kind| MeshError::DegenerateCell { face, kind })
}

/// Find the interior roots of one cell field.
pub fn locate_in_cell(field: &CellField) -> Result<Vec<CellRoot>, DegeneracyKind> {
    let f = field.patch(Component::Vx);
    let g = field.patch(Component::Vy);
    let roots = parametric_roots(f, g)?;
    Ok(roots
        .into_iter()
        .map(|[s, t]| {
            let [x, y] = field.frame().to_world(s, t);
            CellRoot {
                parametric: [s, t],
                coordinates: [x, y, 0.0],
            }
        })
        .collect())
}

/// Common zeros of `f` and `g` strictly inside the unit square.
pub fn parametric_roots(
    f: &BilinearPatch,
    g: &BilinearPatch,
) -> Result<Vec<[f64; 2]>, DegeneracyKind> {
    let scale = f.scale().max(g.scale());
    let tiny = EPS * scale;

    let candidates = if f.a11.abs() <= tiny && g.a11.abs() <= tiny {
        vec![solve_linear_system(f, g, scale)?]
    } else if f.a11.abs() >= g.a11.abs() {
        eliminate(f, g)?
    } else {
        // Substituting into the component with the larger cross term keeps
        // the eliminated polynomial from collapsing; the root set is the same.
        eliminate(g, f)?
    };

    let residual_tol = RESIDUAL_TOL * scale;
    let mut roots: Vec<[f64; 2]> = Vec::with_capacity(candidates.len());
    for [s, t] in candidates {
        let interior = s > 0.0 && s < 1.0 && t > 0.0 && t < 1.0;
        if !interior {
            continue;
        }
        if f.value(s, t).abs() > residual_tol || g.value(s, t).abs() > residual_tol {
            continue;
        }
        let seen = roots
            .iter()
            .any(|r| (r[0] - s).abs() <= ROOT_MERGE_TOL && (r[1] - t).abs() <= ROOT_MERGE_TOL);
        if seen {
            continue;
        }
        roots.push([s, t]);
    }
    Ok(roots)
}

/// `a00 + a10·s + a01·t = 0`, `b00 + b10·s + b01·t = 0` by Cramer's rule.
fn solve_linear_system(
    f: &BilinearPatch,
    g: &BilinearPatch,
    scale: f64,
) -> Result<[f64; 2], DegeneracyKind> {
    let det = f.a10 * g.a01 - f.a01 * g.a10;
    if det.abs() <= EPS * scale * scale {
        return Err(DegeneracyKind::SingularLinearSystem);
    }
    Ok([
        (f.a01 * g.a00 - f.a00 * g.a01) / det,
        (f.a00 * g.a10 - f.a10 * g.a00) / det,
    ])
}

/// Eliminate `t` and substitute into `p`, whose cross term is non-zero.
///
/// A polynomial that vanishes relative to the patches means `p` and `q`
/// share a whole curve of zeros: [`DegeneracyKind::CollapsedPolynomial`].
fn eliminate(p: &BilinearPatch, q: &BilinearPatch) -> Result<Vec<[f64; 2]>, DegeneracyKind> {
    let c00 = p.a11 * q.a00 - p.a00 * q.a11;
    let c10 = p.a11 * q.a10 - p.a10 * q.a11;
    let c01 = p.a11 * q.a01 - p.a01 * q.a11;

    let a = -p.a11 * c10;
    let b = -(p.a11 * c00 + p.a01 * c10 - p.a10 * c01);
    let c = p.a00 * c01 - p.a01 * c00;

    let patch_scale = p.scale().max(q.scale());
    if a.abs().max(b.abs()).max(c.abs()) <= EPS * patch_scale.powi(3) {
        return Err(DegeneracyKind::CollapsedPolynomial);
    }

    let line_scale = c00.abs().max(c10.abs()).max(c01.abs());
    let mut out = Vec::with_capacity(2);
    for s in real_roots(a, b, c)? {
        let t = if c01.abs() > EPS * line_scale {
            -c00 / c01 - (c10 / c01) * s
        } else {
            // The line is vertical in (s, t); read t back off `p` instead.
            let slope = p.dt(s);
            if slope.abs() <= EPS * p.scale() {
                continue;
            }
            -(p.a00 + p.a10 * s) / slope
        };
        out.push([s, t]);
    }
    Ok(out)
}

/// Real roots of `a·s² + b·s + c`, degrading to the linear case when `a = 0`.
///
/// A non-zero constant has no roots. A discriminant lost in rounding
/// against `b²` and `4ac` is a repeated root. Otherwise both quadratic
/// roots come from the cancellation-free pair
/// `q = −(b + sign(b)·√disc)/2`, `s = q/a`, `s = c/q`.
///
/// Fails with [`DegeneracyKind::CollapsedPolynomial`] only when every
/// coefficient is zero or one is not finite.
pub fn real_roots(a: f64, b: f64, c: f64) -> Result<Vec<f64>, DegeneracyKind> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 || !scale.is_finite() {
        return Err(DegeneracyKind::CollapsedPolynomial);
    }
    let tiny = EPS * scale;
    if a.abs() <= tiny {
        if b.abs() <= tiny {
            return Ok(Vec::new());
        }
        return Ok(vec![-c / b]);
    }

    let b2 = b * b;
    let four_ac = 4.0 * a * c;
    let disc = b2 - four_ac;
    if disc.abs() <= EPS * b2.max(four_ac.abs()) {
        Ok(vec![-b / (2.0 * a)])
    } else if disc < 0.0 {
        Ok(Vec::new())
    } else {
        // disc > 0 keeps q away from zero.
        let q = -0.5 * (b + b.signum() * disc.sqrt());
        Ok(vec![q / a, c / q])
    }
}

/// Locate and classify every singularity of one face.
pub(crate) fn classified_in_face(
    mesh: &Mesh,
    face: usize,
    center_tolerance: f64,
) -> Result<Vec<Singularity>, MeshError> {
    let roots = locate_in_face(mesh, face)?;
    let field = mesh.faces()[face].field();
    Ok(roots
        .into_iter()
        .map(|root| {
            let [s, t] = root.parametric;
            let analysis = JacobianAnalysis::new(field.jacobian(s, t));
            let classification = analysis.classify(center_tolerance);
            Singularity {
                classification,
                coordinates: root.coordinates,
                color: classification.color(),
                face,
                parametric: root.parametric,
                analysis,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sorted(mut v: Vec<f64>) -> Vec<f64> {
        v.sort_by(|a, b| a.total_cmp(b));
        v
    }

    #[test]
    fn quadratic_two_roots() {
        let r = sorted(real_roots(1.0, -3.0, 2.0).unwrap());
        assert!(approx(r[0], 1.0) && approx(r[1], 2.0));
    }

    #[test]
    fn quadratic_repeated_root() {
        let r = real_roots(1.0, -1.0, 0.25).unwrap();
        assert_eq!(r, vec![0.5]);
    }

    #[test]
    fn quadratic_without_real_roots() {
        assert!(real_roots(1.0, 0.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn quadratic_with_zero_linear_term() {
        let r = sorted(real_roots(4.0, 0.0, -1.0).unwrap());
        assert!(approx(r[0], -0.5) && approx(r[1], 0.5));
    }

    #[test]
    fn linear_case_is_solved() {
        assert_eq!(real_roots(0.0, 2.0, -1.0).unwrap(), vec![0.5]);
    }

    #[test]
    fn collapsed_polynomial_is_degenerate() {
        assert_eq!(
            real_roots(0.0, 0.0, 0.0),
            Err(DegeneracyKind::CollapsedPolynomial)
        );
        assert_eq!(
            real_roots(f64::NAN, 1.0, 0.0),
            Err(DegeneracyKind::CollapsedPolynomial)
        );
    }

    #[test]
    fn nonzero_constant_has_no_roots() {
        assert_eq!(real_roots(0.0, 0.0, 3.0), Ok(Vec::new()));
        assert_eq!(real_roots(1e-15, -1e-14, 3.0), Ok(Vec::new()));
    }

    #[test]
    fn rounded_discriminant_is_a_repeated_root() {
        // 0.2² and 4·0.01 differ only by rounding.
        assert_eq!(real_roots(1.0, -0.2, 0.01).unwrap(), vec![0.1]);
        assert_eq!(real_roots(-1.0, 0.7, -0.1225).unwrap(), vec![0.35]);
    }

    #[test]
    fn linear_field_root_at_center() {
        let f = BilinearPatch::from_corners([-1.0, 1.0, 1.0, -1.0]);
        let g = BilinearPatch::from_corners([-1.0, -1.0, 1.0, 1.0]);
        let roots = parametric_roots(&f, &g).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(approx(roots[0][0], 0.5) && approx(roots[0][1], 0.5));
    }

    #[test]
    fn cross_term_only_in_second_component() {
        // f = s − 0.25 has no cross term; g = (s + 0.5)(t − 0.75).
        let f = BilinearPatch::from_corners([-0.25, 0.75, 0.75, -0.25]);
        let g_at = |s: f64, t: f64| (s + 0.5) * (t - 0.75);
        let g = BilinearPatch::from_corners([g_at(0.0, 0.0), g_at(1.0, 0.0), g_at(1.0, 1.0), g_at(0.0, 1.0)]);
        assert!(f.a11.abs() < 1e-15);
        let roots = parametric_roots(&f, &g).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(approx(roots[0][0], 0.25) && approx(roots[0][1], 0.75));
    }

    #[test]
    fn two_roots_in_one_cell() {
        // f = s·t − 0.16, g = s − t: s = t = ±0.4, only the positive root is inside.
        let f_at = |s: f64, t: f64| s * t - 0.16;
        let g_at = |s: f64, t: f64| s - t;
        let patch = |h: &dyn Fn(f64, f64) -> f64| {
            BilinearPatch::from_corners([h(0.0, 0.0), h(1.0, 0.0), h(1.0, 1.0), h(0.0, 1.0)])
        };
        let roots = parametric_roots(&patch(&f_at), &patch(&g_at)).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(approx(roots[0][0], 0.4) && approx(roots[0][1], 0.4));

        // f = s·t − 0.5·s − 0.5·t + 0.2275, g = s − t: s = t = 0.5 ± 0.15.
        let f_at = |s: f64, t: f64| s * t - 0.5 * s - 0.5 * t + 0.2275;
        let roots = parametric_roots(&patch(&f_at), &patch(&g_at)).unwrap();
        let mut ss: Vec<f64> = roots.iter().map(|r| r[0]).collect();
        ss.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(ss.len(), 2);
        assert!(approx(ss[0], 0.35) && approx(ss[1], 0.65));
    }

    fn patch(h: &dyn Fn(f64, f64) -> f64) -> BilinearPatch {
        BilinearPatch::from_corners([h(0.0, 0.0), h(1.0, 0.0), h(1.0, 1.0), h(0.0, 1.0)])
    }

    #[test]
    fn tangent_curves_give_one_root() {
        // The hyperbola s·t = r² touches the line s + t = 2r at s = t = r.
        // The discriminant rounds to a tiny negative value at r = 0.043 and
        // a tiny positive one at r = 0.013.
        for r in [0.043, 0.013, 0.1, 0.35] {
            let f_at = move |s: f64, t: f64| 0.3 * (s * t - r * r);
            let g_at = move |s: f64, t: f64| 0.3 * (s + t - 2.0 * r);
            let roots = parametric_roots(&patch(&f_at), &patch(&g_at)).unwrap();
            assert_eq!(roots.len(), 1, "r = {r}: {roots:?}");
            assert!((roots[0][0] - r).abs() < 1e-6 && (roots[0][1] - r).abs() < 1e-6);
        }
    }

    #[test]
    fn inconsistent_cell_has_no_roots() {
        // f = s·t + 1 never vanishes on g = t = 0.
        let f = BilinearPatch::from_corners([1.0, 1.0, 2.0, 1.0]);
        let g = BilinearPatch::from_corners([0.0, 0.0, 1.0, 1.0]);
        assert_eq!(parametric_roots(&f, &g), Ok(Vec::new()));
    }

    #[test]
    fn shared_zero_curve_is_degenerate() {
        let f = BilinearPatch::from_corners([-0.25, -0.25, 0.75, -0.25]);
        assert_eq!(
            parametric_roots(&f, &f),
            Err(DegeneracyKind::CollapsedPolynomial)
        );
        let doubled = BilinearPatch::from_corners([-0.5, -0.5, 1.5, -0.5]);
        assert_eq!(
            parametric_roots(&f, &doubled),
            Err(DegeneracyKind::CollapsedPolynomial)
        );
    }

    #[test]
    fn zero_field_is_degenerate() {
        let zero = BilinearPatch::from_corners([0.0; 4]);
        assert!(parametric_roots(&zero, &zero).is_err());
    }

    #[test]
    fn boundary_roots_are_dropped() {
        // Root exactly at s = 0.
        let f = BilinearPatch::from_corners([0.0, 1.0, 1.0, 0.0]);
        let g = BilinearPatch::from_corners([-0.5, -0.5, 0.5, 0.5]);
        assert!(parametric_roots(&f, &g).unwrap().is_empty());
    }
}
