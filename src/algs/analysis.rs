//! One analysis pass over a mesh: locate, classify, trace.
//!
//! Faces are independent of each other, so with the `rayon` feature the face
//! loop and the per-seed tracing run on the rayon pool. Results come back in
//! face order (then root order within a face) either way.
//!
//! # Example
//! ```rust
//! use field_topology::algs::analysis::AnalysisConfig;
//! use field_topology::algs::classify::Classification;
//! use field_topology::mesh_generation::quad_mesh;
//!
//! // A saddle at the origin: vx = x, vy = −y.
//! let mesh = quad_mesh(3, 3, [-1.0, -1.0], [1.0, 1.0], |x, y| [x, -y])?;
//! let report = mesh.analyze(&AnalysisConfig::default())?;
//! assert_eq!(report.singularities.len(), 1);
//! assert_eq!(report.singularities[0].classification, Classification::SaddlePoint);
//! assert_eq!(report.streamlines.len(), 1);
//! # Ok::<(), field_topology::mesh_error::MeshError>(())
//! ```

use crate::algs::classify::DEFAULT_CENTER_TOLERANCE;
use crate::algs::point_location::PointLocator;
use crate::algs::singularity::{Singularity, classified_in_face};
use crate::algs::streamline::{Streamline, StreamlineConfig, StreamlineIntegrator};
use crate::mesh_error::MeshError;
use crate::topology::mesh::Mesh;
use serde::{Deserialize, Serialize};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Options for [`Mesh::analyze`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub streamline: StreamlineConfig,
    /// Relative tolerance under which a Jacobian trace counts as zero.
    pub center_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            streamline: StreamlineConfig::default(),
            center_tolerance: DEFAULT_CENTER_TOLERANCE,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), MeshError> {
        if !(self.center_tolerance.is_finite() && self.center_tolerance >= 0.0) {
            return Err(MeshError::InvalidConfig(format!(
                "center_tolerance must be finite and non-negative, got {}",
                self.center_tolerance
            )));
        }
        self.streamline.validate()
    }
}

/// Everything one pass produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub singularities: Vec<Singularity>,
    /// One streamline per singularity, same order.
    pub streamlines: Vec<Streamline>,
    /// Faces skipped because their root finder collapsed.
    pub degenerate_faces: Vec<usize>,
}

/// Singularities of all faces plus the indices of degenerate faces.
fn scan_faces(mesh: &Mesh, center_tolerance: f64) -> (Vec<Singularity>, Vec<usize>) {
    let visit = |face: usize| classified_in_face(mesh, face, center_tolerance);

    #[cfg(feature = "rayon")]
    let per_face: Vec<_> = (0..mesh.num_faces()).into_par_iter().map(visit).collect();
    #[cfg(not(feature = "rayon"))]
    let per_face: Vec<_> = (0..mesh.num_faces()).map(visit).collect();

    let mut singularities = Vec::new();
    let mut degenerate = Vec::new();
    for (face, outcome) in per_face.into_iter().enumerate() {
        match outcome {
            Ok(found) => singularities.extend(found),
            Err(err) => {
                log::debug!("no singularities taken from face {face}: {err}");
                degenerate.push(face);
            }
        }
    }
    if !degenerate.is_empty() {
        log::warn!(
            "{} of {} faces are degenerate and were skipped",
            degenerate.len(),
            mesh.num_faces()
        );
    }
    log::debug!(
        "found {} singularities in {} faces",
        singularities.len(),
        mesh.num_faces()
    );
    (singularities, degenerate)
}

fn trace_all<L>(integrator: &StreamlineIntegrator<'_, L>, seeds: &[Singularity]) -> Vec<Streamline>
where
    L: PointLocator + Sync,
{
    #[cfg(feature = "rayon")]
    let lines = seeds
        .par_iter()
        .map(|s| integrator.trace(s.coordinates))
        .collect();
    #[cfg(not(feature = "rayon"))]
    let lines = seeds
        .iter()
        .map(|s| integrator.trace(s.coordinates))
        .collect();
    lines
}

impl Mesh {
    /// Locate and classify the singularities of every face.
    ///
    /// Degenerate faces contribute nothing; see [`Mesh::analyze`] to learn
    /// which faces were skipped.
    pub fn find_singularities(&self) -> Vec<Singularity> {
        scan_faces(self, DEFAULT_CENTER_TOLERANCE).0
    }

    /// Trace one streamline per singularity with the default parameters.
    pub fn trace_streamlines(&self, singularities: &[Singularity]) -> Vec<Streamline> {
        trace_all(&StreamlineIntegrator::with_defaults(self), singularities)
    }

    /// Trace one streamline per singularity with explicit parameters.
    pub fn trace_streamlines_with(
        &self,
        singularities: &[Singularity],
        config: &StreamlineConfig,
    ) -> Result<Vec<Streamline>, MeshError> {
        let integrator = StreamlineIntegrator::new(self, *config)?;
        Ok(trace_all(&integrator, singularities))
    }

    /// Full pass: singularities, their streamlines and the degenerate faces.
    pub fn analyze(&self, config: &AnalysisConfig) -> Result<AnalysisReport, MeshError> {
        config.validate()?;
        let (singularities, degenerate_faces) = scan_faces(self, config.center_tolerance);
        let streamlines = self.trace_streamlines_with(&singularities, &config.streamline)?;
        Ok(AnalysisReport {
            singularities,
            streamlines,
            degenerate_faces,
        })
    }
}
