//! MeshError: Unified error type for field-topology public APIs
//!
//! Every fallible operation in the crate (reading input, building a mesh,
//! validating configuration, locating singularities in one cell) reports
//! through this type instead of panicking.

use thiserror::Error;

/// Why a cell's root finder could not produce a well-defined answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegeneracyKind {
    /// The eliminated polynomial vanished identically (`A = B = 0`).
    CollapsedPolynomial,
    /// The field is linear in the cell and its 2×2 system is singular.
    SingularLinearSystem,
}

impl std::fmt::Display for DegeneracyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegeneracyKind::CollapsedPolynomial => f.write_str("eliminated polynomial vanishes"),
            DegeneracyKind::SingularLinearSystem => f.write_str("linear system is singular"),
        }
    }
}

/// Unified error type for field-topology operations.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Underlying reader failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed input file (1-based line number, 0 when not line specific).
    #[error("format error at line {line}: {message}")]
    Format { line: usize, message: String },
    /// A face is not an axis-aligned rectangle, or the mesh is otherwise unusable.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A cell whose root finder collapsed; recoverable, the cell is skipped.
    #[error("degenerate cell {face}: {kind}")]
    DegenerateCell { face: usize, kind: DegeneracyKind },
    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MeshError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        MeshError::Format {
            line,
            message: message.into(),
        }
    }

    /// Whether the error only affects a single cell and the analysis can go on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MeshError::DegenerateCell { .. })
    }
}
