//! Classify critical points from the trace and determinant of the Jacobian.
//!
//! With `T = trace(J)`, `D = det(J)` and `Δ = T² − 4D` (the discriminant of
//! `λ² − Tλ + D`):
//!
//! | condition              | classification |
//! |------------------------|----------------|
//! | `D < 0`                | saddle point   |
//! | `Δ < 0`, `T ≈ 0`       | center         |
//! | `Δ < 0`                | focus          |
//! | `Δ ≥ 0`, `T > 0`       | nodal source   |
//! | `Δ ≥ 0`, `T < 0`       | nodal sink     |
//! | `T = D = 0`            | center         |
//!
//! `T ≈ 0` is judged relative to the largest Jacobian entry and only
//! applies to complex eigenvalues. With real eigenvalues the sign of `T`
//! decides, so a vanishing Jacobian is the only real case left as a center.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default relative tolerance under which the trace counts as zero.
pub const DEFAULT_CENTER_TOLERANCE: f64 = 1e-9;

/// Local flow behavior around a critical point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    NodalSource,
    NodalSink,
    SaddlePoint,
    Center,
    Focus,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Classification::NodalSource,
        Classification::NodalSink,
        Classification::SaddlePoint,
        Classification::Center,
        Classification::Focus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Classification::NodalSource => "nodal_source",
            Classification::NodalSink => "nodal_sink",
            Classification::SaddlePoint => "saddle_point",
            Classification::Center => "center",
            Classification::Focus => "focus",
        }
    }

    /// Palette color, RGB in `[0, 1]`.
    pub fn color(self) -> [f32; 3] {
        let rgb: [u8; 3] = match self {
            Classification::NodalSource => [249, 249, 249],
            Classification::NodalSink => [255, 224, 172],
            Classification::SaddlePoint => [255, 172, 183],
            Classification::Center => [104, 134, 197],
            Classification::Focus => [90, 164, 105],
        };
        rgb.map(|c| f32::from(c) / 255.0)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign of the eigenvalues' real part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    /// `T > 0`: trajectories move away (source, source-focus).
    Repelling,
    /// `T < 0`: trajectories move in (sink, sink-focus).
    Attracting,
    /// `T ≈ 0`.
    Neutral,
}

/// Eigenvalues of a real 2×2 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Eigenvalues {
    /// Two real eigenvalues, larger first.
    Real([f64; 2]),
    /// The conjugate pair `re ± i·im`, `im > 0`.
    Complex { re: f64, im: f64 },
}

/// Trace/determinant summary of a 2×2 Jacobian.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JacobianAnalysis {
    /// `[[∂vx/∂x, ∂vx/∂y], [∂vy/∂x, ∂vy/∂y]]`.
    pub jacobian: [[f64; 2]; 2],
    pub trace: f64,
    pub determinant: f64,
    /// `trace² − 4·determinant`.
    pub discriminant: f64,
}

impl JacobianAnalysis {
    pub fn new(jacobian: [[f64; 2]; 2]) -> Self {
        let [[a, b], [c, d]] = jacobian;
        let trace = a + d;
        let determinant = a * d - b * c;
        Self {
            jacobian,
            trace,
            determinant,
            discriminant: trace * trace - 4.0 * determinant,
        }
    }

    fn scale(&self) -> f64 {
        self.jacobian
            .iter()
            .flatten()
            .fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    fn trace_vanishes(&self, tolerance: f64) -> bool {
        self.trace.abs() <= tolerance * self.scale()
    }

    pub fn eigenvalues(&self) -> Eigenvalues {
        let half = 0.5 * self.trace;
        if self.discriminant >= 0.0 {
            let r = 0.5 * self.discriminant.sqrt();
            Eigenvalues::Real([half + r, half - r])
        } else {
            Eigenvalues::Complex {
                re: half,
                im: 0.5 * (-self.discriminant).sqrt(),
            }
        }
    }

    pub fn stability(&self, tolerance: f64) -> Stability {
        if self.trace_vanishes(tolerance) {
            Stability::Neutral
        } else if self.trace > 0.0 {
            Stability::Repelling
        } else {
            Stability::Attracting
        }
    }

    /// Five-way classification; `tolerance` is relative to the largest entry.
    pub fn classify(&self, tolerance: f64) -> Classification {
        if self.determinant < 0.0 {
            return Classification::SaddlePoint;
        }
        if self.discriminant < 0.0 {
            return match self.stability(tolerance) {
                Stability::Neutral => Classification::Center,
                _ => Classification::Focus,
            };
        }
        match self.stability(0.0) {
            Stability::Repelling => Classification::NodalSource,
            Stability::Attracting => Classification::NodalSink,
            Stability::Neutral => Classification::Center,
        }
    }
}
