//! Bilinear interpolation of a vector field over one axis-aligned cell.
//!
//! # Corner ordering
//! Every cell stores its samples in the order
//! `[(x1, y1), (x2, y1), (x2, y2), (x1, y2)]`, i.e. parametric corners
//! `(0,0), (1,0), (1,1), (0,1)`. A component is interpolated as
//!
//! ```text
//! f(s, t) = a00 + a10·s + a01·t + a11·s·t
//! ```
//!
//! with `a00 = f(0,0)`, `a10 = f(1,0) − f(0,0)`, `a01 = f(0,1) − f(0,0)` and
//! `a11 = f(0,0) − f(1,0) − f(0,1) + f(1,1)`.
//!
//! # Example
//! ```rust
//! use field_topology::geometry::bilinear::{BilinearPatch, CellFrame};
//!
//! let patch = BilinearPatch::from_corners([-1.0, 1.0, 1.0, -1.0]);
//! assert_eq!(patch.value(1.0, 0.0), 1.0);
//! assert_eq!(patch.value(0.5, 0.5), 0.0);
//!
//! let frame = CellFrame::new([2.0, 4.0], [0.0, 1.0]);
//! assert_eq!(frame.to_parametric(3.0, 0.25), [0.5, 0.25]);
//! assert_eq!(frame.to_world(0.5, 0.25), [3.0, 0.25]);
//! ```

use serde::{Deserialize, Serialize};

/// One of the two in-plane vector components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Vx,
    Vy,
}

impl Component {
    /// Both components, in `[vx, vy]` order.
    pub const ALL: [Component; 2] = [Component::Vx, Component::Vy];

    /// Select this component from a `(vx, vy, vz)` sample.
    #[inline]
    pub fn of(self, vector: &[f64; 3]) -> f64 {
        match self {
            Component::Vx => vector[0],
            Component::Vy => vector[1],
        }
    }
}

/// Bilinear interpolant of one scalar component over the unit square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BilinearPatch {
    corners: [f64; 4],
    pub a00: f64,
    pub a10: f64,
    pub a01: f64,
    pub a11: f64,
}

impl BilinearPatch {
    /// Build from samples at `(0,0), (1,0), (1,1), (0,1)`.
    pub fn from_corners(corners: [f64; 4]) -> Self {
        let [f00, f10, f11, f01] = corners;
        Self {
            corners,
            a00: f00,
            a10: f10 - f00,
            a01: f01 - f00,
            a11: f00 - f10 - f01 + f11,
        }
    }

    /// Corner samples in `(0,0), (1,0), (1,1), (0,1)` order.
    #[inline]
    pub fn corners(&self) -> [f64; 4] {
        self.corners
    }

    /// Interpolated value at parametric `(s, t)`.
    ///
    /// Evaluated with Lagrange weights so corner parameters reproduce the
    /// stored samples bit for bit.
    #[inline]
    pub fn value(&self, s: f64, t: f64) -> f64 {
        let [f00, f10, f11, f01] = self.corners;
        let (u, v) = (1.0 - s, 1.0 - t);
        u * v * f00 + s * v * f10 + s * t * f11 + u * t * f01
    }

    /// `∂f/∂s` at parameter `t`.
    #[inline]
    pub fn ds(&self, t: f64) -> f64 {
        self.a10 + self.a11 * t
    }

    /// `∂f/∂t` at parameter `s`.
    #[inline]
    pub fn dt(&self, s: f64) -> f64 {
        self.a01 + self.a11 * s
    }

    /// Largest coefficient magnitude, used to scale tolerances.
    pub fn scale(&self) -> f64 {
        self.a00
            .abs()
            .max(self.a10.abs())
            .max(self.a01.abs())
            .max(self.a11.abs())
    }
}

/// Physical extents of an axis-aligned cell, `x1 < x2` and `y1 < y2`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellFrame {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl CellFrame {
    pub fn new(x: [f64; 2], y: [f64; 2]) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x[1] - self.x[0]
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y[1] - self.y[0]
    }

    /// Whether `(x, y)` lies in the closed extent of the cell.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x[0] && x <= self.x[1] && y >= self.y[0] && y <= self.y[1]
    }

    /// World → parametric: `s = (x − x1)/(x2 − x1)`, `t = (y − y1)/(y2 − y1)`.
    #[inline]
    pub fn to_parametric(&self, x: f64, y: f64) -> [f64; 2] {
        [
            (x - self.x[0]) / self.width(),
            (y - self.y[0]) / self.height(),
        ]
    }

    /// Parametric → world by linear interpolation along each axis.
    #[inline]
    pub fn to_world(&self, s: f64, t: f64) -> [f64; 2] {
        [
            self.x[0] + s * self.width(),
            self.y[0] + t * self.height(),
        ]
    }
}

/// The `vx`/`vy` interpolants of one cell together with its frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellField {
    frame: CellFrame,
    vx: BilinearPatch,
    vy: BilinearPatch,
}

impl CellField {
    /// `samples` holds the corner vectors in cell corner order.
    pub fn new(frame: CellFrame, samples: [[f64; 3]; 4]) -> Self {
        let pick = |c: Component| {
            BilinearPatch::from_corners([
                c.of(&samples[0]),
                c.of(&samples[1]),
                c.of(&samples[2]),
                c.of(&samples[3]),
            ])
        };
        Self {
            frame,
            vx: pick(Component::Vx),
            vy: pick(Component::Vy),
        }
    }

    #[inline]
    pub fn frame(&self) -> &CellFrame {
        &self.frame
    }

    #[inline]
    pub fn patch(&self, component: Component) -> &BilinearPatch {
        match component {
            Component::Vx => &self.vx,
            Component::Vy => &self.vy,
        }
    }

    /// `[vx, vy]` at parametric `(s, t)`.
    #[inline]
    pub fn sample_parametric(&self, s: f64, t: f64) -> [f64; 2] {
        [self.vx.value(s, t), self.vy.value(s, t)]
    }

    /// `[vx, vy]` at world `(x, y)`.
    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> [f64; 2] {
        let [s, t] = self.frame.to_parametric(x, y);
        self.sample_parametric(s, t)
    }

    /// `[∂f/∂x, ∂f/∂y]` of one component at parametric `(s, t)`.
    ///
    /// Chain rule through the affine world → parametric map.
    pub fn gradient(&self, component: Component, s: f64, t: f64) -> [f64; 2] {
        let patch = self.patch(component);
        [
            patch.ds(t) / self.frame.width(),
            patch.dt(s) / self.frame.height(),
        ]
    }

    /// `[[∂vx/∂x, ∂vx/∂y], [∂vy/∂x, ∂vy/∂y]]` at parametric `(s, t)`.
    pub fn jacobian(&self, s: f64, t: f64) -> [[f64; 2]; 2] {
        [
            self.gradient(Component::Vx, s, t),
            self.gradient(Component::Vy, s, t),
        ]
    }
}
