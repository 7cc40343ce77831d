//! Fixed-step streamline tracing through the interpolated field.
//!
//! Each pass starts at the seed and repeats:
//!
//! 1. stop (`OutOfBounds`) if the current point left the mesh bounding box;
//! 2. stop (`StepLimit`) once `max_steps` points were produced;
//! 3. stop (`NoContainingCell`) if no face contains the point;
//! 4. interpolate `(vx, vy)`, normalize `(vx, vy, z)` (stop with
//!    `Stagnation` on a zero norm), step by `± step_size` along it and record
//!    the new point.
//!
//! Only the last point of a pass can lie outside the bounding box, and it
//! does so only when the pass ended with `OutOfBounds`.

use crate::algs::point_location::{CellGrid, Locator, PointLocation, PointLocator};
use crate::mesh_error::MeshError;
use crate::topology::mesh::Mesh;
use crate::topology::vertex::Point3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STEP_SIZE: f64 = 0.05;
pub const DEFAULT_MAX_STEPS: usize = 400;

/// Integration parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamlineConfig {
    /// Distance advanced per step, world units.
    pub step_size: f64,
    /// Points recorded per direction at most.
    pub max_steps: usize,
    pub point_location: PointLocation,
}

impl Default for StreamlineConfig {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            max_steps: DEFAULT_MAX_STEPS,
            point_location: PointLocation::default(),
        }
    }
}

impl StreamlineConfig {
    pub fn validate(&self) -> Result<(), MeshError> {
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(MeshError::InvalidConfig(format!(
                "step_size must be positive and finite, got {}",
                self.step_size
            )));
        }
        self.point_location.validate()
    }
}

/// Integration direction along the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Why a pass stopped. None of these are errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The current point left the mesh bounding box.
    OutOfBounds,
    /// No face contains the current point.
    NoContainingCell,
    /// The field direction is zero or not finite.
    Stagnation,
    /// `max_steps` points were produced.
    StepLimit,
}

impl Termination {
    /// Whether the pass ended by leaving the mesh domain.
    pub fn left_domain(self) -> bool {
        matches!(self, Termination::OutOfBounds | Termination::NoContainingCell)
    }
}

/// Points traced in one direction, excluding the seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamlinePass {
    pub direction: Direction,
    pub points: Vec<Point3>,
    pub termination: Termination,
}

/// Backward and forward passes from one seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Streamline {
    pub seed: Point3,
    pub backward: StreamlinePass,
    pub forward: StreamlinePass,
}

impl Streamline {
    /// The backward pass reversed, followed by the forward pass.
    pub fn points(&self) -> Vec<Point3> {
        self.backward
            .points
            .iter()
            .rev()
            .chain(self.forward.points.iter())
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.backward.points.len() + self.forward.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pass(&self, direction: Direction) -> &StreamlinePass {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }
}

/// Traces streamlines over one mesh with one point locator.
#[derive(Clone, Debug)]
pub struct StreamlineIntegrator<'a, L = Locator<'a>> {
    mesh: &'a Mesh,
    locator: L,
    config: StreamlineConfig,
}

impl<'a> StreamlineIntegrator<'a> {
    /// Integrator with the locator selected by `config.point_location`.
    pub fn new(mesh: &'a Mesh, config: StreamlineConfig) -> Result<Self, MeshError> {
        config.validate()?;
        let locator = Locator::new(mesh, &config.point_location)?;
        Ok(Self {
            mesh,
            locator,
            config,
        })
    }

    /// Default parameters with an automatically sized grid.
    pub fn with_defaults(mesh: &'a Mesh) -> Self {
        Self {
            mesh,
            locator: Locator::Grid(CellGrid::new(mesh.faces())),
            config: StreamlineConfig::default(),
        }
    }
}

impl<'a, L: PointLocator> StreamlineIntegrator<'a, L> {
    /// Integrator over a caller-supplied locator; `config.point_location` is ignored.
    pub fn with_locator(mesh: &'a Mesh, locator: L, config: StreamlineConfig) -> Result<Self, MeshError> {
        config.validate()?;
        Ok(Self {
            mesh,
            locator,
            config,
        })
    }

    pub fn config(&self) -> &StreamlineConfig {
        &self.config
    }

    /// Trace both directions from `seed`.
    pub fn trace(&self, seed: Point3) -> Streamline {
        Streamline {
            seed,
            backward: self.trace_pass(seed, Direction::Backward),
            forward: self.trace_pass(seed, Direction::Forward),
        }
    }

    /// Trace one direction from `seed`.
    pub fn trace_pass(&self, seed: Point3, direction: Direction) -> StreamlinePass {
        let step = direction.sign() * self.config.step_size;
        let bounds = self.mesh.bounds();
        let mut points = Vec::new();
        let mut curr = seed;

        let termination = loop {
            if !bounds.contains(curr) {
                break Termination::OutOfBounds;
            }
            if points.len() >= self.config.max_steps {
                break Termination::StepLimit;
            }
            let unit = match self.unit_direction(curr) {
                Ok(unit) => unit,
                Err(reason) => break reason,
            };
            for axis in 0..3 {
                curr[axis] += step * unit[axis];
            }
            points.push(curr);
        };

        log::trace!(
            "{direction:?} pass from {seed:?}: {} points, {termination:?}",
            points.len()
        );
        StreamlinePass {
            direction,
            points,
            termination,
        }
    }

    /// Normalized `(vx, vy, z)` at `p`.
    fn unit_direction(&self, p: Point3) -> Result<[f64; 3], Termination> {
        let face = self
            .locator
            .locate(p[0], p[1])
            .ok_or(Termination::NoContainingCell)?;
        let [vx, vy] = self.mesh.faces()[face].field().sample(p[0], p[1]);
        let v = [vx, vy, p[2]];
        let norm = v.iter().map(|c| c * c).sum::<f64>().sqrt();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(Termination::Stagnation);
        }
        Ok(v.map(|c| c / norm))
    }
}
