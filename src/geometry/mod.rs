//! Geometry utilities for field-topology.
//!
//! This module provides the bilinear cell interpolant used by every
//! analysis stage, and bounding boxes over mesh vertices.

pub mod bilinear;
pub mod bounds;
