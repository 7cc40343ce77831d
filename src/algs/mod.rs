//! Field-topology algorithms: singularity location, classification and
//! streamline tracing.

pub mod analysis;
pub mod classify;
pub mod point_location;
pub mod singularity;
pub mod streamline;
