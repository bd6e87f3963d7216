//! Experimental geometry carriers consumed by the correction engine.
//!
//! These are deliberately thin: they validate their inputs once at
//! construction and then only hand out vectors and scalars.

pub mod beam;
pub mod detector;
pub mod goniometer;

pub use beam::Beam;
pub use detector::{Detector, Panel};
pub use goniometer::Goniometer;

use crate::error::{CorrectionError, Result};
use nalgebra::Vector3;

/// Vectors or magnitudes below this are treated as zero.
pub const GEOMETRY_EPSILON: f64 = 1e-10;

/// Normalize `v`, rejecting zero-length or non-finite vectors.
pub(crate) fn unit(v: &Vector3<f64>, what: &str) -> Result<Vector3<f64>> {
    let norm = v.norm();
    if !norm.is_finite() || norm < GEOMETRY_EPSILON {
        return Err(CorrectionError::domain(format!(
            "{} must be a finite non-zero vector, got {:?}",
            what,
            v.as_slice()
        )));
    }
    Ok(v / norm)
}
