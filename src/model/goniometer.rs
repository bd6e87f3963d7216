//! Single-axis goniometer model.

use super::unit;
use crate::error::Result;
use nalgebra::Vector3;

/// Rotation stage described by its (unit) rotation axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Goniometer {
    rotation_axis: Vector3<f64>,
}

impl Goniometer {
    /// Create a goniometer; the axis is normalized.
    pub fn new(rotation_axis: Vector3<f64>) -> Result<Self> {
        Ok(Self {
            rotation_axis: unit(&rotation_axis, "rotation axis")?,
        })
    }

    /// Goniometer rotating about +x.
    pub fn about_x() -> Self {
        Self {
            rotation_axis: Vector3::x(),
        }
    }

    #[inline]
    pub fn rotation_axis(&self) -> &Vector3<f64> {
        &self.rotation_axis
    }
}
