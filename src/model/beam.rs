//! Incident beam model.

use super::unit;
use crate::error::{CorrectionError, Result};
use nalgebra::Vector3;

/// Incident X-ray beam.
///
/// `s0` follows the reciprocal-space convention: it points from the source
/// through the sample and its length is `1 / wavelength`.
#[derive(Clone, Debug, PartialEq)]
pub struct Beam {
    s0: Vector3<f64>,
    polarization_normal: Vector3<f64>,
    polarization_fraction: f64,
}

impl Beam {
    /// Polarization fraction typical of a synchrotron undulator source.
    pub const SYNCHROTRON_POLARIZATION_FRACTION: f64 = 0.999;

    /// Create a beam from an explicit `s0`.
    ///
    /// The polarization normal is stored as a unit vector.
    pub fn new(
        s0: Vector3<f64>,
        polarization_normal: Vector3<f64>,
        polarization_fraction: f64,
    ) -> Result<Self> {
        unit(&s0, "beam s0")?;
        let polarization_normal = unit(&polarization_normal, "polarization normal")?;
        if !(0.0..=1.0).contains(&polarization_fraction) {
            return Err(CorrectionError::domain(format!(
                "polarization fraction must lie in [0, 1], got {}",
                polarization_fraction
            )));
        }

        Ok(Self {
            s0,
            polarization_normal,
            polarization_fraction,
        })
    }

    /// Create a beam from the direction towards the source and a wavelength.
    ///
    /// `s0 = -unit(direction) / wavelength`.
    pub fn from_wavelength(
        direction: Vector3<f64>,
        wavelength: f64,
        polarization_normal: Vector3<f64>,
        polarization_fraction: f64,
    ) -> Result<Self> {
        if !wavelength.is_finite() || wavelength <= 0.0 {
            return Err(CorrectionError::domain(format!(
                "wavelength must be positive, got {}",
                wavelength
            )));
        }
        let s0 = -unit(&direction, "beam direction")? / wavelength;
        Self::new(s0, polarization_normal, polarization_fraction)
    }

    /// Beam travelling along -z with the polarization plane normal along +y.
    pub fn along_minus_z(wavelength: f64, polarization_fraction: f64) -> Result<Self> {
        Self::from_wavelength(
            Vector3::new(0.0, 0.0, 1.0),
            wavelength,
            Vector3::new(0.0, 1.0, 0.0),
            polarization_fraction,
        )
    }

    #[inline]
    pub fn s0(&self) -> &Vector3<f64> {
        &self.s0
    }

    /// Unit vector along `s0`.
    #[inline]
    pub fn unit_s0(&self) -> Vector3<f64> {
        self.s0.normalize()
    }

    #[inline]
    pub fn wavelength(&self) -> f64 {
        1.0 / self.s0.norm()
    }

    #[inline]
    pub fn polarization_normal(&self) -> &Vector3<f64> {
        &self.polarization_normal
    }

    #[inline]
    pub fn polarization_fraction(&self) -> f64 {
        self.polarization_fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wavelength() {
        let beam = Beam::along_minus_z(0.5, 0.999).unwrap();
        assert!((beam.s0() - Vector3::new(0.0, 0.0, -2.0)).norm() < 1e-12);
        assert!((beam.wavelength() - 0.5).abs() < 1e-12);
        assert_eq!(beam.polarization_fraction(), 0.999);
    }

    #[test]
    fn test_polarization_normal_is_normalized() {
        let beam = Beam::new(
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 5.0, 0.0),
            0.5,
        )
        .unwrap();
        assert!((beam.polarization_normal().norm() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_beam() {
        assert!(Beam::new(Vector3::zeros(), Vector3::y(), 0.5).is_err());
        assert!(Beam::new(-Vector3::z(), Vector3::y(), 1.5).is_err());
        assert!(Beam::new(-Vector3::z(), Vector3::y(), -0.1).is_err());
        assert!(Beam::along_minus_z(0.0, 0.5).is_err());
    }
}
