//! Closed-form correction factors.
//!
//! Both functions are pure: they take plain vectors and scalars and do not
//! depend on any experiment context.
//!
//! # Lorentz-polarization
//!
//! ```text
//! P1  = (pn · s1) / |s1|
//! P3  = (s0 · s1) / (|s0| |s1|)                   cos 2θ
//! P   = (1 - 2 pf) (1 - P1²) + pf (1 + P3²)
//! L⁻¹ = |s1 · (m2 × s0)| / (|s1| |s0|)
//! lp  = L⁻¹ / P
//! ```
//!
//! # Detector quantum efficiency
//!
//! ```text
//! cos θ = -n̂ · ŝ1
//! dqe   = 1 / (1 - exp(-mu t0 / cos θ))
//! ```

use crate::error::{CorrectionError, Result};
use crate::model::{unit, GEOMETRY_EPSILON};
use nalgebra::Vector3;

/// Combined Lorentz-polarization correction for one reflection.
///
/// # Arguments
/// * `s0` - Incident beam vector
/// * `pn` - Normal to the polarization plane
/// * `pf` - Polarization fraction in [0, 1]
/// * `m2` - Rotation axis
/// * `s1` - Diffracted beam vector
///
/// # Errors
/// `Domain` for zero vectors, `pf` outside [0, 1], `s1` parallel to `s0`,
/// a reflection in the blind region of the rotation axis, or a vanishing
/// polarization factor.
pub fn lp_correction(
    s0: &Vector3<f64>,
    pn: &Vector3<f64>,
    pf: f64,
    m2: &Vector3<f64>,
    s1: &Vector3<f64>,
) -> Result<f64> {
    if !(0.0..=1.0).contains(&pf) {
        return Err(CorrectionError::domain(format!(
            "polarization fraction must lie in [0, 1], got {}",
            pf
        )));
    }

    let s0_unit = unit(s0, "s0")?;
    let s1_unit = unit(s1, "s1")?;
    let pn = unit(pn, "polarization normal")?;
    let m2 = unit(m2, "rotation axis")?;

    if s1_unit.cross(&s0_unit).norm() < GEOMETRY_EPSILON {
        return Err(CorrectionError::domain("s1 is parallel to s0"));
    }

    let inverse_lorentz = s1_unit.dot(&m2.cross(&s0_unit)).abs();
    if inverse_lorentz < GEOMETRY_EPSILON {
        return Err(CorrectionError::domain(
            "reflection lies in the blind region of the rotation axis",
        ));
    }

    let p1 = pn.dot(&s1_unit);
    let p3 = s0_unit.dot(&s1_unit);
    let polarization = (1.0 - 2.0 * pf) * (1.0 - p1 * p1) + pf * (1.0 + p3 * p3);
    if polarization < GEOMETRY_EPSILON {
        return Err(CorrectionError::domain("polarization factor vanishes for this reflection"));
    }

    Ok(inverse_lorentz / polarization)
}

/// Detector quantum-efficiency correction for one reflection.
///
/// # Arguments
/// * `mu` - Linear attenuation coefficient of the sensor
/// * `t0` - Nominal sensor thickness (same length unit as `1 / mu`)
/// * `s1` - Diffracted beam vector
/// * `n` - Outward panel normal, facing the sample
///
/// # Errors
/// `Domain` when the ray does not enter the sensor face (`cos θ <= 0`),
/// for non-positive `mu` or `t0`, or for zero vectors.
pub fn dqe_correction(mu: f64, t0: f64, s1: &Vector3<f64>, n: &Vector3<f64>) -> Result<f64> {
    if !mu.is_finite() || mu <= 0.0 {
        return Err(CorrectionError::domain(format!(
            "attenuation coefficient must be positive, got {}",
            mu
        )));
    }
    if !t0.is_finite() || t0 <= 0.0 {
        return Err(CorrectionError::domain(format!(
            "sensor thickness must be positive, got {}",
            t0
        )));
    }

    let cos_theta = -unit(n, "panel normal")?.dot(&unit(s1, "s1")?);
    if cos_theta <= 0.0 {
        return Err(CorrectionError::domain(format!(
            "ray does not enter the sensor face (cos θ = {})",
            cos_theta
        )));
    }

    let correction = 1.0 / absorbed_fraction(mu, t0 / cos_theta);
    if !correction.is_finite() {
        return Err(CorrectionError::domain(format!(
            "absorption underflows for mu = {}, t0 = {}",
            mu, t0
        )));
    }
    Ok(correction)
}

/// Fraction of photons absorbed over a path of length `t`.
#[inline]
fn absorbed_fraction(mu: f64, t: f64) -> f64 {
    -(-mu * t).exp_m1()
}
