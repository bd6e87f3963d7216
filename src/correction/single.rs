//! Per-experiment correction engine.

use super::formula::{dqe_correction, lp_correction};
use crate::error::Result;
use crate::model::{Beam, Detector, Goniometer};
use nalgebra::Vector3;
use std::sync::Arc;

/// Correction engine bound to the geometry of one experiment.
///
/// The geometry is shared through `Arc` handles rather than copied, so every
/// `Corrections` built from the same experiment sees the same models. Cloning
/// is cheap and only clones the handles.
#[derive(Clone, Debug)]
pub struct Corrections {
    beam: Arc<Beam>,
    goniometer: Arc<Goniometer>,
    detector: Arc<Detector>,
}

impl Corrections {
    pub fn new(beam: Arc<Beam>, goniometer: Arc<Goniometer>, detector: Arc<Detector>) -> Self {
        Self {
            beam,
            goniometer,
            detector,
        }
    }

    #[inline]
    pub fn beam(&self) -> &Arc<Beam> {
        &self.beam
    }

    #[inline]
    pub fn goniometer(&self) -> &Arc<Goniometer> {
        &self.goniometer
    }

    #[inline]
    pub fn detector(&self) -> &Arc<Detector> {
        &self.detector
    }

    /// Number of panels in the bound detector.
    #[inline]
    pub fn panel_count(&self) -> usize {
        self.detector.len()
    }

    /// Lorentz-polarization correction for a diffracted beam `s1`.
    pub fn lp(&self, s1: &Vector3<f64>) -> Result<f64> {
        lp_correction(
            self.beam.s0(),
            self.beam.polarization_normal(),
            self.beam.polarization_fraction(),
            self.goniometer.rotation_axis(),
            s1,
        )
    }

    /// Detector quantum-efficiency correction for `s1` recorded on `panel`.
    pub fn dqe(&self, s1: &Vector3<f64>, panel: usize) -> Result<f64> {
        let p = self.detector.panel(panel)?;
        dqe_correction(p.mu(), p.thickness(), s1, &p.normal())
    }
}
