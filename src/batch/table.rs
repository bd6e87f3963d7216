//! Column-oriented reflection table and correction application.

use super::executor::BatchExecutor;
use crate::correction::multi::check_len;
use crate::correction::CorrectionsMulti;
use crate::error::{CorrectionError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

/// Per-reflection correction factors, parallel to a [`ReflectionTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct CorrectionColumns {
    pub lp: Array1<f64>,
    pub dqe: Array1<f64>,
}

impl CorrectionColumns {
    #[inline]
    pub fn len(&self) -> usize {
        self.lp.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lp.is_empty()
    }

    /// Element-wise product `lp * dqe`, the factor applied to intensities.
    pub fn combined(&self) -> Array1<f64> {
        &self.lp * &self.dqe
    }
}

/// Reflections to be corrected, stored as parallel columns.
#[derive(Clone, Debug)]
pub struct ReflectionTable {
    /// Experiment index of each reflection.
    experiment_id: Array1<usize>,

    /// Diffracted beam vectors, one row per reflection.
    s1: Array2<f64>,

    /// Panel index of each reflection.
    panel: Array1<usize>,

    /// Measured intensity.
    intensity: Array1<f64>,

    /// Intensity variance.
    variance: Array1<f64>,
}

impl ReflectionTable {
    pub fn new(
        experiment_id: Array1<usize>,
        s1: Array2<f64>,
        panel: Array1<usize>,
        intensity: Array1<f64>,
        variance: Array1<f64>,
    ) -> Result<Self> {
        let len = experiment_id.len();
        if s1.ncols() != 3 {
            return Err(CorrectionError::InvalidShape {
                what: "s1",
                reason: format!("expected 3 columns, got {}", s1.ncols()),
            });
        }
        check_len("s1", len, s1.nrows())?;
        check_len("panel", len, panel.len())?;
        check_len("intensity", len, intensity.len())?;
        check_len("variance", len, variance.len())?;

        Ok(Self {
            experiment_id,
            s1,
            panel,
            intensity,
            variance,
        })
    }

    /// Number of reflections.
    #[inline]
    pub fn len(&self) -> usize {
        self.experiment_id.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.experiment_id.is_empty()
    }

    #[inline]
    pub fn experiment_id(&self) -> ArrayView1<'_, usize> {
        self.experiment_id.view()
    }

    #[inline]
    pub fn s1(&self) -> ArrayView2<'_, f64> {
        self.s1.view()
    }

    #[inline]
    pub fn panel(&self) -> ArrayView1<'_, usize> {
        self.panel.view()
    }

    #[inline]
    pub fn intensity(&self) -> ArrayView1<'_, f64> {
        self.intensity.view()
    }

    #[inline]
    pub fn variance(&self) -> ArrayView1<'_, f64> {
        self.variance.view()
    }

    /// Evaluate LP and DQE factors for every reflection.
    pub fn compute_corrections(
        &self,
        executor: &BatchExecutor,
        multi: &CorrectionsMulti,
    ) -> Result<CorrectionColumns> {
        let lp = executor.lp(multi, self.experiment_id(), self.s1())?;
        let dqe = executor.dqe(multi, self.experiment_id(), self.s1(), self.panel())?;
        Ok(CorrectionColumns { lp, dqe })
    }

    /// Scale intensities by `lp * dqe` and variances by its square.
    pub fn apply_corrections(&mut self, columns: &CorrectionColumns) -> Result<()> {
        check_len("lp", self.len(), columns.lp.len())?;
        check_len("dqe", self.len(), columns.dqe.len())?;

        Zip::from(&mut self.intensity)
            .and(&mut self.variance)
            .and(&columns.lp)
            .and(&columns.dqe)
            .for_each(|i, v, &lp, &dqe| {
                let factor = lp * dqe;
                *i *= factor;
                *v *= factor * factor;
            });
        Ok(())
    }

    /// Compute and apply corrections in one step, returning the factors used.
    ///
    /// The table is left untouched if any reflection fails.
    pub fn correct(
        &mut self,
        executor: &BatchExecutor,
        multi: &CorrectionsMulti,
    ) -> Result<CorrectionColumns> {
        let columns = self.compute_corrections(executor, multi)?;
        self.apply_corrections(&columns)?;
        log::debug!("corrected {} reflection(s)", self.len());
        Ok(columns)
    }
}
