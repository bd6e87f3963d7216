//! Multi-experiment batching layer.

use super::single::Corrections;
use crate::error::{CorrectionError, IndexKind, Result};
use nalgebra::Vector3;

/// Ordered, append-only collection of per-experiment [`Corrections`].
///
/// The position of an entry is its experiment index. Entries are never
/// removed or reordered, so an index stays valid for the collection's life.
#[derive(Clone, Debug, Default)]
pub struct CorrectionsMulti {
    entries: Vec<Corrections>,
}

impl CorrectionsMulti {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next experiment and return its index.
    pub fn append(&mut self, corrections: Corrections) -> usize {
        let index = self.entries.len();
        log::trace!(
            "registered experiment {} with {} panel(s)",
            index,
            corrections.panel_count()
        );
        self.entries.push(corrections);
        index
    }

    /// Number of registered experiments.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the engine for an experiment.
    pub fn get(&self, experiment: usize) -> Result<&Corrections> {
        self.entries
            .get(experiment)
            .ok_or(CorrectionError::OutOfRange {
                kind: IndexKind::Experiment,
                index: experiment,
                len: self.entries.len(),
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Corrections> {
        self.entries.iter()
    }

    /// Lorentz-polarization correction for `s1` in `experiment`.
    pub fn lp(&self, experiment: usize, s1: &Vector3<f64>) -> Result<f64> {
        self.get(experiment)?.lp(s1)
    }

    /// Quantum-efficiency correction for `s1` on `panel` of `experiment`.
    pub fn dqe(&self, experiment: usize, s1: &Vector3<f64>, panel: usize) -> Result<f64> {
        self.get(experiment)?.dqe(s1, panel)
    }

    /// Vectorized [`lp`](Self::lp). `result[i]` corresponds to
    /// `(experiments[i], s1[i])`; the first failing element aborts the call.
    pub fn lp_batch(&self, experiments: &[usize], s1: &[Vector3<f64>]) -> Result<Vec<f64>> {
        check_len("s1", experiments.len(), s1.len())?;
        experiments
            .iter()
            .zip(s1)
            .enumerate()
            .map(|(i, (&id, s1))| self.lp(id, s1).map_err(|e| single_failure(i, e)))
            .collect()
    }

    /// Vectorized [`dqe`](Self::dqe), with the same contract as [`lp_batch`](Self::lp_batch).
    pub fn dqe_batch(
        &self,
        experiments: &[usize],
        s1: &[Vector3<f64>],
        panels: &[usize],
    ) -> Result<Vec<f64>> {
        check_len("s1", experiments.len(), s1.len())?;
        check_len("panel", experiments.len(), panels.len())?;
        experiments
            .iter()
            .zip(s1)
            .zip(panels)
            .enumerate()
            .map(|(i, ((&id, s1), &p))| self.dqe(id, s1, p).map_err(|e| single_failure(i, e)))
            .collect()
    }
}

impl FromIterator<Corrections> for CorrectionsMulti {
    fn from_iter<I: IntoIterator<Item = Corrections>>(iter: I) -> Self {
        let mut multi = Self::new();
        multi.extend(iter);
        multi
    }
}

impl Extend<Corrections> for CorrectionsMulti {
    fn extend<I: IntoIterator<Item = Corrections>>(&mut self, iter: I) {
        for corrections in iter {
            self.append(corrections);
        }
    }
}

impl<'a> IntoIterator for &'a CorrectionsMulti {
    type Item = &'a Corrections;
    type IntoIter = std::slice::Iter<'a, Corrections>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(CorrectionError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

fn single_failure(index: usize, source: CorrectionError) -> CorrectionError {
    CorrectionError::Batch {
        index,
        failed: vec![index],
        source: Box::new(source),
    }
}
