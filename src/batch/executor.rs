//! Parallel evaluation of correction columns.

use super::config::BatchConfig;
use crate::correction::multi::check_len;
use crate::correction::CorrectionsMulti;
use crate::error::{CorrectionError, Result};
use nalgebra::Vector3;
use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;

/// Evaluates corrections for whole reflection columns on a dedicated
/// rayon thread pool.
///
/// Every element is computed independently, so results are identical to the
/// equivalent sequence of scalar calls regardless of the worker count.
pub struct BatchExecutor {
    config: BatchConfig,
    pool: rayon::ThreadPool,
}

impl BatchExecutor {
    /// Build the executor and its thread pool; a `worker_count` of 0 selects
    /// the number of logical CPUs.
    pub fn new(mut config: BatchConfig) -> Result<Self> {
        if config.worker_count == 0 {
            config.worker_count = num_cpus::get();
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(|i| format!("xcorr-worker-{}", i))
            .build()
            .map_err(|e| CorrectionError::ThreadPool(e.to_string()))?;

        log::debug!(
            "batch executor ready: {} worker(s), parallel from {} element(s)",
            config.worker_count,
            config.min_parallel_len
        );

        Ok(Self { config, pool })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(BatchConfig::default())
    }

    #[inline]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Lorentz-polarization corrections for `N` reflections.
    ///
    /// `s1` is an `N × 3` table of diffracted beam vectors.
    pub fn lp(
        &self,
        multi: &CorrectionsMulti,
        experiments: ArrayView1<usize>,
        s1: ArrayView2<f64>,
    ) -> Result<Array1<f64>> {
        check_s1(&s1, experiments.len())?;
        let results = self.evaluate(experiments.len(), |i| {
            multi.lp(experiments[i], &row_vector(&s1, i))
        });
        self.gather("lp", results)
    }

    /// Quantum-efficiency corrections for `N` reflections.
    pub fn dqe(
        &self,
        multi: &CorrectionsMulti,
        experiments: ArrayView1<usize>,
        s1: ArrayView2<f64>,
        panels: ArrayView1<usize>,
    ) -> Result<Array1<f64>> {
        check_s1(&s1, experiments.len())?;
        check_len("panel", experiments.len(), panels.len())?;
        let results = self.evaluate(experiments.len(), |i| {
            multi.dqe(experiments[i], &row_vector(&s1, i), panels[i])
        });
        self.gather("dqe", results)
    }

    fn evaluate<F>(&self, len: usize, f: F) -> Vec<Result<f64>>
    where
        F: Fn(usize) -> Result<f64> + Send + Sync,
    {
        if len < self.config.min_parallel_len {
            log::debug!("evaluating {} element(s) sequentially", len);
            (0..len).map(f).collect()
        } else {
            log::debug!(
                "evaluating {} element(s) on {} worker(s)",
                len,
                self.config.worker_count
            );
            self.pool.install(|| (0..len).into_par_iter().map(f).collect())
        }
    }

    /// Collect per-element results; the lowest failing index is authoritative.
    fn gather(&self, what: &str, results: Vec<Result<f64>>) -> Result<Array1<f64>> {
        let mut values = Vec::with_capacity(results.len());
        let mut first: Option<(usize, CorrectionError)> = None;
        let mut failed = Vec::new();

        for (i, result) in results.into_iter().enumerate() {
            match result {
                Ok(v) => values.push(v),
                Err(e) => {
                    failed.push(i);
                    if first.is_none() {
                        first = Some((i, e));
                    }
                    if !self.config.report_all_failures {
                        break;
                    }
                }
            }
        }

        match first {
            None => Ok(Array1::from_vec(values)),
            Some((index, source)) => {
                log::warn!(
                    "{} batch: element {} failed ({}){}",
                    what,
                    index,
                    source,
                    if self.config.report_all_failures {
                        format!(", {} failing in total", failed.len())
                    } else {
                        String::new()
                    }
                );
                Err(CorrectionError::Batch {
                    index,
                    failed,
                    source: Box::new(source),
                })
            }
        }
    }
}

fn check_s1(s1: &ArrayView2<f64>, expected_rows: usize) -> Result<()> {
    if s1.ncols() != 3 {
        return Err(CorrectionError::InvalidShape {
            what: "s1",
            reason: format!("expected 3 columns, got {}", s1.ncols()),
        });
    }
    check_len("s1", expected_rows, s1.nrows())
}

#[inline]
pub(crate) fn row_vector(table: &ArrayView2<f64>, i: usize) -> Vector3<f64> {
    Vector3::new(table[[i, 0]], table[[i, 1]], table[[i, 2]])
}
