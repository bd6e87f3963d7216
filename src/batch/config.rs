//! Configuration for parallel batch evaluation.

/// Configuration for a [`BatchExecutor`](super::BatchExecutor).
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Batches shorter than this are evaluated on the calling thread.
    pub min_parallel_len: usize,
    /// Collect every failing index instead of only the first.
    pub report_all_failures: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            min_parallel_len: 1024,
            report_all_failures: false,
        }
    }
}

impl BatchConfig {
    /// Set the worker count; 0 selects the number of logical CPUs.
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = if worker_count == 0 {
            num_cpus::get()
        } else {
            worker_count
        };
        self
    }

    pub fn with_min_parallel_len(mut self, min_parallel_len: usize) -> Self {
        self.min_parallel_len = min_parallel_len;
        self
    }

    pub fn with_report_all_failures(mut self, report_all_failures: bool) -> Self {
        self.report_all_failures = report_all_failures;
        self
    }
}
