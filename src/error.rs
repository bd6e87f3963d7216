//! Error types for correction computations.

use thiserror::Error;

/// Which collection an out-of-range index was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Experiment index into a [`CorrectionsMulti`](crate::CorrectionsMulti).
    Experiment,
    /// Panel index into a [`Detector`](crate::Detector).
    Panel,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Experiment => write!(f, "experiment"),
            IndexKind::Panel => write!(f, "panel"),
        }
    }
}

/// Errors raised while building geometry or evaluating corrections.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrectionError {
    /// Geometrically degenerate input, e.g. a diffracted ray parallel to the
    /// incident beam or travelling along the detector face.
    #[error("domain error: {0}")]
    Domain(String),

    /// Experiment or panel index outside the valid collection.
    #[error("{kind} index {index} out of range for length {len}")]
    OutOfRange {
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    /// Parallel input sequences of different lengths.
    #[error("length mismatch: {what} has {actual} elements, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Array with the wrong shape, e.g. an `s1` table without 3 columns.
    #[error("invalid shape for {what}: {reason}")]
    InvalidShape { what: &'static str, reason: String },

    /// The batch thread pool could not be built.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    /// A vectorized call failed. `index` is the first failing element and
    /// `source` its error; `failed` holds every failing index that was collected.
    #[error("batch element {index} failed ({} failing in total): {source}", .failed.len())]
    Batch {
        index: usize,
        failed: Vec<usize>,
        #[source]
        source: Box<CorrectionError>,
    },
}

impl CorrectionError {
    pub(crate) fn domain(reason: impl Into<String>) -> Self {
        CorrectionError::Domain(reason.into())
    }

    /// True for geometrically degenerate input, looking through batch wrappers.
    pub fn is_domain(&self) -> bool {
        match self {
            CorrectionError::Domain(_) => true,
            CorrectionError::Batch { source, .. } => source.is_domain(),
            _ => false,
        }
    }

    /// True for an experiment or panel index out of range, looking through batch wrappers.
    pub fn is_out_of_range(&self) -> bool {
        match self {
            CorrectionError::OutOfRange { .. } => true,
            CorrectionError::Batch { source, .. } => source.is_out_of_range(),
            _ => false,
        }
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, CorrectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = CorrectionError::OutOfRange {
            kind: IndexKind::Panel,
            index: 4,
            len: 2,
        };
        assert_eq!(err.to_string(), "panel index 4 out of range for length 2");
        assert!(err.is_out_of_range());
        assert!(!err.is_domain());
    }

    #[test]
    fn test_batch_classification_looks_through() {
        let err = CorrectionError::Batch {
            index: 3,
            failed: vec![3, 7],
            source: Box::new(CorrectionError::domain("s1 parallel to s0")),
        };
        assert!(err.is_domain());
        assert!(!err.is_out_of_range());
        assert!(err.to_string().contains("2 failing in total"));
    }
}
