//! Parallel batch evaluation over reflection columns.

pub mod config;
pub mod executor;
pub mod table;

pub use config::BatchConfig;
pub use executor::BatchExecutor;
pub use table::{CorrectionColumns, ReflectionTable};
