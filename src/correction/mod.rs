//! Correction engine: closed-form formulas, the per-experiment engine and
//! the multi-experiment collection.

pub mod formula;
pub mod multi;
pub mod single;

pub use formula::{dqe_correction, lp_correction};
pub use multi::CorrectionsMulti;
pub use single::Corrections;
