//! X-ray diffraction intensity corrections.
//!
//! This crate computes per-reflection correction factors for rotation-method
//! single-crystal diffraction data:
//!
//! - Lorentz-polarization (LP): rate at which a reflection sweeps through the
//!   diffraction condition, combined with the partial polarization of the beam
//! - Detector quantum efficiency (DQE): fraction of photons absorbed in the
//!   sensor for the ray's incidence angle
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  batch: BatchExecutor (rayon pool)  │
//! │         ReflectionTable (ndarray)   │
//! └─────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │          Correction Engine          │
//! │  ┌──────────────────────────────┐   │
//! │  │ CorrectionsMulti (per expt)  │   │
//! │  └──────────────────────────────┘   │
//! │  ┌──────────────┐ ┌─────────────┐   │
//! │  │ Corrections  │ │  formulas   │   │
//! │  │ (Arc models) │ │ lp / dqe    │   │
//! │  └──────────────┘ └─────────────┘   │
//! └─────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────┐
//! │  model: Beam, Goniometer, Detector  │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use nalgebra::Vector3;
//! use xcorr::{Beam, Corrections, CorrectionsMulti, Detector, Goniometer, Panel};
//!
//! let beam = Beam::along_minus_z(0.9795, Beam::SYNCHROTRON_POLARIZATION_FRACTION)?;
//! let panel = Panel::new(
//!     "module-0",
//!     Vector3::new(-40.0, 40.0, -150.0),
//!     Vector3::new(1.0, 0.0, 0.0),
//!     Vector3::new(0.0, -1.0, 0.0),
//!     3.96,
//!     0.32,
//! )?;
//!
//! let mut multi = CorrectionsMulti::new();
//! multi.append(Corrections::new(
//!     Arc::new(beam),
//!     Arc::new(Goniometer::about_x()),
//!     Arc::new(Detector::single(panel)),
//! ));
//!
//! let s1 = Vector3::new(0.05, 0.2, -1.0);
//! let factor = multi.lp(0, &s1)? * multi.dqe(0, &s1, 0)?;
//! assert!(factor > 0.0);
//! # Ok::<(), xcorr::CorrectionError>(())
//! ```

pub mod batch;
pub mod correction;
pub mod error;
pub mod model;

// Re-export commonly used items
pub use batch::{BatchConfig, BatchExecutor, CorrectionColumns, ReflectionTable};
pub use correction::{dqe_correction, lp_correction, Corrections, CorrectionsMulti};
pub use error::{CorrectionError, IndexKind, Result};
pub use model::{Beam, Detector, Goniometer, Panel};
