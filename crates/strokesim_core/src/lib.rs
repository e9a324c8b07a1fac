//! Markov cohort simulation and health-economic comparison library
//!
//! This crate simulates disease progression for a cohort of patients under
//! competing treatment strategies using a discrete-time Markov chain.
//! It supports:
//! - Per-patient state-transition sampling with reproducible, per-patient random streams
//! - Cohort aggregation into survival curves and outcome vectors
//! - Discounted cost and utility accrual
//! - One-sample, paired and independent difference statistics with t-based intervals
//! - Cost-effectiveness analysis (dominance, extended dominance, ICERs)
//! - Cost-benefit analysis (incremental net monetary benefit curves)
//!
//! # Example
//!
//! ```ignore
//! use strokesim_core::{Cohort, CohortId, ModelParameters, Therapy};
//!
//! let params = ModelParameters::stroke_anticoagulation();
//! let untreated = Cohort::new(CohortId(1), Therapy::None, &params)?.simulate()?;
//! let treated = Cohort::new(CohortId(1), Therapy::Anticoagulation, &params)?.simulate()?;
//!
//! let survival = untreated.summary_survival_times()?;
//! println!("mean survival: {:.2}", survival.mean());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod cohort;
pub mod error;
pub mod metrics;
pub mod outputs;
pub mod patient;
pub mod sampling;
pub mod series;

// ============================================================================
// Analysis modules
// ============================================================================

pub mod econ;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use cohort::Cohort;
pub use config::{ModelParameters, ParametersBuilder, TherapyParameters};
pub use error::{EconError, SimulationError, StatsError};
pub use model::{CohortId, HealthState, PatientId, StateValues, Therapy, TransitionMatrix};
pub use outputs::CohortOutputs;
pub use patient::{Patient, PatientOutcome};
