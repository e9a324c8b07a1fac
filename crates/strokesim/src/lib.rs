//! Driver for the strokesim cohort simulation
//!
//! Loads a parameter file (or the built-in preset), simulates every therapy
//! arm, prints outcome, cost-effectiveness and cost-benefit reports, and
//! optionally exports plot series as JSON.

pub mod export;
pub mod logging;
pub mod params;
pub mod report;
pub mod run;
pub mod util;

pub use logging::init_logging;
pub use params::load_parameters;
pub use run::{RunOptions, RunReport, run};
