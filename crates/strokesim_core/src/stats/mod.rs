//! Summary and difference statistics
//!
//! - [`SummaryStat`]: one sample; mean, standard deviation, t-based confidence
//!   interval and empirical percentile interval
//! - [`DifferenceStatIndependent`]: two unrelated samples, Welch interval
//! - [`DifferenceStatPaired`]: two samples matched by index
//! - [`DifferenceStat`]: either of the above, selected by [`Pairing`]
//!
//! Cohorts simulated with the same cohort id draw patient *i* from the same
//! random stream in every arm, so paired differences are valid between such
//! cohorts. Independent differences make no such assumption.

mod difference;
mod interval;
mod summary;

pub use difference::{DifferenceStat, DifferenceStatIndependent, DifferenceStatPaired, Pairing};
pub use interval::{ConfidenceInterval, IntervalKind, percentile};
pub use summary::SummaryStat;

pub(crate) use interval::{check_alpha, percentile_interval};
