use thiserror::Error;

use crate::model::{HealthState, PatientId, Therapy};

/// Errors raised while validating parameters or running a cohort
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A probability row is negative somewhere or does not sum to one
    #[error("invalid distribution{}: {reason} (total={total})", .from.map(|s| format!(" from {s}")).unwrap_or_default())]
    InvalidDistribution {
        from: Option<HealthState>,
        reason: &'static str,
        total: f64,
    },
    /// A patient neither reached an absorbing state nor the horizon in time
    #[error("patient {patient} did not terminate within {cycles} cycles")]
    HorizonExceeded { patient: PatientId, cycles: u32 },
    #[error("no parameters configured for therapy {0}")]
    MissingTherapy(Therapy),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the summary and difference statistics
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("statistic requires at least {required} observations, got {actual}")]
    InsufficientSample { required: usize, actual: usize },
    #[error("paired samples must have equal length ({left} != {right})")]
    SizeMismatch { left: usize, right: usize },
    #[error("significance level must be in (0, 1), got {0}")]
    InvalidSignificanceLevel(f64),
}

/// Errors raised by the cost-effectiveness and cost-benefit evaluators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EconError {
    #[error(transparent)]
    Stats(#[from] StatsError),
    /// ICER requested between strategies with identical mean effect
    #[error("incremental effect is zero, ICER is undefined")]
    DegenerateEffectDifference,
    #[error("at least one strategy is required")]
    NoStrategies,
    #[error("strategy '{strategy}' has a non-finite {kind} observation at index {index}")]
    NonFiniteObservation {
        strategy: String,
        kind: &'static str,
        index: usize,
    },
    #[error("strategy index {0} is out of range")]
    UnknownStrategy(usize),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
