//! Model parameters
//!
//! `ModelParameters` is the read-only parameter object the simulation consumes:
//! per-therapy transition tables and per-state cost/utility rows, plus the
//! run settings (population, horizon, discounting, significance level).
//! It is passed explicitly into cohort construction; nothing is global.
//!
//! # Builder DSL
//!
//! ```ignore
//! use strokesim_core::{HealthState, ParametersBuilder, Therapy};
//!
//! let params = ParametersBuilder::stroke_anticoagulation()
//!     .population_size(5_000)
//!     .time_horizon(Some(30))
//!     .discount_rate(0.035)
//!     .build()?;
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::model::{HealthState, StateValues, Therapy, TransitionMatrix};

pub mod builder;

pub use builder::ParametersBuilder;

fn default_max_cycles() -> u32 {
    10_000
}

fn default_alpha() -> f64 {
    0.05
}

fn default_tracked_event() -> HealthState {
    HealthState::Stroke
}

/// Parameters of one therapy arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapyParameters {
    /// Next-state distributions for every state
    pub transitions: TransitionMatrix,
    /// Cost accrued for each cycle spent in a state
    pub state_costs: StateValues,
    /// Utility accrued for each cycle spent in a state
    pub state_utilities: StateValues,
}

/// Complete parameter set for a simulation
///
/// # Conceptual Organization
///
/// **Run settings**:
/// - `population_size` - patients per cohort
/// - `time_horizon` - maximum cycles per patient (`None` = until absorption)
/// - `max_cycles` - guard for lifetime horizons
/// - `alpha` - significance level for reported intervals
///
/// **Disease model**:
/// - `initial_state`, `tracked_event`
/// - `therapies` - transition table and cost/utility rows per arm
///
/// **Economics**:
/// - `discount_rate` - per-cycle rate applied as `value * (1 + r)^(-t)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub population_size: usize,

    /// Maximum cycles simulated per patient. Patients alive at the horizon are
    /// censored with survival time equal to the horizon.
    #[serde(default)]
    pub time_horizon: Option<u32>,

    /// Upper bound on cycles when no horizon is set
    #[serde(default = "default_max_cycles")]
    pub max_cycles: u32,

    #[serde(default)]
    pub discount_rate: f64,

    #[serde(default = "default_alpha")]
    pub alpha: f64,

    pub initial_state: HealthState,

    /// Entering this state counts as an event (e.g. a stroke)
    #[serde(default = "default_tracked_event")]
    pub tracked_event: HealthState,

    pub therapies: BTreeMap<Therapy, TherapyParameters>,
}

impl ModelParameters {
    /// Stroke/anticoagulation model with default run settings
    #[must_use]
    pub fn stroke_anticoagulation() -> Self {
        builder::stroke_anticoagulation_parameters()
    }

    /// Parameters of one therapy arm
    pub fn therapy(&self, therapy: Therapy) -> Result<&TherapyParameters> {
        self.therapies
            .get(&therapy)
            .ok_or(SimulationError::MissingTherapy(therapy))
    }

    /// Cycles a single patient may run before the simulation gives up
    #[must_use]
    pub fn cycle_limit(&self) -> u32 {
        self.time_horizon.unwrap_or(self.max_cycles)
    }

    /// Re-check every precondition the simulation relies on.
    ///
    /// Transition rows are already checked when a `TransitionMatrix` is built
    /// or deserialized; this covers the remaining settings.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(SimulationError::Config(
                "population size must be at least 1".to_string(),
            ));
        }
        if u32::try_from(self.population_size).is_err() {
            return Err(SimulationError::Config(format!(
                "population size {} exceeds the patient index range",
                self.population_size
            )));
        }
        if !(0.0..1.0).contains(&self.discount_rate) {
            return Err(SimulationError::Config(format!(
                "discount rate must be in [0, 1), got {}",
                self.discount_rate
            )));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(SimulationError::Config(format!(
                "significance level must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.initial_state.is_absorbing() {
            return Err(SimulationError::Config(format!(
                "initial state {} is absorbing",
                self.initial_state
            )));
        }
        match self.time_horizon {
            Some(0) => {
                return Err(SimulationError::Config(
                    "time horizon must be at least 1 cycle".to_string(),
                ));
            }
            Some(h) if h > self.max_cycles => {
                return Err(SimulationError::Config(format!(
                    "time horizon {h} exceeds max cycles {}",
                    self.max_cycles
                )));
            }
            _ => {}
        }
        if self.therapies.is_empty() {
            return Err(SimulationError::Config(
                "no therapies configured".to_string(),
            ));
        }
        for (therapy, params) in &self.therapies {
            if !params.state_costs.is_finite() || !params.state_utilities.is_finite() {
                return Err(SimulationError::Config(format!(
                    "{therapy}: state costs and utilities must be finite"
                )));
            }
        }
        Ok(())
    }
}
