//! Parameters Builder
//!
//! Fluent construction of [`ModelParameters`]. Treated arms are usually
//! described relative to an untreated arm: copy it, scale a few transition
//! probabilities by relative risks, and add the therapy's per-cycle cost.
//! Derivations are recorded as pending steps and resolved in `build()`, which
//! also validates the result.
//!
//! # Example
//!
//! ```ignore
//! let params = ParametersBuilder::new()
//!     .population_size(2_000)
//!     .time_horizon(Some(50))
//!     .therapy(Therapy::None, untreated)
//!     .derive_therapy(Therapy::Anticoagulation, Therapy::None)
//!     .relative_risk(Therapy::Anticoagulation, HealthState::PostStroke, HealthState::Stroke, 0.65, HealthState::PostStroke)
//!     .add_state_cost(Therapy::Anticoagulation, HealthState::PostStroke, 2_000.0)
//!     .build()?;
//! ```

use std::collections::BTreeMap;

use super::{ModelParameters, TherapyParameters, default_max_cycles};
use crate::error::{Result, SimulationError};
use crate::model::{HealthState, StateValues, Therapy, TransitionMatrix};

/// Reduction in stroke incidence (and stroke death) under anticoagulation
const RR_STROKE: f64 = 0.65;
/// Increase in background mortality from bleeding under anticoagulation
const RR_BLEEDING: f64 = 1.05;
/// Per-cycle cost of anticoagulation for post-stroke patients
const ANTICOAGULATION_COST: f64 = 2_000.0;

#[derive(Debug, Clone)]
enum PendingStep {
    Derive {
        therapy: Therapy,
        base: Therapy,
    },
    RelativeRisk {
        therapy: Therapy,
        from: HealthState,
        to: HealthState,
        relative_risk: f64,
        balance: HealthState,
    },
    AddCost {
        therapy: Therapy,
        state: HealthState,
        amount: f64,
    },
}

/// Builder for [`ModelParameters`]
#[derive(Debug, Clone)]
pub struct ParametersBuilder {
    population_size: usize,
    time_horizon: Option<u32>,
    max_cycles: u32,
    discount_rate: f64,
    alpha: f64,
    initial_state: HealthState,
    tracked_event: HealthState,
    therapies: BTreeMap<Therapy, TherapyParameters>,
    pending: Vec<PendingStep>,
}

impl Default for ParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametersBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            population_size: 2_000,
            time_horizon: Some(50),
            max_cycles: default_max_cycles(),
            discount_rate: 0.03,
            alpha: 0.05,
            initial_state: HealthState::Well,
            tracked_event: HealthState::Stroke,
            therapies: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Untreated stroke model plus an anticoagulation arm derived from it
    #[must_use]
    pub fn stroke_anticoagulation() -> Self {
        Self::new()
            .therapy(Therapy::None, untreated_stroke_arm())
            .derive_therapy(Therapy::Anticoagulation, Therapy::None)
            .relative_risk(
                Therapy::Anticoagulation,
                HealthState::PostStroke,
                HealthState::Stroke,
                RR_STROKE,
                HealthState::PostStroke,
            )
            .relative_risk(
                Therapy::Anticoagulation,
                HealthState::PostStroke,
                HealthState::NaturalDeath,
                RR_BLEEDING,
                HealthState::PostStroke,
            )
            .relative_risk(
                Therapy::Anticoagulation,
                HealthState::Stroke,
                HealthState::StrokeDeath,
                RR_STROKE,
                HealthState::PostStroke,
            )
            .add_state_cost(
                Therapy::Anticoagulation,
                HealthState::PostStroke,
                ANTICOAGULATION_COST,
            )
    }

    // =========================================================================
    // Run settings
    // =========================================================================

    #[must_use]
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the horizon in cycles (`None` runs every patient to absorption)
    #[must_use]
    pub fn time_horizon(mut self, horizon: Option<u32>) -> Self {
        self.time_horizon = horizon;
        self
    }

    #[must_use]
    pub fn max_cycles(mut self, max_cycles: u32) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    #[must_use]
    pub fn discount_rate(mut self, rate: f64) -> Self {
        self.discount_rate = rate;
        self
    }

    #[must_use]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn initial_state(mut self, state: HealthState) -> Self {
        self.initial_state = state;
        self
    }

    #[must_use]
    pub fn tracked_event(mut self, state: HealthState) -> Self {
        self.tracked_event = state;
        self
    }

    // =========================================================================
    // Therapy arms
    // =========================================================================

    /// Set the parameters of a therapy arm directly
    #[must_use]
    pub fn therapy(mut self, therapy: Therapy, params: TherapyParameters) -> Self {
        self.therapies.insert(therapy, params);
        self
    }

    /// Start `therapy` as a copy of `base` (resolved at build time)
    #[must_use]
    pub fn derive_therapy(mut self, therapy: Therapy, base: Therapy) -> Self {
        self.pending.push(PendingStep::Derive { therapy, base });
        self
    }

    /// Scale `p(from -> to)` in `therapy`, moving the difference onto `balance`
    #[must_use]
    pub fn relative_risk(
        mut self,
        therapy: Therapy,
        from: HealthState,
        to: HealthState,
        relative_risk: f64,
        balance: HealthState,
    ) -> Self {
        self.pending.push(PendingStep::RelativeRisk {
            therapy,
            from,
            to,
            relative_risk,
            balance,
        });
        self
    }

    /// Add a per-cycle cost to a state in `therapy` (e.g. drug cost)
    #[must_use]
    pub fn add_state_cost(mut self, therapy: Therapy, state: HealthState, amount: f64) -> Self {
        self.pending.push(PendingStep::AddCost {
            therapy,
            state,
            amount,
        });
        self
    }

    /// Resolve pending derivations and validate
    pub fn build(self) -> Result<ModelParameters> {
        let mut therapies = self.therapies;

        for step in self.pending {
            match step {
                PendingStep::Derive { therapy, base } => {
                    let params = therapies
                        .get(&base)
                        .cloned()
                        .ok_or(SimulationError::MissingTherapy(base))?;
                    therapies.insert(therapy, params);
                }
                PendingStep::RelativeRisk {
                    therapy,
                    from,
                    to,
                    relative_risk,
                    balance,
                } => {
                    let params = therapies
                        .get_mut(&therapy)
                        .ok_or(SimulationError::MissingTherapy(therapy))?;
                    params.transitions =
                        params
                            .transitions
                            .with_relative_risk(from, to, relative_risk, balance)?;
                }
                PendingStep::AddCost {
                    therapy,
                    state,
                    amount,
                } => {
                    let params = therapies
                        .get_mut(&therapy)
                        .ok_or(SimulationError::MissingTherapy(therapy))?;
                    params.state_costs[state] += amount;
                }
            }
        }

        let params = ModelParameters {
            population_size: self.population_size,
            time_horizon: self.time_horizon,
            max_cycles: self.max_cycles,
            discount_rate: self.discount_rate,
            alpha: self.alpha,
            initial_state: self.initial_state,
            tracked_event: self.tracked_event,
            therapies,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Annual transitions of untreated patients.
///
/// A stroke lasts one cycle and is followed by post-stroke or stroke death.
fn untreated_stroke_arm() -> TherapyParameters {
    const ROWS: [[f64; HealthState::COUNT]; HealthState::COUNT] = [
        // Well
        [0.95, 0.03, 0.0, 0.0, 0.02],
        // Stroke
        [0.0, 0.0, 0.8, 0.2, 0.0],
        // Post-Stroke
        [0.0, 0.06, 0.91, 0.0, 0.03],
        // Stroke Death
        [0.0, 0.0, 0.0, 1.0, 0.0],
        // Natural Death
        [0.0, 0.0, 0.0, 0.0, 1.0],
    ];

    TherapyParameters {
        // Constant rows above are valid distributions
        transitions: TransitionMatrix::new(ROWS).unwrap_or_else(|e| {
            unreachable!("built-in stroke transition table is invalid: {e}")
        }),
        state_costs: StateValues([0.0, 5_000.0, 200.0, 0.0, 0.0]),
        state_utilities: StateValues([1.0, 0.2, 0.9, 0.0, 0.0]),
    }
}

pub(super) fn stroke_anticoagulation_parameters() -> ModelParameters {
    ParametersBuilder::stroke_anticoagulation()
        .build()
        .unwrap_or_else(|e| unreachable!("built-in stroke parameters are invalid: {e}"))
}
