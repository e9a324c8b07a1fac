//! Single-patient Markov simulation
//!
//! A patient walks the therapy's transition table one cycle at a time until it
//! enters an absorbing state or reaches the horizon. Cost and utility of each
//! surviving cycle are discounted as `value * (1 + r)^(-t)` with `t` the 1-based
//! cycle number.

use serde::{Deserialize, Serialize};

use crate::config::{ModelParameters, TherapyParameters};
use crate::error::{Result, SimulationError};
use crate::metrics::SimulationMetrics;
use crate::model::{HealthState, PatientId};
use crate::sampling::RandomVariateSource;

/// A member of a cohort, identified by the seed of its random stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patient {
    id: PatientId,
}

/// Everything recorded about one simulated patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientOutcome {
    pub id: PatientId,
    /// Initial state followed by the state entered in each cycle
    pub trajectory: Vec<HealthState>,
    /// Cycles until absorption, or the horizon if the patient was censored
    pub survival_time: u32,
    /// Whether the patient entered an absorbing state
    pub died: bool,
    /// Number of times the tracked event state was entered
    pub event_count: u32,
    pub discounted_cost: f64,
    pub discounted_utility: f64,
}

impl PatientOutcome {
    /// Absorbing state the patient ended in, if it died
    #[must_use]
    pub fn cause_of_death(&self) -> Option<HealthState> {
        self.trajectory
            .last()
            .copied()
            .filter(|s| self.died && s.is_absorbing())
    }
}

impl Patient {
    #[must_use]
    pub fn new(id: PatientId) -> Self {
        Self { id }
    }

    #[must_use]
    pub fn id(&self) -> PatientId {
        self.id
    }

    /// Run this patient's trajectory to absorption or the horizon.
    ///
    /// Only reads `params`; the patient's random stream is created here from
    /// its id, so repeated calls return identical outcomes.
    pub fn simulate(
        &self,
        params: &ModelParameters,
        therapy: &TherapyParameters,
        metrics: &mut SimulationMetrics,
    ) -> Result<PatientOutcome> {
        let mut source = RandomVariateSource::from_seed(self.id.seed());
        let limit = params.cycle_limit();
        let discount = 1.0 + params.discount_rate;

        let mut state = params.initial_state;
        let mut trajectory = vec![state];
        let mut cycle: u32 = 0;
        let mut event_count = 0;
        let mut discounted_cost = 0.0;
        let mut discounted_utility = 0.0;

        let died = loop {
            if state.is_absorbing() {
                break true;
            }
            if cycle >= limit {
                if params.time_horizon.is_none() {
                    return Err(SimulationError::HorizonExceeded {
                        patient: self.id,
                        cycles: cycle,
                    });
                }
                break false;
            }

            cycle += 1;
            let next = source
                .next_state(therapy.transitions.row(state))
                .map_err(|e| match e {
                    SimulationError::InvalidDistribution { reason, total, .. } => {
                        SimulationError::InvalidDistribution {
                            from: Some(state),
                            reason,
                            total,
                        }
                    }
                    other => other,
                })?;
            trajectory.push(next);
            metrics.record_cycle(next);

            if next.is_absorbing() {
                state = next;
                continue;
            }

            let factor = discount.powi(-(cycle as i32));
            discounted_cost += therapy.state_costs[next] * factor;
            discounted_utility += therapy.state_utilities[next] * factor;
            if next == params.tracked_event {
                event_count += 1;
            }
            state = next;
        };

        if died {
            metrics.record_death(state);
        } else {
            metrics.record_censored();
        }

        Ok(PatientOutcome {
            id: self.id,
            trajectory,
            survival_time: cycle,
            died,
            event_count,
            discounted_cost,
            discounted_utility,
        })
    }
}
