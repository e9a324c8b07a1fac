//! Therapy-specific transition probability tables

use serde::{Deserialize, Serialize};

use super::states::HealthState;
use crate::error::{Result, SimulationError};

/// Tolerance for a probability row summing to one
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

type Rows = [[f64; HealthState::COUNT]; HealthState::COUNT];

/// Check that `probabilities` is a discrete distribution.
///
/// Entries must be finite and non-negative and sum to 1 within
/// [`PROBABILITY_TOLERANCE`]. Returns the sum on success.
pub fn validate_distribution(probabilities: &[f64]) -> Result<f64> {
    let total: f64 = probabilities.iter().sum();
    if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(SimulationError::InvalidDistribution {
            from: None,
            reason: "probabilities must be finite and non-negative",
            total,
        });
    }
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(SimulationError::InvalidDistribution {
            from: None,
            reason: "probabilities do not sum to 1",
            total,
        });
    }
    Ok(total)
}

/// Row-stochastic transition table indexed by [`HealthState`].
///
/// Every non-absorbing row is a valid distribution. Absorbing rows are never
/// sampled; they may be all zero (terminal) or any valid distribution such as
/// a self-loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Rows", into = "Rows")]
pub struct TransitionMatrix {
    rows: Rows,
}

impl TransitionMatrix {
    pub fn new(rows: Rows) -> Result<Self> {
        for state in HealthState::ALL {
            let row = &rows[state.index()];
            if state.is_absorbing() && row.iter().all(|p| *p == 0.0) {
                continue;
            }
            validate_distribution(row).map_err(|e| with_origin(e, state))?;
        }
        Ok(Self { rows })
    }

    /// Outgoing distribution of `state`
    #[must_use]
    #[inline]
    pub fn row(&self, state: HealthState) -> &[f64; HealthState::COUNT] {
        &self.rows[state.index()]
    }

    #[must_use]
    pub fn probability(&self, from: HealthState, to: HealthState) -> f64 {
        self.rows[from.index()][to.index()]
    }

    /// Scale `p(from -> to)` by a relative risk.
    ///
    /// The change in probability mass is taken from (or given to) `balance`
    /// so the row still sums to one. Fails if `balance` would go negative.
    pub fn with_relative_risk(
        mut self,
        from: HealthState,
        to: HealthState,
        relative_risk: f64,
        balance: HealthState,
    ) -> Result<Self> {
        if !relative_risk.is_finite() || relative_risk < 0.0 {
            return Err(SimulationError::Config(format!(
                "relative risk must be finite and non-negative, got {relative_risk}"
            )));
        }
        if to == balance {
            return Err(SimulationError::Config(format!(
                "relative risk on {from} -> {to} cannot balance onto the same state"
            )));
        }

        let row = &mut self.rows[from.index()];
        let old = row[to.index()];
        let new = old * relative_risk;
        row[to.index()] = new;
        row[balance.index()] -= new - old;

        if row[balance.index()] < -PROBABILITY_TOLERANCE {
            let total: f64 = row.iter().sum();
            return Err(SimulationError::InvalidDistribution {
                from: Some(from),
                reason: "relative risk leaves negative mass on the balancing state",
                total,
            });
        }
        row[balance.index()] = row[balance.index()].max(0.0);
        Ok(self)
    }
}

fn with_origin(err: SimulationError, state: HealthState) -> SimulationError {
    match err {
        SimulationError::InvalidDistribution { reason, total, .. } => {
            SimulationError::InvalidDistribution {
                from: Some(state),
                reason,
                total,
            }
        }
        other => other,
    }
}

impl TryFrom<Rows> for TransitionMatrix {
    type Error = SimulationError;

    fn try_from(rows: Rows) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<TransitionMatrix> for Rows {
    fn from(matrix: TransitionMatrix) -> Self {
        matrix.rows
    }
}
