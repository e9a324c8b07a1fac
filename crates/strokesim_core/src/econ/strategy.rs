use serde::{Deserialize, Serialize};

use crate::error::{EconError, StatsError};
use crate::outputs::CohortOutputs;

/// One treatment arm as seen by the economic evaluators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    name: String,
    costs: Vec<f64>,
    effects: Vec<f64>,
    mean_cost: f64,
    mean_effect: f64,
}

impl Strategy {
    /// Cost and effect observations must be non-empty, of equal length and
    /// finite
    pub fn new(
        name: impl Into<String>,
        costs: Vec<f64>,
        effects: Vec<f64>,
    ) -> Result<Self, EconError> {
        if costs.len() != effects.len() {
            return Err(StatsError::SizeMismatch {
                left: costs.len(),
                right: effects.len(),
            }
            .into());
        }
        if costs.is_empty() {
            return Err(StatsError::InsufficientSample {
                required: 1,
                actual: 0,
            }
            .into());
        }

        let name = name.into();
        for (kind, values) in [("cost", &costs), ("effect", &effects)] {
            if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                return Err(EconError::NonFiniteObservation {
                    strategy: name,
                    kind,
                    index,
                });
            }
        }

        let n = costs.len() as f64;
        let mean_cost = costs.iter().sum::<f64>() / n;
        let mean_effect = effects.iter().sum::<f64>() / n;

        Ok(Self {
            name,
            costs,
            effects,
            mean_cost,
            mean_effect,
        })
    }

    /// Discounted costs and discounted utilities of a simulated cohort
    pub fn from_outputs(name: impl Into<String>, outputs: &CohortOutputs) -> Result<Self, EconError> {
        Self::new(name, outputs.costs().to_vec(), outputs.utilities().to_vec())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    #[must_use]
    pub fn effects(&self) -> &[f64] {
        &self.effects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    #[must_use]
    pub fn mean_cost(&self) -> f64 {
        self.mean_cost
    }

    #[must_use]
    pub fn mean_effect(&self) -> f64 {
        self.mean_effect
    }

    /// Per-observation net monetary benefit `wtp * effect - cost`
    #[must_use]
    pub fn nmb_observations(&self, wtp: f64) -> Vec<f64> {
        self.costs
            .iter()
            .zip(&self.effects)
            .map(|(c, e)| wtp * e - c)
            .collect()
    }

    #[must_use]
    pub fn mean_nmb(&self, wtp: f64) -> f64 {
        wtp * self.mean_effect - self.mean_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_means() {
        let s = Strategy::new("A", vec![100.0, 200.0, 300.0], vec![1.0, 2.0, 6.0]).unwrap();
        assert_eq!(s.name(), "A");
        assert_eq!(s.len(), 3);
        assert_eq!(s.mean_cost(), 200.0);
        assert_eq!(s.mean_effect(), 3.0);
    }

    #[test]
    fn test_rejects_bad_vectors() {
        assert_eq!(
            Strategy::new("A", vec![1.0, 2.0], vec![1.0]).unwrap_err(),
            EconError::Stats(StatsError::SizeMismatch { left: 2, right: 1 })
        );
        assert!(matches!(
            Strategy::new("A", vec![], vec![]),
            Err(EconError::Stats(StatsError::InsufficientSample { .. }))
        ));
    }

    #[test]
    fn test_rejects_non_finite_observations() {
        assert_eq!(
            Strategy::new("A", vec![1.0, f64::NAN], vec![1.0, 2.0]).unwrap_err(),
            EconError::NonFiniteObservation {
                strategy: "A".to_string(),
                kind: "cost",
                index: 1,
            }
        );
        assert_eq!(
            Strategy::new("B", vec![1.0, 2.0], vec![f64::INFINITY, 2.0]).unwrap_err(),
            EconError::NonFiniteObservation {
                strategy: "B".to_string(),
                kind: "effect",
                index: 0,
            }
        );
    }

    #[test]
    fn test_nmb() {
        let s = Strategy::new("A", vec![100.0, 300.0], vec![1.0, 2.0]).unwrap();
        assert_eq!(s.nmb_observations(1000.0), vec![900.0, 1700.0]);
        assert_eq!(s.mean_nmb(1000.0), 1300.0);
    }
}
