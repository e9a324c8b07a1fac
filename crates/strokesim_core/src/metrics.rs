//! Simulation metrics collected while running a cohort
//!
//! Counts cycles, state visits and how patients left the simulation. Useful
//! for spotting malformed transition tables (e.g. nobody ever dying) and for
//! profiling cohort runs.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::HealthState;

/// Metrics collected during cohort simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Total cycles simulated across all patients
    pub cycles: u64,
    /// Number of times each state was entered
    pub state_visits: FxHashMap<HealthState, u64>,
    /// Deaths per absorbing state
    pub deaths: FxHashMap<HealthState, u64>,
    /// Patients still alive at the horizon
    pub censored: u64,
}

impl SimulationMetrics {
    /// Create empty metrics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cycle that moved a patient into `state`
    pub fn record_cycle(&mut self, state: HealthState) {
        self.cycles += 1;
        *self.state_visits.entry(state).or_insert(0) += 1;
    }

    /// Record a patient absorbed in `state`
    pub fn record_death(&mut self, state: HealthState) {
        *self.deaths.entry(state).or_insert(0) += 1;
    }

    /// Record a patient alive at the horizon
    pub fn record_censored(&mut self) {
        self.censored += 1;
    }

    /// Fold another set of metrics into this one
    pub fn merge(&mut self, other: &SimulationMetrics) {
        self.cycles += other.cycles;
        for (state, count) in &other.state_visits {
            *self.state_visits.entry(*state).or_insert(0) += count;
        }
        for (state, count) in &other.deaths {
            *self.deaths.entry(*state).or_insert(0) += count;
        }
        self.censored += other.censored;
    }

    #[must_use]
    pub fn total_deaths(&self) -> u64 {
        self.deaths.values().sum()
    }

    #[must_use]
    pub fn visits(&self, state: HealthState) -> u64 {
        self.state_visits.get(&state).copied().unwrap_or(0)
    }

    /// Average cycles per patient
    #[must_use]
    pub fn avg_cycles_per_patient(&self) -> f64 {
        let patients = self.total_deaths() + self.censored;
        if patients == 0 {
            0.0
        } else {
            self.cycles as f64 / patients as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_basic() {
        let mut metrics = SimulationMetrics::new();

        metrics.record_cycle(HealthState::Well);
        metrics.record_cycle(HealthState::Stroke);
        metrics.record_cycle(HealthState::StrokeDeath);
        metrics.record_death(HealthState::StrokeDeath);
        metrics.record_cycle(HealthState::Well);
        metrics.record_censored();

        assert_eq!(metrics.cycles, 4);
        assert_eq!(metrics.visits(HealthState::Well), 2);
        assert_eq!(metrics.visits(HealthState::PostStroke), 0);
        assert_eq!(metrics.total_deaths(), 1);
        assert_eq!(metrics.censored, 1);
        assert_eq!(metrics.avg_cycles_per_patient(), 2.0);
    }

    #[test]
    fn test_metrics_merge() {
        let mut a = SimulationMetrics::new();
        a.record_cycle(HealthState::Well);
        a.record_death(HealthState::NaturalDeath);

        let mut b = SimulationMetrics::new();
        b.record_cycle(HealthState::Well);
        b.record_cycle(HealthState::NaturalDeath);
        b.record_death(HealthState::NaturalDeath);
        b.record_censored();

        a.merge(&b);
        assert_eq!(a.cycles, 3);
        assert_eq!(a.visits(HealthState::Well), 2);
        assert_eq!(a.deaths.get(&HealthState::NaturalDeath), Some(&2));
        assert_eq!(a.censored, 1);
    }

    #[test]
    fn test_empty_metrics_average() {
        assert_eq!(SimulationMetrics::new().avg_cycles_per_patient(), 0.0);
    }
}
