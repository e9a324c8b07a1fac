//! Cohort outputs
//!
//! Read-only view over a simulated cohort: per-patient outcome vectors in
//! patient-index order, the survival curve, and summary statistics.

use serde::{Deserialize, Serialize};

use crate::error::StatsError;
use crate::metrics::SimulationMetrics;
use crate::model::{CohortId, HealthState, Therapy};
use crate::patient::PatientOutcome;
use crate::series::{Histogram, PlotSeries, PlotSink};
use crate::stats::SummaryStat;

/// Aggregated results of one cohort run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortOutputs {
    cohort_id: CohortId,
    therapy: Therapy,
    time_horizon: Option<u32>,
    outcomes: Vec<PatientOutcome>,
    survival_times: Vec<f64>,
    event_counts: Vec<f64>,
    costs: Vec<f64>,
    utilities: Vec<f64>,
    survival_curve: Vec<usize>,
    metrics: SimulationMetrics,
}

impl CohortOutputs {
    #[must_use]
    pub fn new(
        cohort_id: CohortId,
        therapy: Therapy,
        time_horizon: Option<u32>,
        outcomes: Vec<PatientOutcome>,
        metrics: SimulationMetrics,
    ) -> Self {
        let survival_times = outcomes
            .iter()
            .map(|o| f64::from(o.survival_time))
            .collect();
        let event_counts = outcomes.iter().map(|o| f64::from(o.event_count)).collect();
        let costs = outcomes.iter().map(|o| o.discounted_cost).collect();
        let utilities = outcomes.iter().map(|o| o.discounted_utility).collect();
        let survival_curve = build_survival_curve(&outcomes, time_horizon);

        Self {
            cohort_id,
            therapy,
            time_horizon,
            outcomes,
            survival_times,
            event_counts,
            costs,
            utilities,
            survival_curve,
            metrics,
        }
    }

    #[must_use]
    pub fn cohort_id(&self) -> CohortId {
        self.cohort_id
    }

    #[must_use]
    pub fn therapy(&self) -> Therapy {
        self.therapy
    }

    /// Horizon the cohort was run with; `None` for a lifetime horizon
    #[must_use]
    pub fn time_horizon(&self) -> Option<u32> {
        self.time_horizon
    }

    #[must_use]
    pub fn population_size(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn outcomes(&self) -> &[PatientOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn metrics(&self) -> &SimulationMetrics {
        &self.metrics
    }

    /// State sequence of every patient
    pub fn trajectories(&self) -> impl Iterator<Item = &[HealthState]> {
        self.outcomes.iter().map(|o| o.trajectory.as_slice())
    }

    /// Number of patients alive at each time index `0..=T`.
    ///
    /// A patient who died with survival time `s` is alive for `t < s`; a
    /// patient censored at the horizon is alive for every `t <= horizon`.
    /// Non-increasing, and `curve[0]` is the population size.
    #[must_use]
    pub fn survival_curve(&self) -> &[usize] {
        &self.survival_curve
    }

    /// Survival time (cycles) per patient
    #[must_use]
    pub fn survival_times(&self) -> &[f64] {
        &self.survival_times
    }

    /// Number of tracked events (strokes) per patient
    #[must_use]
    pub fn event_counts(&self) -> &[f64] {
        &self.event_counts
    }

    /// Whether each patient developed at least one tracked event
    #[must_use]
    pub fn developed_event(&self) -> Vec<bool> {
        self.outcomes.iter().map(|o| o.event_count > 0).collect()
    }

    /// Share of the cohort with at least one tracked event
    #[must_use]
    pub fn proportion_developed_event(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let n = self.outcomes.iter().filter(|o| o.event_count > 0).count();
        n as f64 / self.outcomes.len() as f64
    }

    /// Whether each patient reached an absorbing state before the horizon
    #[must_use]
    pub fn death_flags(&self) -> Vec<bool> {
        self.outcomes.iter().map(|o| o.died).collect()
    }

    /// Discounted cost per patient
    #[must_use]
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Discounted utility per patient
    #[must_use]
    pub fn utilities(&self) -> &[f64] {
        &self.utilities
    }

    // === Summary statistics ===

    pub fn summary_survival_times(&self) -> Result<SummaryStat, StatsError> {
        SummaryStat::new("Survival time", &self.survival_times)
    }

    pub fn summary_event_counts(&self) -> Result<SummaryStat, StatsError> {
        SummaryStat::new("Number of strokes", &self.event_counts)
    }

    pub fn summary_costs(&self) -> Result<SummaryStat, StatsError> {
        SummaryStat::new("Discounted cost", &self.costs)
    }

    pub fn summary_utilities(&self) -> Result<SummaryStat, StatsError> {
        SummaryStat::new("Discounted utility", &self.utilities)
    }

    // === Plot series ===

    /// Survival curve as a sample path
    #[must_use]
    pub fn survival_curve_series(&self) -> PlotSeries {
        PlotSeries::new(
            format!("Survival curve ({})", self.therapy),
            "Simulation time step",
            "Number of alive patients",
            self.survival_curve
                .iter()
                .enumerate()
                .map(|(t, alive)| (t as f64, *alive as f64))
                .collect(),
        )
    }

    #[must_use]
    pub fn survival_time_histogram(&self, bin_width: f64) -> Histogram {
        Histogram::from_sample(
            format!("Survival times ({})", self.therapy),
            "Survival time (cycles)",
            &self.survival_times,
            bin_width,
        )
    }

    #[must_use]
    pub fn event_count_histogram(&self) -> Histogram {
        Histogram::from_sample(
            format!("Strokes per patient ({})", self.therapy),
            "Strokes",
            &self.event_counts,
            1.0,
        )
    }

    /// Push the survival curve and both histograms into `sink`
    pub fn send_plots<S: PlotSink>(&self, sink: &mut S, bin_width: f64) -> Result<(), S::Error> {
        sink.sample_path(&self.survival_curve_series())?;
        sink.histogram(&self.survival_time_histogram(bin_width))?;
        sink.histogram(&self.event_count_histogram())
    }
}

fn build_survival_curve(outcomes: &[PatientOutcome], horizon: Option<u32>) -> Vec<usize> {
    let end = horizon
        .or_else(|| outcomes.iter().map(|o| o.survival_time).max())
        .unwrap_or(0) as usize;

    // Number of patients leaving the curve at each time index
    let mut exits = vec![0usize; end + 2];
    for outcome in outcomes {
        let s = outcome.survival_time as usize;
        let exit = if outcome.died { s } else { s + 1 };
        exits[exit.min(end + 1)] += 1;
    }

    let mut alive = outcomes.len();
    let mut curve = Vec::with_capacity(end + 1);
    for exited in exits.iter().take(end + 1) {
        alive -= exited;
        curve.push(alive);
    }
    curve
}
