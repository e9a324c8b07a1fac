//! Cohort simulation
//!
//! A cohort owns one [`Patient`] per index, each seeded from (cohort id,
//! index). Patients share only read-only parameters, so they are simulated in
//! parallel when the `parallel` feature is enabled; results are identical
//! either way.

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::config::{ModelParameters, TherapyParameters};
use crate::error::Result;
use crate::metrics::SimulationMetrics;
use crate::model::{CohortId, PatientId, Therapy};
use crate::outputs::CohortOutputs;
use crate::patient::{Patient, PatientOutcome};

/// A population simulated under one therapy
#[derive(Debug, Clone)]
pub struct Cohort<'a> {
    id: CohortId,
    therapy: Therapy,
    params: &'a ModelParameters,
    therapy_params: &'a TherapyParameters,
    patients: Vec<Patient>,
}

impl<'a> Cohort<'a> {
    /// Build a cohort of `params.population_size` patients.
    ///
    /// Validates the parameters first; a cohort is never partially run on bad
    /// input.
    pub fn new(id: CohortId, therapy: Therapy, params: &'a ModelParameters) -> Result<Self> {
        params.validate()?;
        let therapy_params = params.therapy(therapy)?;

        // validate() guarantees the population fits in u32
        let patients = (0..params.population_size as u32)
            .map(|index| Patient::new(PatientId::new(id, index)))
            .collect();

        Ok(Self {
            id,
            therapy,
            params,
            therapy_params,
            patients,
        })
    }

    #[must_use]
    pub fn id(&self) -> CohortId {
        self.id
    }

    #[must_use]
    pub fn therapy(&self) -> Therapy {
        self.therapy
    }

    #[must_use]
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Simulate every patient once and aggregate the results.
    ///
    /// Consumes the cohort. The first patient error aborts the run.
    pub fn simulate(self) -> Result<CohortOutputs> {
        tracing::debug!(
            cohort = %self.id,
            therapy = %self.therapy,
            population = self.patients.len(),
            horizon = ?self.params.time_horizon,
            "Simulating cohort"
        );

        let runs = self.run_patients()?;

        let mut metrics = SimulationMetrics::new();
        let mut outcomes = Vec::with_capacity(runs.len());
        for (outcome, patient_metrics) in runs {
            metrics.merge(&patient_metrics);
            outcomes.push(outcome);
        }

        tracing::info!(
            cohort = %self.id,
            therapy = %self.therapy,
            cycles = metrics.cycles,
            deaths = metrics.total_deaths(),
            censored = metrics.censored,
            "Cohort simulation complete"
        );

        Ok(CohortOutputs::new(
            self.id,
            self.therapy,
            self.params.time_horizon,
            outcomes,
            metrics,
        ))
    }

    fn simulate_patient(&self, patient: &Patient) -> Result<(PatientOutcome, SimulationMetrics)> {
        let mut metrics = SimulationMetrics::new();
        let outcome = patient.simulate(self.params, self.therapy_params, &mut metrics)?;
        Ok((outcome, metrics))
    }

    #[cfg(feature = "parallel")]
    fn run_patients(&self) -> Result<Vec<(PatientOutcome, SimulationMetrics)>> {
        self.patients
            .par_iter()
            .map(|patient| self.simulate_patient(patient))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_patients(&self) -> Result<Vec<(PatientOutcome, SimulationMetrics)>> {
        self.patients
            .iter()
            .map(|patient| self.simulate_patient(patient))
            .collect()
    }
}
