//! Integration tests for the strokesim simulation engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Closed-form checks against simple absorbing chains
//! - `reproducibility` - Seeding and determinism across runs and arms
//! - `economics` - CEA and CBA on simulated cohorts

mod economics;

use crate::config::{ModelParameters, ParametersBuilder, TherapyParameters};
use crate::model::{StateValues, Therapy, TransitionMatrix};

/// Well -> Natural Death with probability `p` each cycle, otherwise stay well.
///
/// Stroke states self-loop and are unreachable. Every cycle alive is worth one
/// utility unit and costs 100.
fn constant_hazard_params(p: f64, horizon: Option<u32>, population: usize) -> ModelParameters {
    let transitions = TransitionMatrix::new([
        [1.0 - p, 0.0, 0.0, 0.0, p],
        [0.0, 1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 1.0],
    ])
    .unwrap();

    ParametersBuilder::new()
        .population_size(population)
        .time_horizon(horizon)
        .discount_rate(0.0)
        .therapy(
            Therapy::None,
            TherapyParameters {
                transitions,
                state_costs: StateValues([100.0, 0.0, 0.0, 0.0, 0.0]),
                state_utilities: StateValues([1.0, 0.0, 0.0, 0.0, 0.0]),
            },
        )
        .build()
        .unwrap()
}
