mod ids;
mod states;
mod transitions;

pub use ids::{CohortId, PatientId};
pub use states::{HealthState, StateValues, Therapy};
pub use transitions::{PROBABILITY_TOLERANCE, TransitionMatrix, validate_distribution};
