//! Random variate source for next-state draws
//!
//! Each patient owns one [`RandomVariateSource`] seeded from its [`PatientId`],
//! so no stream is ever shared between patients and results do not depend on
//! execution order.
//!
//! [`PatientId`]: crate::model::PatientId

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::model::{HealthState, validate_distribution};

/// Draws next health states from a private pseudo-random stream
#[derive(Debug, Clone)]
pub struct RandomVariateSource<R = StdRng> {
    rng: R,
}

impl RandomVariateSource<StdRng> {
    /// Create a source whose stream is fully determined by `seed`
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomVariateSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw an index from a discrete distribution by inverse CDF.
    ///
    /// Fails with `InvalidDistribution` unless the probabilities are
    /// non-negative and sum to one within tolerance.
    pub fn sample_index(&mut self, probabilities: &[f64]) -> Result<usize> {
        validate_distribution(probabilities)?;

        let u: f64 = self.rng.random();
        let mut cumulative = 0.0;
        let mut last_positive = 0;
        for (i, p) in probabilities.iter().enumerate() {
            if *p <= 0.0 {
                continue;
            }
            cumulative += p;
            last_positive = i;
            if u < cumulative {
                return Ok(i);
            }
        }

        // Round-off left u above the final cumulative sum
        Ok(last_positive)
    }

    /// Draw the next health state from a transition row
    pub fn next_state(&mut self, row: &[f64; HealthState::COUNT]) -> Result<HealthState> {
        let index = self.sample_index(row)?;
        Ok(HealthState::ALL[index])
    }

    /// Uniform index in `0..len`, used for bootstrap resampling
    pub fn uniform_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}
