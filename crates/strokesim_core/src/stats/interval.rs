use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::error::StatsError;

/// Which interval to report around an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// t-based confidence interval of the mean
    Confidence,
    /// Empirical percentile interval of the observations
    Prediction,
}

/// Closed interval `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Symmetric interval `center ± half_width`
    #[must_use]
    pub fn symmetric(center: f64, half_width: f64) -> Self {
        Self {
            lower: center - half_width,
            upper: center + half_width,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

pub(crate) fn check_alpha(alpha: f64) -> Result<(), StatsError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidSignificanceLevel(alpha))
    }
}

/// Above this many degrees of freedom the t quantile is taken from the
/// standard normal; statrs' t inverse loses accuracy far out.
const NORMAL_APPROX_DF: f64 = 1e5;

/// Two-sided Student's t critical value `t_{1 - alpha/2, df}`.
///
/// `df` must be positive; callers check sample sizes first.
pub(crate) fn t_critical(alpha: f64, df: f64) -> f64 {
    let p = 1.0 - alpha / 2.0;
    if df >= NORMAL_APPROX_DF {
        return match Normal::new(0.0, 1.0) {
            Ok(dist) => dist.inverse_cdf(p),
            Err(_) => f64::NAN,
        };
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Percentile `q` in [0, 1] of an ascending-sorted sample, interpolating
/// linearly between order statistics. Returns NaN for an empty sample.
#[must_use]
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Percentile interval `[q_{alpha/2}, q_{1-alpha/2}]` of an unsorted sample
pub(crate) fn percentile_interval(values: &[f64], alpha: f64) -> ConfidenceInterval {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    ConfidenceInterval::new(
        percentile(&sorted, alpha / 2.0),
        percentile(&sorted, 1.0 - alpha / 2.0),
    )
}
