use serde::{Deserialize, Serialize};

use super::interval::{
    ConfidenceInterval, IntervalKind, check_alpha, percentile_interval, t_critical,
};
use crate::error::StatsError;

/// Statistics of one numeric sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStat {
    name: String,
    data: Vec<f64>,
    mean: f64,
    /// Sample standard deviation (n - 1); `None` for a single observation
    std_dev: Option<f64>,
}

impl SummaryStat {
    /// Summarize a non-empty sample
    pub fn new(name: impl Into<String>, data: &[f64]) -> Result<Self, StatsError> {
        let n = data.len();
        if n == 0 {
            return Err(StatsError::InsufficientSample {
                required: 1,
                actual: 0,
            });
        }

        let mean = data.iter().sum::<f64>() / n as f64;
        let std_dev = (n >= 2).then(|| {
            let ss: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });

        Ok(Self {
            name: name.into(),
            data: data.to_vec(),
            mean,
            std_dev,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> Option<f64> {
        self.std_dev
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn require_variance(&self) -> Result<f64, StatsError> {
        self.std_dev.ok_or(StatsError::InsufficientSample {
            required: 2,
            actual: self.data.len(),
        })
    }

    /// Standard error of the mean
    pub fn std_err(&self) -> Result<f64, StatsError> {
        Ok(self.require_variance()? / (self.data.len() as f64).sqrt())
    }

    /// Student's t confidence interval of the mean with n - 1 degrees of freedom
    pub fn t_confidence_interval(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        check_alpha(alpha)?;
        let se = self.std_err()?;
        let df = (self.data.len() - 1) as f64;
        Ok(ConfidenceInterval::symmetric(
            self.mean,
            t_critical(alpha, df) * se,
        ))
    }

    /// Empirical `[alpha/2, 1 - alpha/2]` percentile interval of the observations
    pub fn percentile_interval(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        check_alpha(alpha)?;
        Ok(percentile_interval(&self.data, alpha))
    }

    pub fn interval(
        &self,
        kind: IntervalKind,
        alpha: f64,
    ) -> Result<ConfidenceInterval, StatsError> {
        match kind {
            IntervalKind::Confidence => self.t_confidence_interval(alpha),
            IntervalKind::Prediction => self.percentile_interval(alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    #[test]
    fn test_mean_and_std_dev() {
        let stat = SummaryStat::new("x", &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stat.name(), "x");
        assert_eq!(stat.len(), 8);
        assert_eq!(stat.mean(), 5.0);
        // Sample variance = 32 / 7
        assert!((stat.std_dev().unwrap() - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(stat.min(), 2.0);
        assert_eq!(stat.max(), 9.0);
    }

    #[test]
    fn test_t_interval_known_value() {
        // mean 3, sd sqrt(2.5), n = 5, t_{0.975,4} = 2.776445
        let stat = SummaryStat::new("x", &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let ci = stat.t_confidence_interval(0.05).unwrap();
        let half = 2.776_445 * (2.5_f64).sqrt() / 5.0_f64.sqrt();
        assert!((ci.lower - (3.0 - half)).abs() < 1e-5);
        assert!((ci.upper - (3.0 + half)).abs() < 1e-5);
    }

    #[test]
    fn test_insufficient_sample() {
        assert_eq!(
            SummaryStat::new("empty", &[]).unwrap_err(),
            StatsError::InsufficientSample {
                required: 1,
                actual: 0
            }
        );

        let single = SummaryStat::new("one", &[4.0]).unwrap();
        assert_eq!(single.mean(), 4.0);
        assert_eq!(single.std_dev(), None);
        assert_eq!(
            single.t_confidence_interval(0.05).unwrap_err(),
            StatsError::InsufficientSample {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_interval_widens_as_alpha_decreases() {
        let stat = SummaryStat::new("x", &[1.0, 3.0, 2.0, 5.0, 4.0, 6.0]).unwrap();
        let mut last_width = 0.0;
        for alpha in [0.5, 0.2, 0.1, 0.05, 0.01, 0.001] {
            let width = stat.t_confidence_interval(alpha).unwrap().width();
            assert!(width > last_width, "alpha={alpha}: {width} <= {last_width}");
            last_width = width;
        }
    }

    #[test]
    fn test_interval_narrows_with_sample_size() {
        // Repeating [0, 2] keeps the sample variance at n / (n - 1)
        let mut last_width = f64::INFINITY;
        for k in [1, 2, 5, 10, 50, 200] {
            let data: Vec<f64> = (0..k).flat_map(|_| [0.0, 2.0]).collect();
            let width = SummaryStat::new("x", &data)
                .unwrap()
                .t_confidence_interval(0.05)
                .unwrap()
                .width();
            assert!(width <= last_width, "n={}: {width} > {last_width}", 2 * k);
            last_width = width;
        }
    }

    #[test]
    fn test_confidence_interval_covers_true_mean() {
        let mut rng = StdRng::seed_from_u64(2024);
        let normal = Normal::new(10.0, 3.0).unwrap();

        let trials = 400;
        let covered = (0..trials)
            .filter(|_| {
                let data: Vec<f64> = (0..30).map(|_| normal.sample(&mut rng)).collect();
                SummaryStat::new("x", &data)
                    .unwrap()
                    .t_confidence_interval(0.05)
                    .unwrap()
                    .contains(10.0)
            })
            .count();

        let coverage = covered as f64 / trials as f64;
        assert!(
            (0.90..=0.99).contains(&coverage),
            "coverage {coverage} far from 0.95"
        );
    }

    #[test]
    fn test_prediction_interval() {
        let data: Vec<f64> = (0..=100).map(f64::from).collect();
        let stat = SummaryStat::new("x", &data).unwrap();
        let pi = stat.interval(IntervalKind::Prediction, 0.1).unwrap();
        assert!((pi.lower - 5.0).abs() < 1e-9);
        assert!((pi.upper - 95.0).abs() < 1e-9);
        assert!(stat.interval(IntervalKind::Prediction, 1.5).is_err());
    }
}
