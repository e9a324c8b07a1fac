use serde::{Deserialize, Serialize};

use super::interval::{
    ConfidenceInterval, IntervalKind, check_alpha, percentile_interval, t_critical,
};
use super::summary::SummaryStat;
use crate::error::StatsError;

/// How two samples relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pairing {
    /// Observation `i` of both samples comes from the same patient stream
    #[default]
    Paired,
    /// The samples are unrelated and may differ in size
    Independent,
}

/// Difference `x - y_ref` of two independent samples.
///
/// The interval uses the Welch standard error and Welch–Satterthwaite degrees
/// of freedom, so neither equal variances nor equal sizes are assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceStatIndependent {
    name: String,
    x: SummaryStat,
    y_ref: SummaryStat,
}

impl DifferenceStatIndependent {
    pub fn new(name: impl Into<String>, x: &[f64], y_ref: &[f64]) -> Result<Self, StatsError> {
        let name = name.into();
        Ok(Self {
            x: SummaryStat::new(format!("{name} (x)"), x)?,
            y_ref: SummaryStat::new(format!("{name} (reference)"), y_ref)?,
            name,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `mean(x) - mean(y_ref)`
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.x.mean() - self.y_ref.mean()
    }

    /// Variance components `s_x^2 / n_x` and `s_y^2 / n_y`
    fn variance_terms(&self) -> Result<(f64, f64), StatsError> {
        let vx = self.x.std_err()?.powi(2);
        let vy = self.y_ref.std_err()?.powi(2);
        Ok((vx, vy))
    }

    /// Welch standard error of the difference
    pub fn std_err(&self) -> Result<f64, StatsError> {
        let (vx, vy) = self.variance_terms()?;
        Ok((vx + vy).sqrt())
    }

    /// Welch–Satterthwaite degrees of freedom
    pub fn degrees_of_freedom(&self) -> Result<f64, StatsError> {
        let (vx, vy) = self.variance_terms()?;
        let nx = self.x.len() as f64;
        let ny = self.y_ref.len() as f64;
        Ok((vx + vy).powi(2) / (vx.powi(2) / (nx - 1.0) + vy.powi(2) / (ny - 1.0)))
    }

    pub fn t_confidence_interval(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        check_alpha(alpha)?;
        let se = self.std_err()?;
        if se == 0.0 {
            return Ok(ConfidenceInterval::symmetric(self.mean(), 0.0));
        }
        let df = self.degrees_of_freedom()?;
        Ok(ConfidenceInterval::symmetric(
            self.mean(),
            t_critical(alpha, df) * se,
        ))
    }

    /// Percentile interval of `x_i - mean(y_ref)`
    pub fn percentile_interval(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        check_alpha(alpha)?;
        let y_mean = self.y_ref.mean();
        let shifted: Vec<f64> = self.x.data().iter().map(|x| x - y_mean).collect();
        Ok(percentile_interval(&shifted, alpha))
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

/// Difference `x - y_ref` of two samples matched by index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceStatPaired {
    differences: SummaryStat,
}

impl DifferenceStatPaired {
    /// Fails with `SizeMismatch` unless `x` and `y_ref` have equal length
    pub fn new(name: impl Into<String>, x: &[f64], y_ref: &[f64]) -> Result<Self, StatsError> {
        if x.len() != y_ref.len() {
            return Err(StatsError::SizeMismatch {
                left: x.len(),
                right: y_ref.len(),
            });
        }
        let differences: Vec<f64> = x.iter().zip(y_ref).map(|(a, b)| a - b).collect();
        Ok(Self {
            differences: SummaryStat::new(name, &differences)?,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.differences.name()
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.differences.mean()
    }

    /// Per-index differences `x_i - y_i`
    #[must_use]
    pub fn differences(&self) -> &[f64] {
        self.differences.data()
    }

    pub fn std_err(&self) -> Result<f64, StatsError> {
        self.differences.std_err()
    }

    pub fn t_confidence_interval(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        self.differences.t_confidence_interval(alpha)
    }

    pub fn percentile_interval(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        self.differences.percentile_interval(alpha)
    }

    pub fn interval(
        &self,
        kind: IntervalKind,
        alpha: f64,
    ) -> Result<ConfidenceInterval, StatsError> {
        self.differences.interval(kind, alpha)
    }
}

/// Paired or independent difference, chosen at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DifferenceStat {
    Paired(DifferenceStatPaired),
    Independent(DifferenceStatIndependent),
}

impl DifferenceStat {
    pub fn new(
        pairing: Pairing,
        name: impl Into<String>,
        x: &[f64],
        y_ref: &[f64],
    ) -> Result<Self, StatsError> {
        Ok(match pairing {
            Pairing::Paired => Self::Paired(DifferenceStatPaired::new(name, x, y_ref)?),
            Pairing::Independent => {
                Self::Independent(DifferenceStatIndependent::new(name, x, y_ref)?)
            }
        })
    }

    #[must_use]
    pub fn pairing(&self) -> Pairing {
        match self {
            Self::Paired(_) => Pairing::Paired,
            Self::Independent(_) => Pairing::Independent,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Paired(d) => d.name(),
            Self::Independent(d) => d.name(),
        }
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        match self {
            Self::Paired(d) => d.mean(),
            Self::Independent(d) => d.mean(),
        }
    }

    pub fn interval(
        &self,
        kind: IntervalKind,
        alpha: f64,
    ) -> Result<ConfidenceInterval, StatsError> {
        match self {
            Self::Paired(d) => d.interval(kind, alpha),
            Self::Independent(d) => d.interval(kind, alpha),
        }
    }

    pub fn t_confidence_interval(&self, alpha: f64) -> Result<ConfidenceInterval, StatsError> {
        self.interval(IntervalKind::Confidence, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_mean_is_difference_of_means() {
        let x = [3.5, 1.25, 9.0, 4.0, 7.75];
        let y = [2.0, 8.5, 1.5];
        let diff = DifferenceStatIndependent::new("d", &x, &y).unwrap();
        let expected = x.iter().sum::<f64>() / 5.0 - y.iter().sum::<f64>() / 3.0;
        assert!((diff.mean() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_independent_mean_with_single_observations() {
        let diff = DifferenceStatIndependent::new("d", &[5.0], &[2.0]).unwrap();
        assert_eq!(diff.mean(), 3.0);
        assert!(matches!(
            diff.t_confidence_interval(0.05),
            Err(StatsError::InsufficientSample { .. })
        ));
    }

    #[test]
    fn test_welch_equal_variance_equal_size_matches_pooled() {
        // Equal n and variance: Welch df = 2(n - 1)
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 3.0, 4.0, 5.0, 6.0];
        let diff = DifferenceStatIndependent::new("d", &x, &y).unwrap();
        assert!((diff.degrees_of_freedom().unwrap() - 8.0).abs() < 1e-9);
        // se = sqrt(2.5/5 + 2.5/5) = 1
        assert!((diff.std_err().unwrap() - 1.0).abs() < 1e-12);

        let ci = diff.t_confidence_interval(0.05).unwrap();
        // t_{0.975, 8} = 2.306004
        assert!((ci.lower - (-1.0 - 2.306_004)).abs() < 1e-5);
        assert!((ci.upper - (-1.0 + 2.306_004)).abs() < 1e-5);
    }

    #[test]
    fn test_welch_unequal_variances() {
        let x = [10.0, 12.0, 14.0, 16.0, 18.0, 20.0];
        let y = [5.0, 5.5, 6.0];
        let diff = DifferenceStatIndependent::new("d", &x, &y).unwrap();
        let vx: f64 = 14.0 / 6.0;
        let vy: f64 = 0.25 / 3.0;
        let df = (vx + vy).powi(2) / (vx * vx / 5.0 + vy * vy / 2.0);
        assert!((diff.degrees_of_freedom().unwrap() - df).abs() < 1e-9);
        assert!(diff.degrees_of_freedom().unwrap() < 7.0);
    }

    #[test]
    fn test_zero_variance_gives_degenerate_interval() {
        let diff = DifferenceStatIndependent::new("d", &[3.0, 3.0], &[1.0, 1.0, 1.0]).unwrap();
        let ci = diff.t_confidence_interval(0.05).unwrap();
        assert_eq!(ci, ConfidenceInterval::new(2.0, 2.0));
    }

    #[test]
    fn test_paired_requires_equal_lengths() {
        let err = DifferenceStatPaired::new("d", &[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, StatsError::SizeMismatch { left: 3, right: 2 });

        let err = DifferenceStat::new(Pairing::Paired, "d", &[1.0], &[]).unwrap_err();
        assert_eq!(err, StatsError::SizeMismatch { left: 1, right: 0 });
    }

    #[test]
    fn test_paired_removes_shared_noise() {
        // y differs from x by a constant 1 plus tiny noise
        let x = [10.0, 50.0, 30.0, 90.0, 70.0];
        let y = [9.0, 49.1, 28.9, 89.0, 69.0];
        let paired = DifferenceStatPaired::new("d", &x, &y).unwrap();
        let independent = DifferenceStatIndependent::new("d", &x, &y).unwrap();

        assert!((paired.mean() - independent.mean()).abs() < 1e-12);
        assert_eq!(paired.differences().len(), 5);
        let paired_width = paired.t_confidence_interval(0.05).unwrap().width();
        let independent_width = independent.t_confidence_interval(0.05).unwrap().width();
        assert!(paired_width < independent_width / 10.0);
    }

    #[test]
    fn test_difference_stat_dispatch() {
        let x = [1.0, 2.0, 3.0];
        let y = [0.5, 1.0, 2.0];
        let paired = DifferenceStat::new(Pairing::Paired, "d", &x, &y).unwrap();
        let independent = DifferenceStat::new(Pairing::Independent, "d", &x, &y).unwrap();
        assert_eq!(paired.pairing(), Pairing::Paired);
        assert_eq!(independent.pairing(), Pairing::Independent);
        assert!((paired.mean() - independent.mean()).abs() < 1e-12);
        assert_eq!(paired.name(), "d");
        assert_eq!(independent.name(), "d");
    }

    #[test]
    fn test_independent_prediction_interval() {
        let x: Vec<f64> = (0..=100).map(f64::from).collect();
        let diff = DifferenceStatIndependent::new("d", &x, &[10.0, 10.0]).unwrap();
        let pi = diff.interval(IntervalKind::Prediction, 0.1).unwrap();
        assert!((pi.lower - -5.0).abs() < 1e-9);
        assert!((pi.upper - 85.0).abs() < 1e-9);
    }
}
