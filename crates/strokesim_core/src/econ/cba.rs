//! Cost-benefit analysis
//!
//! Incremental net monetary benefit of each strategy against the first (base)
//! strategy, `NMB(w) = w * delta_effect - delta_cost`, swept over a grid of
//! willingness-to-pay values.

use serde::{Deserialize, Serialize};

use super::cea::check_equal_lengths;
use super::strategy::Strategy;
use crate::error::EconError;
use crate::series::{PlotSeries, PlotSink};
use crate::stats::{ConfidenceInterval, DifferenceStat, Pairing};

const WTP_LABEL: &str = "Willingness-to-pay threshold ($/QALY)";
const NMB_LABEL: &str = "Incremental net monetary benefit ($)";

/// Evenly spaced grid from `min` to `max` inclusive
#[must_use]
pub fn wtp_grid(min: f64, max: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![min],
        n => {
            let step = (max - min) / (n - 1) as f64;
            (0..n).map(|i| min + step * i as f64).collect()
        }
    }
}

/// Incremental NMB and its band at one WTP value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NmbPoint {
    pub wtp: f64,
    pub nmb: f64,
    pub interval: ConfidenceInterval,
}

/// Incremental NMB of one strategy against the base strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NmbCurve {
    pub strategy: usize,
    pub name: String,
    pub versus: String,
    pub delta_cost: f64,
    pub delta_effect: f64,
    pub points: Vec<NmbPoint>,
}

impl NmbCurve {
    /// Point estimate `w * delta_effect - delta_cost`
    #[must_use]
    pub fn nmb_at(&self, wtp: f64) -> f64 {
        wtp * self.delta_effect - self.delta_cost
    }

    /// WTP at which the strategies are cost-neutral; `None` when the
    /// effects are equal
    #[must_use]
    pub fn break_even_wtp(&self) -> Option<f64> {
        (self.delta_effect != 0.0).then(|| self.delta_cost / self.delta_effect)
    }

    /// Estimate, lower and upper band as three line series
    #[must_use]
    pub fn series(&self) -> [PlotSeries; 3] {
        let line = |suffix: &str, y: fn(&NmbPoint) -> f64| {
            PlotSeries::new(
                format!("{}{suffix}", self.name),
                WTP_LABEL,
                NMB_LABEL,
                self.points.iter().map(|p| (p.wtp, y(p))).collect(),
            )
        };
        [
            line("", |p| p.nmb),
            line(" (lower)", |p| p.interval.lower),
            line(" (upper)", |p| p.interval.upper),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct CostBenefitAnalysis<'a> {
    strategies: &'a [Strategy],
    pairing: Pairing,
    wtp_values: Vec<f64>,
}

impl<'a> CostBenefitAnalysis<'a> {
    pub fn new(
        strategies: &'a [Strategy],
        pairing: Pairing,
        wtp_values: Vec<f64>,
    ) -> Result<Self, EconError> {
        if strategies.is_empty() {
            return Err(EconError::NoStrategies);
        }
        if pairing == Pairing::Paired {
            check_equal_lengths(strategies)?;
        }
        Ok(Self {
            strategies,
            pairing,
            wtp_values,
        })
    }

    #[must_use]
    pub fn wtp_values(&self) -> &[f64] {
        &self.wtp_values
    }

    /// Difference in NMB observations between strategy `index` and the base
    pub fn incremental_nmb(&self, index: usize, wtp: f64) -> Result<DifferenceStat, EconError> {
        let s = self
            .strategies
            .get(index)
            .ok_or(EconError::UnknownStrategy(index))?;
        let base = &self.strategies[0];
        Ok(DifferenceStat::new(
            self.pairing,
            format!("{} vs {} NMB", s.name(), base.name()),
            &s.nmb_observations(wtp),
            &base.nmb_observations(wtp),
        )?)
    }

    /// Curve of strategy `index` against the base over the WTP grid
    pub fn curve(&self, index: usize, alpha: f64) -> Result<NmbCurve, EconError> {
        let s = self
            .strategies
            .get(index)
            .ok_or(EconError::UnknownStrategy(index))?;
        let base = &self.strategies[0];

        let points = self
            .wtp_values
            .iter()
            .map(|&wtp| {
                let diff = self.incremental_nmb(index, wtp)?;
                Ok(NmbPoint {
                    wtp,
                    nmb: diff.mean(),
                    interval: diff.t_confidence_interval(alpha)?,
                })
            })
            .collect::<Result<Vec<_>, EconError>>()?;

        Ok(NmbCurve {
            strategy: index,
            name: s.name().to_string(),
            versus: base.name().to_string(),
            delta_cost: s.mean_cost() - base.mean_cost(),
            delta_effect: s.mean_effect() - base.mean_effect(),
            points,
        })
    }

    /// Curves for every strategy after the base
    pub fn curves(&self, alpha: f64) -> Result<Vec<NmbCurve>, EconError> {
        let curves = (1..self.strategies.len())
            .map(|i| self.curve(i, alpha))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            curves = curves.len(),
            wtp_points = self.wtp_values.len(),
            "Computed incremental NMB curves"
        );
        Ok(curves)
    }

    /// Strategy with the highest mean NMB at `wtp`; ties keep the earliest
    #[must_use]
    pub fn optimal_strategy(&self, wtp: f64) -> usize {
        self.strategies
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best, best_nmb), (i, s)| {
                let nmb = s.mean_nmb(wtp);
                if nmb > best_nmb { (i, nmb) } else { (best, best_nmb) }
            })
            .0
    }

    pub fn send_curves<S: PlotSink>(&self, curves: &[NmbCurve], sink: &mut S) -> Result<(), S::Error> {
        for curve in curves {
            for series in curve.series() {
                sink.sample_path(&series)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;

    fn strategies() -> Vec<Strategy> {
        vec![
            Strategy::new("A", vec![100.0, 200.0, 300.0], vec![1.0, 2.0, 3.0]).unwrap(),
            Strategy::new("B", vec![700.0, 750.0, 950.0], vec![2.0, 3.5, 4.5]).unwrap(),
        ]
    }

    #[test]
    fn test_wtp_grid() {
        assert_eq!(wtp_grid(0.0, 100.0, 5), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(wtp_grid(10.0, 20.0, 1), vec![10.0]);
        assert!(wtp_grid(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_curve_is_linear_in_wtp() {
        let strategies = strategies();
        let cba =
            CostBenefitAnalysis::new(&strategies, Pairing::Paired, wtp_grid(0.0, 1000.0, 11))
                .unwrap();
        let curve = cba.curve(1, 0.05).unwrap();

        // delta cost = 600, delta effect = 4/3
        assert!((curve.delta_cost - 600.0).abs() < 1e-9);
        assert!((curve.delta_effect - 4.0 / 3.0).abs() < 1e-12);
        for point in &curve.points {
            assert!((point.nmb - curve.nmb_at(point.wtp)).abs() < 1e-9);
            assert!(point.interval.contains(point.nmb));
        }
        assert!((curve.break_even_wtp().unwrap() - 450.0).abs() < 1e-9);
        assert!((curve.nmb_at(450.0)).abs() < 1e-9);
    }

    #[test]
    fn test_break_even_undefined_for_equal_effects() {
        let strategies = [
            Strategy::new("A", vec![1.0, 2.0], vec![1.0, 1.0]).unwrap(),
            Strategy::new("B", vec![3.0, 5.0], vec![1.0, 1.0]).unwrap(),
        ];
        let cba = CostBenefitAnalysis::new(&strategies, Pairing::Independent, vec![0.0]).unwrap();
        assert_eq!(cba.curve(1, 0.05).unwrap().break_even_wtp(), None);
    }

    #[test]
    fn test_paired_band_narrower_than_independent() {
        let strategies = strategies();
        let wtp = vec![500.0];
        let paired = CostBenefitAnalysis::new(&strategies, Pairing::Paired, wtp.clone())
            .unwrap()
            .curve(1, 0.05)
            .unwrap();
        let independent = CostBenefitAnalysis::new(&strategies, Pairing::Independent, wtp)
            .unwrap()
            .curve(1, 0.05)
            .unwrap();

        assert!((paired.points[0].nmb - independent.points[0].nmb).abs() < 1e-9);
        assert!(paired.points[0].interval.width() < independent.points[0].interval.width());
    }

    #[test]
    fn test_optimal_strategy_switches_at_break_even() {
        let strategies = strategies();
        let cba = CostBenefitAnalysis::new(&strategies, Pairing::Paired, vec![]).unwrap();
        assert_eq!(cba.optimal_strategy(0.0), 0);
        assert_eq!(cba.optimal_strategy(400.0), 0);
        assert_eq!(cba.optimal_strategy(500.0), 1);
    }

    #[test]
    fn test_errors() {
        let strategies = strategies();
        let cba = CostBenefitAnalysis::new(&strategies, Pairing::Paired, vec![1.0]).unwrap();
        assert_eq!(cba.curve(5, 0.05).unwrap_err(), EconError::UnknownStrategy(5));
        assert_eq!(
            cba.curve(1, 0.0).unwrap_err(),
            EconError::Stats(StatsError::InvalidSignificanceLevel(0.0))
        );
        assert_eq!(
            CostBenefitAnalysis::new(&[], Pairing::Paired, vec![]).unwrap_err(),
            EconError::NoStrategies
        );
    }

    #[test]
    fn test_curves_skip_base_and_produce_series() {
        let strategies = strategies();
        let cba =
            CostBenefitAnalysis::new(&strategies, Pairing::Paired, wtp_grid(0.0, 100.0, 3))
                .unwrap();
        let curves = cba.curves(0.05).unwrap();
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].versus, "A");

        let [estimate, lower, upper] = curves[0].series();
        assert_eq!(estimate.name, "B");
        assert_eq!(estimate.points.len(), 3);
        assert!(lower.points.iter().zip(&upper.points).all(|(l, u)| l.1 <= u.1));
    }
}
