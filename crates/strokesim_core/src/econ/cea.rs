//! Cost-effectiveness analysis
//!
//! Strategies are first screened for strong dominance, then the remaining
//! points are sorted by mean effect and extended-dominated points are removed
//! one at a time until the ICERs along the frontier are increasing.

use serde::{Deserialize, Serialize};

use super::strategy::Strategy;
use crate::error::{EconError, StatsError};
use crate::sampling::RandomVariateSource;
use crate::series::{PlotSeries, PlotSink};
use crate::stats::{
    ConfidenceInterval, DifferenceStat, IntervalKind, Pairing, SummaryStat, check_alpha,
    percentile_interval,
};

const EFFECT_LABEL: &str = "Additional discounted QALY";
const COST_LABEL: &str = "Additional discounted cost";

/// Where a strategy ended up after frontier construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominanceStatus {
    Frontier,
    /// Another strategy costs no more and is at least as effective
    Dominated,
    /// Lies above the line joining its frontier neighbours
    ExtendedDominated,
}

/// Incremental cost-effectiveness ratio `delta_cost / delta_effect`
pub fn icer(delta_cost: f64, delta_effect: f64) -> Result<f64, EconError> {
    if delta_effect == 0.0 {
        Err(EconError::DegenerateEffectDifference)
    } else {
        Ok(delta_cost / delta_effect)
    }
}

/// ICER with NaN standing in for an undefined ratio
fn icer_or_nan(delta_cost: f64, delta_effect: f64) -> f64 {
    icer(delta_cost, delta_effect).unwrap_or(f64::NAN)
}

/// A frontier member, compared with the previous frontier member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    /// Index into the input strategies
    pub strategy: usize,
    pub name: String,
    pub mean_cost: f64,
    pub mean_effect: f64,
    pub incremental_cost: f64,
    pub incremental_effect: f64,
    /// NaN for the first (least effective) frontier point
    pub icer: f64,
}

/// Mean with an interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub mean: f64,
    pub interval: ConfidenceInterval,
}

/// Incremental results of a frontier member against its predecessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementalEstimate {
    pub versus: String,
    pub cost: Estimate,
    pub effect: Estimate,
    pub icer: f64,
    /// Percentile bootstrap interval; `None` without enough defined ratios
    pub icer_interval: Option<ConfidenceInterval>,
}

/// One row of the cost-effectiveness table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeTableRow {
    pub strategy: usize,
    pub name: String,
    pub status: DominanceStatus,
    pub cost: Estimate,
    pub effect: Estimate,
    pub incremental: Option<IncrementalEstimate>,
}

/// Settings for [`CostEffectivenessAnalysis::table`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    pub interval: IntervalKind,
    pub alpha: f64,
    /// Bootstrap resamples for the ICER interval; 0 disables it
    pub bootstrap_samples: usize,
    pub seed: u64,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            interval: IntervalKind::Confidence,
            alpha: 0.05,
            bootstrap_samples: 1000,
            seed: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CostEffectivenessAnalysis<'a> {
    strategies: &'a [Strategy],
    pairing: Pairing,
    statuses: Vec<DominanceStatus>,
    frontier: Vec<usize>,
}

impl<'a> CostEffectivenessAnalysis<'a> {
    /// Build the frontier.
    ///
    /// Paired comparisons require every strategy to have the same number of
    /// observations.
    pub fn new(strategies: &'a [Strategy], pairing: Pairing) -> Result<Self, EconError> {
        if strategies.is_empty() {
            return Err(EconError::NoStrategies);
        }
        if pairing == Pairing::Paired {
            check_equal_lengths(strategies)?;
        }

        let (statuses, frontier) = build_frontier(strategies);
        tracing::debug!(
            strategies = strategies.len(),
            frontier = frontier.len(),
            "Built cost-effectiveness frontier"
        );

        Ok(Self {
            strategies,
            pairing,
            statuses,
            frontier,
        })
    }

    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        self.strategies
    }

    #[must_use]
    pub fn pairing(&self) -> Pairing {
        self.pairing
    }

    /// Status per strategy, in input order
    #[must_use]
    pub fn statuses(&self) -> &[DominanceStatus] {
        &self.statuses
    }

    pub fn status(&self, index: usize) -> Result<DominanceStatus, EconError> {
        self.statuses
            .get(index)
            .copied()
            .ok_or(EconError::UnknownStrategy(index))
    }

    /// Frontier strategy indices by increasing effect
    #[must_use]
    pub fn frontier_indices(&self) -> &[usize] {
        &self.frontier
    }

    #[must_use]
    pub fn frontier(&self) -> Vec<FrontierPoint> {
        self.frontier
            .iter()
            .enumerate()
            .map(|(k, &i)| {
                let s = &self.strategies[i];
                let (incremental_cost, incremental_effect, icer) = match k {
                    0 => (0.0, 0.0, f64::NAN),
                    _ => {
                        let prev = &self.strategies[self.frontier[k - 1]];
                        let dc = s.mean_cost() - prev.mean_cost();
                        let de = s.mean_effect() - prev.mean_effect();
                        (dc, de, icer_or_nan(dc, de))
                    }
                };
                FrontierPoint {
                    strategy: i,
                    name: s.name().to_string(),
                    mean_cost: s.mean_cost(),
                    mean_effect: s.mean_effect(),
                    incremental_cost,
                    incremental_effect,
                    icer,
                }
            })
            .collect()
    }

    /// Cost-effectiveness table in input order.
    ///
    /// Frontier members after the first carry incremental estimates against
    /// the previous frontier member.
    pub fn table(&self, options: &TableOptions) -> Result<Vec<CeTableRow>, EconError> {
        check_alpha(options.alpha)?;

        let mut incremental: Vec<Option<IncrementalEstimate>> = vec![None; self.strategies.len()];
        for (k, pair) in self.frontier.windows(2).enumerate() {
            let seed = options.seed.wrapping_add(k as u64);
            incremental[pair[1]] = Some(self.incremental_estimate(pair[1], pair[0], options, seed)?);
        }

        self.strategies
            .iter()
            .enumerate()
            .zip(incremental)
            .map(|((i, s), incremental)| {
                Ok(CeTableRow {
                    strategy: i,
                    name: s.name().to_string(),
                    status: self.statuses[i],
                    cost: mean_estimate(format!("{} cost", s.name()), s.costs(), options)?,
                    effect: mean_estimate(format!("{} effect", s.name()), s.effects(), options)?,
                    incremental,
                })
            })
            .collect()
    }

    fn incremental_estimate(
        &self,
        index: usize,
        versus: usize,
        options: &TableOptions,
        seed: u64,
    ) -> Result<IncrementalEstimate, EconError> {
        let (s, base) = (&self.strategies[index], &self.strategies[versus]);
        let label = format!("{} vs {}", s.name(), base.name());

        let cost = DifferenceStat::new(
            self.pairing,
            format!("{label} cost"),
            s.costs(),
            base.costs(),
        )?;
        let effect = DifferenceStat::new(
            self.pairing,
            format!("{label} effect"),
            s.effects(),
            base.effects(),
        )?;

        Ok(IncrementalEstimate {
            versus: base.name().to_string(),
            cost: Estimate {
                mean: cost.mean(),
                interval: cost.interval(options.interval, options.alpha)?,
            },
            effect: Estimate {
                mean: effect.mean(),
                interval: effect.interval(options.interval, options.alpha)?,
            },
            icer: icer_or_nan(cost.mean(), effect.mean()),
            icer_interval: bootstrap_icer_interval(s, base, self.pairing, options, seed),
        })
    }

    /// Observation clouds and mean points shifted so the first strategy sits
    /// at the origin
    #[must_use]
    pub fn plane_series(&self) -> Vec<PlotSeries> {
        let base = &self.strategies[0];
        let shift = |e: f64, c: f64| (e - base.mean_effect(), c - base.mean_cost());

        let mut series: Vec<PlotSeries> = self
            .strategies
            .iter()
            .map(|s| {
                let cloud = s
                    .effects()
                    .iter()
                    .zip(s.costs())
                    .map(|(e, c)| shift(*e, *c))
                    .collect();
                PlotSeries::new(s.name(), EFFECT_LABEL, COST_LABEL, cloud)
            })
            .collect();

        let means = self
            .strategies
            .iter()
            .map(|s| shift(s.mean_effect(), s.mean_cost()))
            .collect();
        series.push(PlotSeries::new("Strategy means", EFFECT_LABEL, COST_LABEL, means));
        series
    }

    /// Frontier as a line through the shifted mean points
    #[must_use]
    pub fn frontier_series(&self) -> PlotSeries {
        let base = &self.strategies[0];
        let points = self
            .frontier
            .iter()
            .map(|&i| {
                let s = &self.strategies[i];
                (
                    s.mean_effect() - base.mean_effect(),
                    s.mean_cost() - base.mean_cost(),
                )
            })
            .collect();
        PlotSeries::new("Frontier", EFFECT_LABEL, COST_LABEL, points)
    }

    pub fn send_plane<S: PlotSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        for series in self.plane_series() {
            sink.scatter(&series)?;
        }
        sink.sample_path(&self.frontier_series())
    }
}

pub(crate) fn check_equal_lengths(strategies: &[Strategy]) -> Result<(), StatsError> {
    let Some(first) = strategies.first() else {
        return Ok(());
    };
    match strategies.iter().find(|s| s.len() != first.len()) {
        Some(s) => Err(StatsError::SizeMismatch {
            left: first.len(),
            right: s.len(),
        }),
        None => Ok(()),
    }
}

/// `a` dominates `b` if it costs no more and is at least as effective.
/// Identical points are broken by input order.
fn dominates(a: &Strategy, a_index: usize, b: &Strategy, b_index: usize) -> bool {
    let (ca, ea) = (a.mean_cost(), a.mean_effect());
    let (cb, eb) = (b.mean_cost(), b.mean_effect());
    ca <= cb && ea >= eb && (ca < cb || ea > eb || a_index < b_index)
}

fn build_frontier(strategies: &[Strategy]) -> (Vec<DominanceStatus>, Vec<usize>) {
    let mut statuses: Vec<DominanceStatus> = strategies
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let dominated = strategies
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && dominates(other, j, s, i));
            if dominated {
                DominanceStatus::Dominated
            } else {
                DominanceStatus::Frontier
            }
        })
        .collect();

    let mut frontier: Vec<usize> = (0..strategies.len())
        .filter(|&i| statuses[i] == DominanceStatus::Frontier)
        .collect();
    frontier.sort_by(|&a, &b| {
        strategies[a]
            .mean_effect()
            .total_cmp(&strategies[b].mean_effect())
    });

    // Effects are strictly increasing here, so every slope is finite
    let slope = |a: usize, b: usize| {
        let (sa, sb) = (&strategies[a], &strategies[b]);
        (sb.mean_cost() - sa.mean_cost()) / (sb.mean_effect() - sa.mean_effect())
    };
    while let Some(k) = (1..frontier.len().saturating_sub(1))
        .find(|&k| slope(frontier[k - 1], frontier[k]) > slope(frontier[k], frontier[k + 1]))
    {
        statuses[frontier[k]] = DominanceStatus::ExtendedDominated;
        frontier.remove(k);
    }

    (statuses, frontier)
}

fn mean_estimate(name: String, data: &[f64], options: &TableOptions) -> Result<Estimate, EconError> {
    let stat = SummaryStat::new(name, data)?;
    Ok(Estimate {
        mean: stat.mean(),
        interval: stat.interval(options.interval, options.alpha)?,
    })
}

fn resample_means(
    strategy: &Strategy,
    source: &mut RandomVariateSource,
) -> (f64, f64) {
    let n = strategy.len();
    let (mut cost, mut effect) = (0.0, 0.0);
    for _ in 0..n {
        let i = source.uniform_index(n);
        cost += strategy.costs()[i];
        effect += strategy.effects()[i];
    }
    (cost / n as f64, effect / n as f64)
}

/// Percentile bootstrap interval of the ICER of `x` against `y_ref`.
///
/// Paired resampling draws one index set for both arms; independent
/// resampling draws each arm on its own. Resamples with zero incremental
/// effect are skipped.
fn bootstrap_icer_interval(
    x: &Strategy,
    y_ref: &Strategy,
    pairing: Pairing,
    options: &TableOptions,
    seed: u64,
) -> Option<ConfidenceInterval> {
    let mut source = RandomVariateSource::from_seed(seed);
    let mut ratios = Vec::with_capacity(options.bootstrap_samples);

    for _ in 0..options.bootstrap_samples {
        let (dc, de) = match pairing {
            Pairing::Paired => {
                let n = x.len();
                let (mut dc, mut de) = (0.0, 0.0);
                for _ in 0..n {
                    let i = source.uniform_index(n);
                    dc += x.costs()[i] - y_ref.costs()[i];
                    de += x.effects()[i] - y_ref.effects()[i];
                }
                (dc / n as f64, de / n as f64)
            }
            Pairing::Independent => {
                let (cx, ex) = resample_means(x, &mut source);
                let (cy, ey) = resample_means(y_ref, &mut source);
                (cx - cy, ex - ey)
            }
        };
        if let Ok(ratio) = icer(dc, de) {
            ratios.push(ratio);
        }
    }

    (ratios.len() >= 2).then(|| percentile_interval(&ratios, options.alpha))
}
