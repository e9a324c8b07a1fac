//! Console reports
//!
//! Every writer takes an `io::Write` so the same text goes to stdout in the
//! binary and to a buffer in tests.

use std::io::Write;

use strokesim_core::econ::{CeTableRow, DominanceStatus, NmbCurve};
use strokesim_core::stats::{DifferenceStat, Pairing};
use strokesim_core::{CohortOutputs, HealthState};

use crate::util::format::{
    format_currency, format_currency_interval, format_estimate_interval, format_percentage,
};

/// Per-arm outcomes: survival, strokes and causes of death
pub fn write_outcomes<W: Write>(
    out: &mut W,
    outputs: &CohortOutputs,
    alpha: f64,
) -> color_eyre::Result<()> {
    let confidence = (1.0 - alpha) * 100.0;
    let survival = outputs.summary_survival_times()?;
    let strokes = outputs.summary_event_counts()?;
    let costs = outputs.summary_costs()?;
    let utilities = outputs.summary_utilities()?;

    writeln!(out, "{}", outputs.therapy())?;
    writeln!(
        out,
        "  Estimate of mean survival time and {confidence:.0}% CI: {}",
        format_estimate_interval(survival.mean(), &survival.t_confidence_interval(alpha)?, 2)
    )?;
    writeln!(
        out,
        "  Estimate of mean number of strokes and {confidence:.0}% CI: {}",
        format_estimate_interval(strokes.mean(), &strokes.t_confidence_interval(alpha)?, 2)
    )?;
    writeln!(
        out,
        "  Patients who developed a stroke: {}",
        format_percentage(outputs.proportion_developed_event())
    )?;
    writeln!(
        out,
        "  Estimate of discounted cost and {confidence:.0}% CI: {}",
        format_currency_interval(costs.mean(), &costs.t_confidence_interval(alpha)?)
    )?;
    writeln!(
        out,
        "  Estimate of discounted utility and {confidence:.0}% CI: {}",
        format_estimate_interval(utilities.mean(), &utilities.t_confidence_interval(alpha)?, 2)
    )?;

    let metrics = outputs.metrics();
    for state in HealthState::ALL.into_iter().filter(|s| s.is_absorbing()) {
        writeln!(
            out,
            "  Deaths ({state}): {}",
            metrics.deaths.get(&state).copied().unwrap_or(0)
        )?;
    }
    writeln!(out, "  Alive at horizon: {}", metrics.censored)?;
    Ok(())
}

/// Increase in survival time, cost and utility of `treated` over `reference`
pub fn write_comparative_outcomes<W: Write>(
    out: &mut W,
    treated: &CohortOutputs,
    reference: &CohortOutputs,
    pairing: Pairing,
    alpha: f64,
) -> color_eyre::Result<()> {
    let confidence = (1.0 - alpha) * 100.0;
    let survival = DifferenceStat::new(
        pairing,
        "Increase in survival time",
        treated.survival_times(),
        reference.survival_times(),
    )?;
    let cost = DifferenceStat::new(
        pairing,
        "Increase in discounted cost",
        treated.costs(),
        reference.costs(),
    )?;
    let utility = DifferenceStat::new(
        pairing,
        "Increase in discounted utility",
        treated.utilities(),
        reference.utilities(),
    )?;

    writeln!(
        out,
        "{} vs {} ({pairing:?} comparison)",
        treated.therapy(),
        reference.therapy()
    )?;
    writeln!(
        out,
        "  {} and {confidence:.0}% CI: {}",
        survival.name(),
        format_estimate_interval(survival.mean(), &survival.t_confidence_interval(alpha)?, 2)
    )?;
    writeln!(
        out,
        "  {} and {confidence:.0}% CI: {}",
        cost.name(),
        format_currency_interval(cost.mean(), &cost.t_confidence_interval(alpha)?)
    )?;
    writeln!(
        out,
        "  {} and {confidence:.0}% CI: {}",
        utility.name(),
        format_estimate_interval(utility.mean(), &utility.t_confidence_interval(alpha)?, 2)
    )?;
    Ok(())
}

fn status_label(status: DominanceStatus) -> &'static str {
    match status {
        DominanceStatus::Frontier => "frontier",
        DominanceStatus::Dominated => "dominated",
        DominanceStatus::ExtendedDominated => "extended dominance",
    }
}

/// Cost-effectiveness table in input order
pub fn write_cea_table<W: Write>(out: &mut W, rows: &[CeTableRow]) -> color_eyre::Result<()> {
    writeln!(out, "Cost-effectiveness analysis")?;
    for row in rows {
        writeln!(out, "  {} [{}]", row.name, status_label(row.status))?;
        writeln!(
            out,
            "    Expected cost: {}",
            format_currency_interval(row.cost.mean, &row.cost.interval)
        )?;
        writeln!(
            out,
            "    Expected utility: {}",
            format_estimate_interval(row.effect.mean, &row.effect.interval, 2)
        )?;

        let Some(inc) = &row.incremental else {
            continue;
        };
        writeln!(
            out,
            "    Incremental cost vs {}: {}",
            inc.versus,
            format_currency_interval(inc.cost.mean, &inc.cost.interval)
        )?;
        writeln!(
            out,
            "    Incremental utility vs {}: {}",
            inc.versus,
            format_estimate_interval(inc.effect.mean, &inc.effect.interval, 2)
        )?;
        let icer = match inc.icer_interval {
            Some(interval) => format_currency_interval(inc.icer, &interval),
            None => format_currency(inc.icer),
        };
        writeln!(out, "    ICER: {icer}")?;
    }
    Ok(())
}

/// Willingness-to-pay at which each strategy breaks even with the base
pub fn write_break_even<W: Write>(out: &mut W, curves: &[NmbCurve]) -> color_eyre::Result<()> {
    writeln!(out, "Cost-benefit analysis")?;
    for curve in curves {
        let threshold = curve
            .break_even_wtp()
            .map_or_else(|| "undefined (equal utility)".to_string(), format_currency);
        writeln!(
            out,
            "  {} vs {}: break-even willingness-to-pay {threshold}",
            curve.name, curve.versus
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strokesim_core::econ::{Estimate, IncrementalEstimate};
    use strokesim_core::stats::ConfidenceInterval;
    use strokesim_core::{Cohort, CohortId, ParametersBuilder, Therapy};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> color_eyre::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn simulate(therapy: Therapy) -> CohortOutputs {
        let params = ParametersBuilder::stroke_anticoagulation()
            .population_size(200)
            .build()
            .unwrap();
        Cohort::new(CohortId(1), therapy, &params)
            .unwrap()
            .simulate()
            .unwrap()
    }

    #[test]
    fn test_outcome_report_mentions_every_measure() {
        let outputs = simulate(Therapy::None);
        let text = render(|out| write_outcomes(out, &outputs, 0.05));

        assert!(text.starts_with("No Treatment\n"));
        assert!(text.contains("mean survival time and 95% CI"));
        assert!(text.contains("mean number of strokes"));
        assert!(text.contains("Deaths (Stroke Death)"));
        assert!(text.contains("Deaths (Natural Death)"));
    }

    #[test]
    fn test_comparative_report() {
        let untreated = simulate(Therapy::None);
        let treated = simulate(Therapy::Anticoagulation);
        let text = render(|out| {
            write_comparative_outcomes(out, &treated, &untreated, Pairing::Paired, 0.05)
        });

        assert!(text.starts_with("Anticoagulation vs No Treatment (Paired comparison)"));
        assert!(text.contains("Increase in discounted cost and 95% CI: $"));
    }

    #[test]
    fn test_cea_table_rows() {
        let estimate = |mean: f64| Estimate {
            mean,
            interval: ConfidenceInterval::new(mean - 1.0, mean + 1.0),
        };
        let rows = vec![
            CeTableRow {
                strategy: 0,
                name: "No Treatment".to_string(),
                status: DominanceStatus::Frontier,
                cost: estimate(1_000.0),
                effect: estimate(10.0),
                incremental: None,
            },
            CeTableRow {
                strategy: 1,
                name: "Anticoagulation".to_string(),
                status: DominanceStatus::Frontier,
                cost: estimate(6_000.0),
                effect: estimate(10.5),
                incremental: Some(IncrementalEstimate {
                    versus: "No Treatment".to_string(),
                    cost: estimate(5_000.0),
                    effect: estimate(0.5),
                    icer: 10_000.0,
                    icer_interval: None,
                }),
            },
        ];
        let text = render(|out| write_cea_table(out, &rows));

        assert!(text.contains("  No Treatment [frontier]\n"));
        assert!(text.contains("Expected cost: $1,000 ($999, $1,001)"));
        assert!(text.contains("Incremental cost vs No Treatment: $5,000 ($4,999, $5,001)"));
        assert!(text.contains("ICER: $10,000\n"));
    }

    #[test]
    fn test_break_even_report() {
        let curve = |delta_effect: f64| NmbCurve {
            strategy: 1,
            name: "Anticoagulation".to_string(),
            versus: "No Treatment".to_string(),
            delta_cost: 5_000.0,
            delta_effect,
            points: Vec::new(),
        };
        let text = render(|out| write_break_even(out, &[curve(0.25), curve(0.0)]));

        assert!(text.contains("break-even willingness-to-pay $20,000"));
        assert!(text.contains("undefined (equal utility)"));
    }
}
