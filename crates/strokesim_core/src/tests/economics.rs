//! Economic evaluation of simulated cohorts

use crate::cohort::Cohort;
use crate::config::ParametersBuilder;
use crate::econ::{
    CostBenefitAnalysis, CostEffectivenessAnalysis, DominanceStatus, Strategy, TableOptions,
    wtp_grid,
};
use crate::error::{EconError, StatsError};
use crate::model::{CohortId, Therapy};
use crate::stats::{DifferenceStat, DifferenceStatPaired, Pairing};

fn simulate_both_arms(population: usize) -> Vec<Strategy> {
    let params = ParametersBuilder::stroke_anticoagulation()
        .population_size(population)
        .build()
        .unwrap();

    Therapy::ALL
        .iter()
        .map(|&therapy| {
            let outputs = Cohort::new(CohortId(1), therapy, &params)
                .unwrap()
                .simulate()
                .unwrap();
            Strategy::from_outputs(therapy.name(), &outputs).unwrap()
        })
        .collect()
}

#[test]
fn test_equal_effect_costlier_strategy_is_dominated() {
    let effects = vec![3.0, 4.5, 5.0, 2.5];
    let strategies = [
        Strategy::new("A", vec![1000.0, 1200.0, 900.0, 1100.0], effects.clone()).unwrap(),
        Strategy::new("B", vec![1500.0, 1300.0, 1400.0, 1600.0], effects).unwrap(),
    ];
    let cea = CostEffectivenessAnalysis::new(&strategies, Pairing::Independent).unwrap();

    assert_eq!(cea.status(1), Ok(DominanceStatus::Dominated));
    assert!(!cea.frontier_indices().contains(&1));
}

#[test]
fn test_paired_difference_rejects_unequal_lengths() {
    let err = DifferenceStatPaired::new("cost", &[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
    assert_eq!(err, StatsError::SizeMismatch { left: 3, right: 2 });
}

#[test]
fn test_frontier_is_monotone_and_undominated() {
    let points = [
        (500.0, 2.0),
        (100.0, 1.0),
        (900.0, 2.5),
        (300.0, 1.8),
        (2000.0, 4.0),
        (950.0, 2.4),
        (1200.0, 3.0),
        (150.0, 0.5),
    ];
    let strategies: Vec<Strategy> = points
        .iter()
        .enumerate()
        .map(|(i, &(c, e))| {
            Strategy::new(format!("S{i}"), vec![c, c + 10.0], vec![e, e + 0.1]).unwrap()
        })
        .collect();
    let cea = CostEffectivenessAnalysis::new(&strategies, Pairing::Paired).unwrap();
    let frontier = cea.frontier();

    for pair in frontier.windows(2) {
        assert!(pair[1].mean_effect > pair[0].mean_effect);
        assert!(pair[1].mean_cost > pair[0].mean_cost);
        assert!(pair[1].icer > 0.0);
    }
    for pair in frontier.windows(3) {
        assert!(pair[2].icer >= pair[1].icer, "ICERs must increase");
    }
    for point in &frontier {
        let p = &strategies[point.strategy];
        assert!(!strategies.iter().any(|o| {
            o.mean_cost() <= p.mean_cost()
                && o.mean_effect() >= p.mean_effect()
                && (o.mean_cost() < p.mean_cost() || o.mean_effect() > p.mean_effect())
        }));
    }
    // S7 costs more than S1 for less effect
    assert_eq!(cea.status(7), Ok(DominanceStatus::Dominated));
}

#[test]
fn test_simulated_arms_through_cea_and_cba() {
    let strategies = simulate_both_arms(500);
    assert_eq!(strategies[0].name(), "No Treatment");
    assert_eq!(strategies[1].name(), "Anticoagulation");

    // The drug cost dominates any savings from prevented strokes
    let cost = DifferenceStat::new(
        Pairing::Paired,
        "cost",
        strategies[1].costs(),
        strategies[0].costs(),
    )
    .unwrap();
    assert!(cost.mean() > 0.0);

    let cea = CostEffectivenessAnalysis::new(&strategies, Pairing::Paired).unwrap();
    let table = cea
        .table(&TableOptions {
            bootstrap_samples: 100,
            ..TableOptions::default()
        })
        .unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|row| row.cost.interval.contains(row.cost.mean)));

    let cba = CostBenefitAnalysis::new(&strategies, Pairing::Paired, wtp_grid(0.0, 100_000.0, 21))
        .unwrap();
    let curves = cba.curves(0.05).unwrap();
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].points.len(), 21);
    // At zero WTP the cheaper arm wins
    assert_eq!(cba.optimal_strategy(0.0), 0);
    assert!(curves[0].points[0].nmb < 0.0);
}

#[test]
fn test_independent_pairing_allows_unequal_arms() {
    let strategies = [
        Strategy::new("A", vec![10.0, 20.0, 30.0], vec![1.0, 2.0, 3.0]).unwrap(),
        Strategy::new("B", vec![40.0, 60.0], vec![3.0, 4.0]).unwrap(),
    ];
    assert!(matches!(
        CostBenefitAnalysis::new(&strategies, Pairing::Paired, vec![0.0]),
        Err(EconError::Stats(StatsError::SizeMismatch { .. }))
    ));
    let cba = CostBenefitAnalysis::new(&strategies, Pairing::Independent, vec![0.0, 50.0])
        .unwrap();
    let curve = cba.curve(1, 0.05).unwrap();
    // delta cost 30, delta effect 1.5
    assert!((curve.break_even_wtp().unwrap() - 20.0).abs() < 1e-9);
}
