//! End-to-end run: simulate every therapy arm, compare, report, export

use std::io::Write;
use std::path::PathBuf;

use color_eyre::eyre::bail;
use strokesim_core::econ::{
    CeTableRow, CostBenefitAnalysis, CostEffectivenessAnalysis, NmbCurve, Strategy, TableOptions,
    wtp_grid,
};
use strokesim_core::stats::{IntervalKind, Pairing};
use strokesim_core::{Cohort, CohortId, CohortOutputs, ModelParameters};

use crate::export::JsonPlotSink;
use crate::report;

/// Every arm is simulated with the same cohort id so that patient `i` draws
/// from the same random stream in each arm.
const COHORT_ID: CohortId = CohortId(1);

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub pairing: Pairing,
    pub min_wtp: f64,
    pub max_wtp: f64,
    pub wtp_points: usize,
    pub bootstrap_samples: usize,
    pub histogram_bin_width: f64,
    pub export_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            pairing: Pairing::Paired,
            min_wtp: 0.0,
            max_wtp: 100_000.0,
            wtp_points: 21,
            bootstrap_samples: 1000,
            histogram_bin_width: 1.0,
            export_dir: None,
        }
    }
}

/// Results of a run, in therapy order
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outputs: Vec<CohortOutputs>,
    pub cea_table: Vec<CeTableRow>,
    pub nmb_curves: Vec<NmbCurve>,
    pub exported: Vec<PathBuf>,
}

pub fn run<W: Write>(
    params: &ModelParameters,
    options: &RunOptions,
    out: &mut W,
) -> color_eyre::Result<RunReport> {
    let outputs = params
        .therapies
        .keys()
        .map(|&therapy| Cohort::new(COHORT_ID, therapy, params)?.simulate())
        .collect::<Result<Vec<_>, _>>()?;

    let Some((reference, treated_arms)) = outputs.split_first() else {
        bail!("no therapies configured");
    };

    for arm in &outputs {
        report::write_outcomes(out, arm, params.alpha)?;
        writeln!(out)?;
    }
    for treated in treated_arms {
        report::write_comparative_outcomes(out, treated, reference, options.pairing, params.alpha)?;
        writeln!(out)?;
    }

    let strategies = outputs
        .iter()
        .map(|arm| Strategy::from_outputs(arm.therapy().name(), arm))
        .collect::<Result<Vec<_>, _>>()?;

    let cea = CostEffectivenessAnalysis::new(&strategies, options.pairing)?;
    let cea_table = cea.table(&TableOptions {
        interval: IntervalKind::Confidence,
        alpha: params.alpha,
        bootstrap_samples: options.bootstrap_samples,
        seed: u64::from(COHORT_ID.0),
    })?;
    report::write_cea_table(out, &cea_table)?;
    writeln!(out)?;

    let cba = CostBenefitAnalysis::new(
        &strategies,
        options.pairing,
        wtp_grid(options.min_wtp, options.max_wtp, options.wtp_points),
    )?;
    let nmb_curves = cba.curves(params.alpha)?;
    report::write_break_even(out, &nmb_curves)?;

    let mut exported = Vec::new();
    if let Some(dir) = &options.export_dir {
        let mut sink = JsonPlotSink::new(dir)?;
        for arm in &outputs {
            arm.send_plots(&mut sink, options.histogram_bin_width)?;
        }
        cea.send_plane(&mut sink)?;
        cba.send_curves(&nmb_curves, &mut sink)?;

        tracing::info!(
            dir = %sink.dir().display(),
            files = sink.written().len(),
            "Exported plot series"
        );
        exported = sink.written().to_vec();
    }

    Ok(RunReport {
        outputs,
        cea_table,
        nmb_curves,
        exported,
    })
}
