use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use strokesim::{RunOptions, init_logging, load_parameters, run};
use strokesim_core::stats::Pairing;

/// How incremental outcomes of two arms are compared
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PairingArg {
    /// Match patients by index across arms (shared random streams)
    Paired,
    /// Treat the arms as unrelated samples
    Independent,
}

impl From<PairingArg> for Pairing {
    fn from(arg: PairingArg) -> Self {
        match arg {
            PairingArg::Paired => Pairing::Paired,
            PairingArg::Independent => Pairing::Independent,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "strokesim")]
#[command(about = "Markov cohort simulation of stroke and anticoagulation therapy")]
struct Args {
    /// YAML parameter file (default: built-in stroke/anticoagulation model)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Path to the data directory holding the log (default: ~/.strokesim/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Directory to export plot series to as JSON
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Comparison used for incremental estimates
    #[arg(long, value_enum, default_value = "paired")]
    pairing: PairingArg,

    /// Lowest willingness-to-pay in the cost-benefit sweep
    #[arg(long, default_value_t = 0.0)]
    min_wtp: f64,

    /// Highest willingness-to-pay in the cost-benefit sweep
    #[arg(long, default_value_t = 100_000.0)]
    max_wtp: f64,

    /// Number of willingness-to-pay values in the sweep
    #[arg(long, default_value_t = 21)]
    wtp_points: usize,

    /// Bootstrap resamples for the ICER interval (0 disables it)
    #[arg(long, default_value_t = 1000)]
    bootstrap_samples: usize,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".strokesim")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let params = load_parameters(args.params.as_deref())?;
    let options = RunOptions {
        pairing: args.pairing.into(),
        min_wtp: args.min_wtp,
        max_wtp: args.max_wtp,
        wtp_points: args.wtp_points,
        bootstrap_samples: args.bootstrap_samples,
        export_dir: args.export_dir,
        ..RunOptions::default()
    };

    let stdout = std::io::stdout();
    run(&params, &options, &mut stdout.lock())?;

    tracing::info!("Run complete");
    Ok(())
}
