//! Run a diffusion simulation described by a settings file.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use diff2d::engine::{run_local, RunError, SimConfig};
use diff2d::logging;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Settings file describing the run
    settings: PathBuf,
    /// Number of ranks to split the grid over
    #[arg(short = 'n', long, default_value_t = NonZeroUsize::MIN)]
    ranks: NonZeroUsize,
    /// Update each slab with the rayon stencil
    #[arg(long)]
    parallel: bool,
    /// Write snapshots here instead of the settings' OUTFILE
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `diff2d_engine=trace`
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.log_level.as_deref());

    let mut config = match SimConfig::from_path(&args.settings) {
        Ok(config) => config.with_parallel(args.parallel),
        Err(e) => {
            error!("{}: {e}", args.settings.display());
            return ExitCode::FAILURE;
        }
    };
    if let Some(output) = args.output {
        config = config.with_output(output);
    }

    match run_local(&config, args.ranks.get()) {
        Ok(reports) => {
            let bytes: u64 = reports.iter().map(|r| r.metrics.bytes_written).sum();
            let slowest = reports.iter().map(|r| r.metrics.total_us).max().unwrap_or(0);
            info!(
                bytes,
                wall_ms = slowest / 1000,
                output = %config.output.display(),
                "run complete"
            );
            ExitCode::SUCCESS
        }
        // Group-size and rank failures were already logged where they happened.
        Err(RunError::Config(_) | RunError::Rank { .. }) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
