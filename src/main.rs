/*!
 * Partition Allocation Simulator - Main Entry Point
 *
 * Loads a workload and compares placement strategies:
 * - First Fit
 * - Best Fit
 * - Worst Fit
 *
 * Usage: partition-sim [INPUT] [--config FILE] [--json]
 */

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;

use partition_sim::core::limits::DEFAULT_INPUT_FILE;
use partition_sim::report::{render_json, render_text};
use partition_sim::{compare_strategies, init_tracing, load_workload, SimulationConfig, SimulationError};

/// Partition allocation simulator command-line arguments
#[derive(Parser, Debug)]
#[command(name = "partition-sim")]
#[command(about = "Compare first, best, and worst fit partition allocation")]
struct Args {
    /// Workload file: memory size line, then `<id> <size> [arrival] [duration]` lines
    #[arg(default_value = DEFAULT_INPUT_FILE)]
    input: PathBuf,

    /// JSON simulation config (falls back to PARTITION_SIM_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing();
    info!("Partition allocation simulator starting...");

    let config = SimulationConfig::resolve(args.config.as_deref()).map_err(SimulationError::from)?;
    let workload =
        load_workload(&args.input, config.max_processes).map_err(SimulationError::from)?;
    let runs = compare_strategies(&workload, &config).map_err(SimulationError::from)?;

    let source = args.input.display().to_string();
    if args.json {
        println!("{}", render_json(&source, &workload, &runs).into_diagnostic()?);
    } else {
        println!("{}", render_text(&source, &workload, &runs));
    }

    info!("Compared {} strategies", runs.len());
    Ok(())
}
