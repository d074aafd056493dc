use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Composite Drought Indicator pipeline.
#[derive(Parser)]
#[command(
    name = "cdi",
    version,
    about = "Composite Drought Indicator grid analytics"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline described by a configuration file.
    Run(RunArgs),
    /// Convert monthly values into standardized anomalies.
    Anomaly(StepArgs),
    /// Compute SPI grids from monthly precipitation.
    Spi(SpiArgs),
    /// Convert values into per-month percentile ranks.
    Rank(StepArgs),
    /// Recompute the weighted composite from existing indicator outputs.
    Composite(RunArgs),
    /// Cut (and optionally upsample) a source grid to the configured region.
    Subgrid(SubgridArgs),
}

/// Arguments for the `run` and `composite` subcommands.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "cdi.toml")]
    pub config: PathBuf,

    /// Recompute outputs that already exist.
    #[arg(long)]
    pub force: bool,
}

/// Input, variable and output of a single-file step.
#[derive(clap::Args)]
pub struct StepArgs {
    /// Input NetCDF file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Data variable to read.
    #[arg(short = 'n', long)]
    pub variable: String,

    /// Output NetCDF file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Overwrite the output if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `spi` subcommand.
#[derive(clap::Args)]
pub struct SpiArgs {
    #[command(flatten)]
    pub step: StepArgs,

    /// Accumulation periods in months.
    #[arg(short, long, value_delimiter = ',', default_values_t = [1, 3, 9])]
    pub periods: Vec<usize>,
}

/// Arguments for the `subgrid` subcommand.
#[derive(clap::Args)]
pub struct SubgridArgs {
    #[command(flatten)]
    pub step: StepArgs,

    /// TOML configuration file providing the `[region]`.
    #[arg(short, long, default_value = "cdi.toml")]
    pub config: PathBuf,

    /// The input is on a grid twice as coarse as the region; upsample it.
    #[arg(long)]
    pub resample: bool,
}
