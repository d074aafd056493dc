mod cli;
mod composite_cmd;
mod config;
mod convert;
mod logging;
mod pipeline;
mod run_cmd;
mod step_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run_cmd::run(args),
        Command::Anomaly(args) => step_cmd::anomaly(args),
        Command::Spi(args) => step_cmd::spi(args),
        Command::Rank(args) => step_cmd::rank(args),
        Command::Composite(args) => composite_cmd::run(args),
        Command::Subgrid(args) => step_cmd::subgrid(args),
    }
}

