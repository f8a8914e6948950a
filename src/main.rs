//! Orbit Ledger - Entry Point
//!
//! Runs the planet/satellite simulation and writes the interval store as a
//! JSON artifact.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use orbit_ledger::core::config::SimulationConfig;
use orbit_ledger::core::error::Result;
use orbit_ledger::simulation::simulate;
use tracing_subscriber::EnvFilter;

/// Asynchronous planet/satellite simulation
#[derive(Parser, Debug)]
#[command(name = "orbit-ledger")]
#[command(about = "Run the simulation and write every recorded interval to JSON")]
struct Args {
    /// TOML config file; defaults are used when omitted
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Number of rounds
    #[arg(long)]
    rounds: Option<u32>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output path for the artifact
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("orbit_ledger=info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    config.validate()?;

    let output = simulate(&config)?;
    output.write(&config.output)?;

    println!("{}", output.summary());
    Ok(())
}
