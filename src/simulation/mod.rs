//! Main simulation loop

pub mod driver;
pub mod output;

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agents::TransitionRegistry;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;

pub use driver::{Driver, RoundReport, RunStats};
pub use output::{SimulationOutput, SimulationStats};

/// Run a full simulation with the built-in transitions
pub fn simulate(config: &SimulationConfig) -> Result<SimulationOutput> {
    simulate_with(config, TransitionRegistry::with_defaults())
}

/// Run a full simulation with caller-supplied transitions
pub fn simulate_with(
    config: &SimulationConfig,
    registry: TransitionRegistry,
) -> Result<SimulationOutput> {
    let start = Instant::now();

    let seed = config.resolve_seed();
    tracing::info!(
        "Starting simulation: {} agents, {} rounds, seed {}",
        config.agents.len(),
        config.rounds,
        seed
    );

    let rng = ChaCha8Rng::seed_from_u64(seed);
    let mut driver = Driver::bootstrap(config, registry, rng)?;
    let stats = driver.run(config.rounds, config.deadline_ms.map(Duration::from_millis))?;

    let bootstrap_len = driver.bootstrap_len();
    let elapsed = start.elapsed();
    tracing::info!(
        "Simulation finished: {} rounds, {} intervals appended",
        stats.rounds_completed,
        stats.intervals_appended
    );

    Ok(SimulationOutput::new(
        driver.into_store(),
        bootstrap_len,
        seed,
        config.rounds,
        stats,
        elapsed,
    ))
}
