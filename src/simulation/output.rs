//! Simulation output and serialization

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::WorldSnapshot;
use crate::simulation::driver::RunStats;
use crate::store::IntervalStore;

/// Complete simulation output
#[derive(Clone, Debug)]
pub struct SimulationOutput {
    pub store: IntervalStore<WorldSnapshot>,
    pub statistics: SimulationStats,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub seed: u64,
    pub rounds_requested: u32,
    pub rounds_completed: u32,
    pub bootstrap_intervals: usize,
    pub intervals_appended: u64,
    pub agents_skipped: u64,
    pub deadline_hit: bool,
    pub simulation_time_ms: u64,
}

impl SimulationOutput {
    pub fn new(
        store: IntervalStore<WorldSnapshot>,
        bootstrap_intervals: usize,
        seed: u64,
        rounds_requested: u32,
        stats: RunStats,
        elapsed: Duration,
    ) -> Self {
        Self {
            store,
            statistics: SimulationStats {
                seed,
                rounds_requested,
                rounds_completed: stats.rounds_completed,
                bootstrap_intervals,
                intervals_appended: stats.intervals_appended,
                agents_skipped: stats.agents_skipped,
                deadline_hit: stats.deadline_hit,
                simulation_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            },
        }
    }

    /// The artifact: every record as `[low, high, {agent: state}]`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.store)?)
    }

    /// Write the artifact, creating parent directories as needed
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Wrote {} intervals to {}", self.store.len(), path.display());
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "Simulated {} of {} rounds in {}ms (seed {})\n\
             {} intervals ({} bootstrap, {} appended), {} skipped agent-rounds",
            self.statistics.rounds_completed,
            self.statistics.rounds_requested,
            self.statistics.simulation_time_ms,
            self.statistics.seed,
            self.store.len(),
            self.statistics.bootstrap_intervals,
            self.statistics.intervals_appended,
            self.statistics.agents_skipped,
        )
    }
}
