//! Round-based driver advancing each agent on its own clock

use std::time::{Duration, Instant};

use rand_chacha::ChaCha8Rng;

use crate::agents::{TimeStepSampler, TransitionRegistry};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{AgentId, WorldSnapshot};
use crate::store::{CausalReader, IntervalStore};

/// What happened to each agent during one round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundReport {
    pub advanced: Vec<AgentId>,
    pub skipped: Vec<AgentId>,
}

/// Totals across a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub rounds_completed: u32,
    pub intervals_appended: u64,
    pub agents_skipped: u64,
    pub deadline_hit: bool,
}

/// Owns the store and one time cursor per agent.
///
/// Every round visits agents in a fixed order. An agent reads the world just
/// before its cursor, advances only if every agent is visible there, and
/// appends its new state as `[cursor, new_time)`. Append order therefore
/// equals execution order, which is what the right-biased merge relies on.
pub struct Driver {
    store: IntervalStore<WorldSnapshot>,
    cursors: Vec<(AgentId, f64)>,
    registry: TransitionRegistry,
    sampler: TimeStepSampler,
    lookback: f64,
    rng: ChaCha8Rng,
    bootstrap_len: usize,
}

impl Driver {
    /// Seed one bootstrap interval per configured agent
    pub fn bootstrap(
        config: &SimulationConfig,
        registry: TransitionRegistry,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        config.validate()?;

        let mut store = IntervalStore::new();
        for seed in &config.agents {
            store.append(
                config.bootstrap_low,
                seed.state.time,
                WorldSnapshot::from([(seed.id, seed.state)]),
            )?;
        }
        let cursors = config.agents.iter().map(|seed| (seed.id, seed.state.time)).collect();
        let sampler = TimeStepSampler::try_from(config.time_step)?;

        Self::from_parts(store, cursors, registry, sampler, config.lookback, rng)
    }

    /// Resume from an existing store. Cursors list the known agents in
    /// iteration order together with their current times.
    pub fn from_parts(
        store: IntervalStore<WorldSnapshot>,
        cursors: Vec<(AgentId, f64)>,
        registry: TransitionRegistry,
        sampler: TimeStepSampler,
        lookback: f64,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        for (id, _) in &cursors {
            let transition = registry.get(*id).ok_or_else(|| {
                SimError::InvalidConfig(format!("no transition registered for agent {}", id))
            })?;
            // The readiness gate only waits for configured agents, so every
            // dependency has to be one of them.
            if let Some(dep) = transition
                .dependencies()
                .into_iter()
                .find(|dep| !cursors.iter().any(|(agent, _)| agent == dep))
            {
                return Err(SimError::InvalidConfig(format!(
                    "agent {} depends on {}, which is not configured",
                    id, dep
                )));
            }
        }
        let bootstrap_len = store.len();

        Ok(Self {
            store,
            cursors,
            registry,
            sampler,
            lookback,
            rng,
            bootstrap_len,
        })
    }

    pub fn store(&self) -> &IntervalStore<WorldSnapshot> {
        &self.store
    }

    pub fn into_store(self) -> IntervalStore<WorldSnapshot> {
        self.store
    }

    /// Number of records present before the first round
    pub fn bootstrap_len(&self) -> usize {
        self.bootstrap_len
    }

    pub fn cursor(&self, id: AgentId) -> Option<f64> {
        self.cursors.iter().find(|(agent, _)| *agent == id).map(|(_, t)| *t)
    }

    /// Give every agent one attempt to advance
    pub fn run_round(&mut self) -> Result<RoundReport> {
        let mut report = RoundReport::default();
        for index in 0..self.cursors.len() {
            let id = self.cursors[index].0;
            if self.advance(index)? {
                report.advanced.push(id);
            } else {
                report.skipped.push(id);
            }
        }
        Ok(report)
    }

    /// Run up to `rounds` rounds, stopping early once `deadline` has elapsed
    pub fn run(&mut self, rounds: u32, deadline: Option<Duration>) -> Result<RunStats> {
        let start = Instant::now();
        let mut stats = RunStats::default();

        for round in 0..rounds {
            if let Some(limit) = deadline {
                if start.elapsed() >= limit {
                    tracing::warn!(
                        "Deadline of {}ms reached after {} of {} rounds",
                        limit.as_millis(),
                        round,
                        rounds
                    );
                    stats.deadline_hit = true;
                    break;
                }
            }

            let report = self.run_round()?;
            stats.rounds_completed += 1;
            stats.intervals_appended += report.advanced.len() as u64;
            stats.agents_skipped += report.skipped.len() as u64;
        }

        Ok(stats)
    }

    /// One agent, one round. Returns whether the agent advanced.
    fn advance(&mut self, index: usize) -> Result<bool> {
        let (id, t) = self.cursors[index];
        let snapshot = CausalReader::new(&self.store).read(t - self.lookback);

        let missing = self
            .cursors
            .iter()
            .find(|(agent, _)| !snapshot.contains_key(agent));
        if let Some((missing, _)) = missing {
            tracing::debug!("{} waiting at t={}: {} not visible yet", id, t, missing);
            return Ok(false);
        }

        let transition = self.registry.get(id).ok_or_else(|| {
            SimError::InvalidConfig(format!("no transition registered for agent {}", id))
        })?;
        let next = transition.step(&snapshot, &self.sampler, &mut self.rng)?;

        self.store.append(t, next.time, WorldSnapshot::from([(id, next)]))?;
        self.cursors[index].1 = next.time;
        tracing::debug!("{} advanced [{}, {})", id, t, next.time);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AgentState;
    use glam::DVec2;
    use rand::SeedableRng;

    fn driver(seed: u64) -> Driver {
        Driver::bootstrap(
            &SimulationConfig::default(),
            TransitionRegistry::with_defaults(),
            ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_bootstrap_seeds_each_agent() {
        let driver = driver(1);
        assert_eq!(driver.bootstrap_len(), 2);
        assert_eq!(driver.store().len(), 2);
        assert_eq!(driver.cursor(AgentId::Planet), Some(0.0));
        assert_eq!(driver.cursor(AgentId::Satellite), Some(0.0));
    }

    #[test]
    fn test_first_round_advances_both() {
        let mut driver = driver(1);
        let report = driver.run_round().unwrap();
        assert_eq!(report.advanced, vec![AgentId::Planet, AgentId::Satellite]);
        assert!(report.skipped.is_empty());
        assert_eq!(driver.store().len(), 4);
        // Both start at t=0 with timeStep 0.01
        assert!((driver.cursor(AgentId::Planet).unwrap() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_readiness_gate_blocks_until_all_present() {
        let planet = AgentState::new(0.0, 0.01, DVec2::ZERO, DVec2::X);
        let mut store = IntervalStore::new();
        store.append(-1.0, 0.0, WorldSnapshot::from([(AgentId::Planet, planet)])).unwrap();

        let mut driver = Driver::from_parts(
            store,
            vec![(AgentId::Planet, 0.0), (AgentId::Satellite, 0.0)],
            TransitionRegistry::with_defaults(),
            TimeStepSampler::new(0.01, 0.1).unwrap(),
            0.001,
            ChaCha8Rng::seed_from_u64(0),
        )
        .unwrap();

        for _ in 0..3 {
            let report = driver.run_round().unwrap();
            assert!(report.advanced.is_empty());
            assert_eq!(report.skipped.len(), 2);
        }
        assert_eq!(driver.store().len(), 1);
        assert_eq!(driver.cursor(AgentId::Planet), Some(0.0));
    }

    #[test]
    fn test_unregistered_agent_is_rejected() {
        let result = Driver::from_parts(
            IntervalStore::new(),
            vec![(AgentId::Satellite, 0.0)],
            TransitionRegistry::new(),
            TimeStepSampler::new(0.01, 0.1).unwrap(),
            0.001,
            ChaCha8Rng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_unconfigured_dependency_is_rejected() {
        let mut config = SimulationConfig::default();
        config.agents.retain(|seed| seed.id == AgentId::Satellite);
        assert!(config.validate().is_ok());

        let result = Driver::bootstrap(
            &config,
            TransitionRegistry::with_defaults(),
            ChaCha8Rng::seed_from_u64(0),
        );
        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("depends on Planet"), "{}", err);
    }

    #[test]
    fn test_planet_runs_alone() {
        let mut config = SimulationConfig::default();
        config.agents.retain(|seed| seed.id == AgentId::Planet);

        let mut driver = Driver::bootstrap(
            &config,
            TransitionRegistry::with_defaults(),
            ChaCha8Rng::seed_from_u64(0),
        )
        .unwrap();
        let stats = driver.run(10, None).unwrap();
        assert_eq!(stats.intervals_appended, 10);
        assert_eq!(driver.store().len(), 11);
    }

    #[test]
    fn test_zero_deadline_runs_nothing() {
        let mut driver = driver(2);
        let stats = driver.run(10, Some(Duration::ZERO)).unwrap();
        assert!(stats.deadline_hit);
        assert_eq!(stats.rounds_completed, 0);
        assert_eq!(driver.store().len(), 2);
    }

    #[test]
    fn test_same_seed_same_history() {
        let mut a = driver(77);
        let mut b = driver(77);
        a.run(25, None).unwrap();
        b.run(25, None).unwrap();
        assert_eq!(a.store(), b.store());
    }
}
