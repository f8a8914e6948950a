//! Run configuration with documented constants
//!
//! Defaults reproduce the reference two-body run: 500 rounds, a 0.001
//! lookback, and timesteps drawn from [0.01, 0.1).

use std::path::{Path, PathBuf};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{AgentId, AgentState};

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of rounds; every agent gets one attempt per round
    pub rounds: u32,

    /// How far before its own cursor an agent reads the world (ε)
    ///
    /// Must be smaller than the shortest possible timestep, otherwise an
    /// agent can miss its own most recent interval.
    pub lookback: f64,

    /// Lower bound of the bootstrap intervals. Effectively -infinity.
    pub bootstrap_low: f64,

    /// Where the finished store is written
    pub output: PathBuf,

    /// RNG seed. `None` draws one from entropy at startup.
    pub seed: Option<u64>,

    /// Optional wall-clock budget in milliseconds, checked between rounds
    pub deadline_ms: Option<u64>,

    pub time_step: TimeStepConfig,

    /// Initial agent states, in the order agents are advanced each round
    pub agents: Vec<AgentSeed>,
}

/// Range for stochastically chosen timesteps, `[min, max)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeStepConfig {
    pub min: f64,
    pub max: f64,
}

impl Default for TimeStepConfig {
    fn default() -> Self {
        Self { min: 0.01, max: 0.1 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgentSeed {
    pub id: AgentId,
    #[serde(flatten)]
    pub state: AgentState,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 500,
            lookback: 0.001,
            bootstrap_low: -999_999_999.0,
            output: PathBuf::from("data.json"),
            seed: None,
            deadline_ms: None,
            time_step: TimeStepConfig::default(),
            agents: vec![
                AgentSeed {
                    id: AgentId::Planet,
                    state: AgentState::new(0.0, 0.01, DVec2::new(0.0, 0.1), DVec2::new(0.1, 0.0)),
                },
                AgentSeed {
                    id: AgentId::Satellite,
                    state: AgentState::new(0.0, 0.01, DVec2::new(0.0, 1.0), DVec2::new(1.0, 0.0)),
                },
            ],
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// The configured seed, or a fresh one from entropy
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.agents.is_empty() {
            return Err(invalid("at least one agent is required".into()));
        }

        for (i, seed) in self.agents.iter().enumerate() {
            if self.agents[..i].iter().any(|other| other.id == seed.id) {
                return Err(invalid(format!("agent {} is configured twice", seed.id)));
            }
            if !seed.state.is_finite() {
                return Err(invalid(format!("agent {} has a non-finite field", seed.id)));
            }
            if seed.state.time_step <= 0.0 {
                return Err(invalid(format!(
                    "agent {} timeStep ({}) must be positive",
                    seed.id, seed.state.time_step
                )));
            }
            // The first real interval is [time, time + timeStep); its read
            // point at the next step must fall inside it.
            if !(seed.state.time_step > self.lookback) {
                return Err(invalid(format!(
                    "agent {} timeStep ({}) must exceed lookback ({})",
                    seed.id, seed.state.time_step, self.lookback
                )));
            }
            if !(self.bootstrap_low < seed.state.time) {
                return Err(invalid(format!(
                    "bootstrap_low ({}) must be below agent {} start time ({})",
                    self.bootstrap_low, seed.id, seed.state.time
                )));
            }
        }

        if !(self.lookback > 0.0) || !self.lookback.is_finite() {
            return Err(invalid(format!("lookback ({}) must be positive", self.lookback)));
        }

        // An agent reads at t - lookback; its own newest interval is at least
        // one timestep wide, so the lookback has to stay inside it.
        if !(self.time_step.min > self.lookback) {
            return Err(invalid(format!(
                "time_step.min ({}) must exceed lookback ({})",
                self.time_step.min, self.lookback
            )));
        }

        if !(self.time_step.max > self.time_step.min) || !self.time_step.max.is_finite() {
            return Err(invalid(format!(
                "time_step.max ({}) must exceed time_step.min ({})",
                self.time_step.max, self.time_step.min
            )));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> SimError {
    SimError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rounds, 500);
        let ids: Vec<_> = config.agents.iter().map(|seed| seed.id).collect();
        assert_eq!(ids, vec![AgentId::Planet, AgentId::Satellite]);
    }

    #[test]
    fn test_parse_full_document() {
        let doc = r#"
            rounds = 20
            lookback = 0.001
            seed = 7
            output = "out/run.json"

            [time_step]
            min = 0.02
            max = 0.05

            [[agents]]
            id = "Planet"
            time = 0.0
            timeStep = 0.01
            x = 0.0
            y = 0.1
            vx = 0.1
            vy = 0.0

            [[agents]]
            id = "Satellite"
            time = 0.0
            timeStep = 0.01
            x = 0.0
            y = 1.0
            vx = 1.0
            vy = 0.0
        "#;
        let config = SimulationConfig::from_toml_str(doc).unwrap();
        assert_eq!(config.rounds, 20);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.output, PathBuf::from("out/run.json"));
        assert_eq!(config.time_step.min, 0.02);
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[1].id, AgentId::Satellite);
        assert_eq!(config.agents[1].state.vx, 1.0);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = SimulationConfig::from_toml_str("rounds = 3").unwrap();
        assert_eq!(config.rounds, 3);
        assert_eq!(config.lookback, 0.001);
        assert_eq!(config.agents.len(), 2);
    }

    #[test]
    fn test_rejects_lookback_wider_than_step() {
        let mut config = SimulationConfig::default();
        config.lookback = 0.05;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_initial_step_within_lookback() {
        let mut config = SimulationConfig::default();
        config.agents[0].state.time_step = 0.0005;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, SimError::InvalidConfig(ref msg) if msg.contains("lookback")),
            "{}",
            err
        );

        config.agents[0].state.time_step = config.lookback;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_step_range() {
        let mut config = SimulationConfig::default();
        config.time_step = TimeStepConfig { min: 0.1, max: 0.01 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_agent() {
        let mut config = SimulationConfig::default();
        let dup = config.agents[0];
        config.agents.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bootstrap_above_start() {
        let mut config = SimulationConfig::default();
        config.bootstrap_low = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_no_agents() {
        let mut config = SimulationConfig::default();
        config.agents.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seed_resolution_prefers_configured() {
        let mut config = SimulationConfig::default();
        config.seed = Some(42);
        assert_eq!(config.resolve_seed(), 42);
    }
}
