//! Agent-specific transitions
//!
//! Each agent kind has one `AgentTransition` implementation. The driver looks
//! transitions up by `AgentId` through a `TransitionRegistry`.

pub mod gravity;
pub mod planet;
pub mod satellite;

use ahash::AHashMap;
use rand::{Rng, RngCore};

use crate::core::config::TimeStepConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{AgentId, AgentState, WorldSnapshot};

pub use planet::PlanetTransition;
pub use satellite::SatelliteTransition;

/// Computes an agent's next state from the merged world it can see.
///
/// Implementations must not touch the store. They may read other agents from
/// the snapshot, and must return a state whose `time` is strictly later than
/// the current one.
pub trait AgentTransition: Send + Sync {
    fn agent(&self) -> AgentId;

    /// Other agents whose state `step` reads from the snapshot
    fn dependencies(&self) -> Vec<AgentId> {
        Vec::new()
    }

    fn step(
        &self,
        snapshot: &WorldSnapshot,
        sampler: &TimeStepSampler,
        rng: &mut dyn RngCore,
    ) -> Result<AgentState>;
}

/// Fetch an agent's state, or the typed error transitions report
pub fn require(snapshot: &WorldSnapshot, id: AgentId) -> Result<&AgentState> {
    snapshot.get(&id).ok_or(SimError::MissingAgent(id))
}

/// Draws the next timestep uniformly from `[min, max)`
#[derive(Debug, Clone, Copy)]
pub struct TimeStepSampler {
    min: f64,
    max: f64,
}

impl TimeStepSampler {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min > 0.0) || !(max > min) || !max.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "timestep range [{}, {}) must be positive and non-empty",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        rng.gen_range(self.min..self.max)
    }
}

impl TryFrom<TimeStepConfig> for TimeStepSampler {
    type Error = SimError;

    fn try_from(config: TimeStepConfig) -> Result<Self> {
        Self::new(config.min, config.max)
    }
}

/// Lookup from agent id to its transition
#[derive(Default)]
pub struct TransitionRegistry {
    transitions: AHashMap<AgentId, Box<dyn AgentTransition>>,
}

impl TransitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a transition for every built-in agent kind
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PlanetTransition));
        registry.register(Box::new(SatelliteTransition::new(AgentId::Planet)));
        registry
    }

    /// Add or replace the transition for `transition.agent()`
    pub fn register(&mut self, transition: Box<dyn AgentTransition>) {
        self.transitions.insert(transition.agent(), transition);
    }

    pub fn get(&self, id: AgentId) -> Option<&dyn AgentTransition> {
        self.transitions.get(&id).map(|t| t.as_ref())
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.transitions.contains_key(&id)
    }
}
