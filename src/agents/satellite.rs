//! Satellite: falls toward its primary

use rand::RngCore;

use crate::agents::gravity::gravitational_kick;
use crate::agents::{require, AgentTransition, TimeStepSampler};
use crate::core::error::Result;
use crate::core::types::{AgentId, AgentState, WorldSnapshot};

/// Semi-implicit Euler step under the pull of `primary`
#[derive(Debug, Clone, Copy)]
pub struct SatelliteTransition {
    primary: AgentId,
}

impl SatelliteTransition {
    pub fn new(primary: AgentId) -> Self {
        Self { primary }
    }

    pub fn primary(&self) -> AgentId {
        self.primary
    }
}

impl AgentTransition for SatelliteTransition {
    fn agent(&self) -> AgentId {
        AgentId::Satellite
    }

    fn dependencies(&self) -> Vec<AgentId> {
        vec![self.primary()]
    }

    fn step(
        &self,
        snapshot: &WorldSnapshot,
        sampler: &TimeStepSampler,
        rng: &mut dyn RngCore,
    ) -> Result<AgentState> {
        let state = require(snapshot, AgentId::Satellite)?;
        let primary = require(snapshot, self.primary)?;
        let dt = state.time_step;

        let velocity =
            gravitational_kick(primary.position(), state.position(), state.velocity(), dt);
        let position = state.position() + velocity * dt;

        Ok(AgentState::new(state.time + dt, sampler.sample(rng), position, velocity))
    }
}
