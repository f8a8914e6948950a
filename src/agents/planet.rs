//! Planet: drifts at constant velocity

use rand::RngCore;

use crate::agents::{require, AgentTransition, TimeStepSampler};
use crate::core::error::Result;
use crate::core::types::{AgentId, AgentState, WorldSnapshot};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanetTransition;

impl AgentTransition for PlanetTransition {
    fn agent(&self) -> AgentId {
        AgentId::Planet
    }

    fn step(
        &self,
        snapshot: &WorldSnapshot,
        sampler: &TimeStepSampler,
        rng: &mut dyn RngCore,
    ) -> Result<AgentState> {
        let state = require(snapshot, AgentId::Planet)?;
        let dt = state.time_step;
        let velocity = state.velocity();
        let position = state.position() + velocity * dt;

        Ok(AgentState::new(state.time + dt, sampler.sample(rng), position, velocity))
    }
}
