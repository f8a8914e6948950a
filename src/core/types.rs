//! Core type definitions used throughout the codebase

use std::collections::BTreeMap;
use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Identifier for each simulated agent
///
/// The set is closed and fixed for a run. Ordering follows declaration order
/// so snapshots serialize deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentId {
    Planet,
    Satellite,
}

impl AgentId {
    pub const ALL: [AgentId; 2] = [AgentId::Planet, AgentId::Satellite];

    pub fn name(&self) -> &'static str {
        match self {
            AgentId::Planet => "Planet",
            AgentId::Satellite => "Satellite",
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One agent's state at a point in its own clock
///
/// Immutable once produced by a transition; the next state for the same
/// agent lives in a later interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub time: f64,
    #[serde(rename = "timeStep")]
    pub time_step: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl AgentState {
    pub fn new(time: f64, time_step: f64, position: DVec2, velocity: DVec2) -> Self {
        Self {
            time,
            time_step,
            x: position.x,
            y: position.y,
            vx: velocity.x,
            vy: velocity.y,
        }
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> DVec2 {
        DVec2::new(self.vx, self.vy)
    }

    pub fn is_finite(&self) -> bool {
        [self.time, self.time_step, self.x, self.y, self.vx, self.vy]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Merged view of all agents at a query time. Also the value type of every
/// stored interval, where it holds a partial view (usually one agent).
pub type WorldSnapshot = BTreeMap<AgentId, AgentState>;
