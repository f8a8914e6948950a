pub mod config;
pub mod error;
pub mod types;

pub use config::{AgentSeed, SimulationConfig, TimeStepConfig};
pub use error::{Result, SimError};
pub use types::{AgentId, AgentState, WorldSnapshot};
