use thiserror::Error;

use crate::core::types::AgentId;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid range: [{low}, {high}) requires low < high")]
    InvalidRange { low: f64, high: f64 },

    #[error("Not found: no interval contains {point}")]
    NotFound { point: f64 },

    #[error("Snapshot has no state for agent {0}")]
    MissingAgent(AgentId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
