//! Orbit Ledger - asynchronous agents over an append-only interval store

pub mod agents;
pub mod core;
pub mod playback;
pub mod simulation;
pub mod store;
