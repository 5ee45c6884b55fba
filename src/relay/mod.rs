//! Data Relay Module
//!
//! Moves bytes from the source connection to the destination connection,
//! reconnecting either side independently when it fails.

pub mod chunk;
pub mod engine;
pub mod stats;

pub use chunk::Chunk;
pub use engine::Relay;
pub use stats::RelayStats;
