//! Configuration Types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

/// Relay tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Capacity of the buffer carried from one read to the following write
    pub chunk_size: usize,
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,
    /// Fixed delay between connection attempts
    #[serde(with = "humantime_serde")]
    pub retry_interval: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
            retry_interval: Duration::from_secs(1),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
