//! Configuration Manager

use super::Config;
use crate::Result;
use anyhow::{bail, Context};
use std::path::Path;

/// Largest chunk a single read may carry
const MAX_CHUNK_SIZE: usize = 1024 * 1024;

const ENV_CHUNK_SIZE: &str = "REMOTE_DUMP1090_CHUNK_SIZE";
const ENV_READ_TIMEOUT: &str = "REMOTE_DUMP1090_READ_TIMEOUT";
const ENV_WRITE_TIMEOUT: &str = "REMOTE_DUMP1090_WRITE_TIMEOUT";
const ENV_RETRY_INTERVAL: &str = "REMOTE_DUMP1090_RETRY_INTERVAL";
const ENV_LOG_LEVEL: &str = "REMOTE_DUMP1090_LOG_LEVEL";

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration: defaults, then the optional file, then the
    /// environment. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Config::default(),
        };

        let config = Self::apply_env(config)?;
        config
            .validate()
            .context("Configuration validation failed")?;
        Ok(config)
    }

    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        tracing::debug!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Override configuration values with environment variables if present
    pub fn apply_env(config: Config) -> Result<Config> {
        Self::apply_vars(config, |key| std::env::var(key).ok())
    }

    fn apply_vars<F>(mut config: Config, var: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(chunk_size) = var(ENV_CHUNK_SIZE) {
            config.relay.chunk_size = chunk_size
                .parse::<usize>()
                .with_context(|| format!("Invalid {}: {}", ENV_CHUNK_SIZE, chunk_size))?;
        }

        if let Some(timeout) = var(ENV_READ_TIMEOUT) {
            config.relay.read_timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("Invalid {}: {}", ENV_READ_TIMEOUT, timeout))?;
        }

        if let Some(timeout) = var(ENV_WRITE_TIMEOUT) {
            config.relay.write_timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("Invalid {}: {}", ENV_WRITE_TIMEOUT, timeout))?;
        }

        if let Some(interval) = var(ENV_RETRY_INTERVAL) {
            config.relay.retry_interval = humantime::parse_duration(&interval)
                .with_context(|| format!("Invalid {}: {}", ENV_RETRY_INTERVAL, interval))?;
        }

        if let Some(level) = var(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }

        Ok(config)
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_relay_config()
            .context("Relay configuration validation failed")?;

        self.validate_logging_config()
            .context("Logging configuration validation failed")?;

        Ok(())
    }

    fn validate_relay_config(&self) -> Result<()> {
        if self.relay.chunk_size == 0 {
            bail!("chunk_size must be greater than 0");
        }

        if self.relay.chunk_size > MAX_CHUNK_SIZE {
            bail!("chunk_size cannot exceed 1MB");
        }

        // A zero timeout would disable failure detection on the sockets
        if self.relay.read_timeout.is_zero() {
            bail!("read_timeout must be greater than 0");
        }

        if self.relay.write_timeout.is_zero() {
            bail!("write_timeout must be greater than 0");
        }

        if self.relay.retry_interval.is_zero() {
            bail!("retry_interval must be greater than 0");
        }

        Ok(())
    }

    fn validate_logging_config(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            bail!("logging.level must be one of: {}", valid_log_levels.join(", "));
        }

        Ok(())
    }
}
