//! Configuration file loading tests

use anyhow::Result;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use remote_dump1090::config::{Config, ConfigManager};

#[test]
fn test_load_full_config_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("remote-dump1090.toml");
    fs::write(
        &config_path,
        r#"
[relay]
chunk_size = 4096
read_timeout = "30s"
write_timeout = "10s"
retry_interval = "500ms"

[logging]
level = "info"
"#,
    )?;

    let config = ConfigManager::load_from_file(&config_path)?;
    config.validate()?;
    assert_eq!(config.relay.chunk_size, 4096);
    assert_eq!(config.relay.read_timeout, Duration::from_secs(30));
    assert_eq!(config.relay.write_timeout, Duration::from_secs(10));
    assert_eq!(config.relay.retry_interval, Duration::from_millis(500));
    assert_eq!(config.logging.level, "info");

    Ok(())
}

#[test]
fn test_partial_config_keeps_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("partial.toml");
    fs::write(&config_path, "[relay]\nretry_interval = \"2s\"\n")?;

    let config = ConfigManager::load_from_file(&config_path)?;
    let defaults = Config::default();
    assert_eq!(config.relay.retry_interval, Duration::from_secs(2));
    assert_eq!(config.relay.chunk_size, defaults.relay.chunk_size);
    assert_eq!(config.relay.read_timeout, defaults.relay.read_timeout);
    assert_eq!(config.logging.level, defaults.logging.level);

    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let zero_timeout = temp_dir.path().join("zero.toml");
    fs::write(&zero_timeout, "[relay]\nwrite_timeout = \"0s\"\n")?;
    assert!(ConfigManager::load(Some(zero_timeout.as_path())).is_err());

    let garbage = temp_dir.path().join("garbage.toml");
    fs::write(&garbage, "[relay\nchunk_size = ")?;
    let err = ConfigManager::load_from_file(&garbage).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));

    let missing = temp_dir.path().join("missing.toml");
    assert!(ConfigManager::load(Some(missing.as_path())).is_err());

    Ok(())
}
