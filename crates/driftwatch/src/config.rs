use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use driftwatch_core::models::WatchTarget;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Directory for the JSON backend, database file for SQLite.
    pub path: PathBuf,
}

fn default_backend() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct WatchConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_observer_timeout_secs")]
    pub observer_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            observer_timeout_secs: default_observer_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_interval_secs() -> u64 {
    300
}
fn default_fetch_timeout_secs() -> u64 {
    30
}
fn default_observer_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    "driftwatch/0.1".to_string()
}

impl WatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn observer_timeout(&self) -> Duration {
        Duration::from_secs(self.observer_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TargetConfig {
    /// Resource locator handed to the fetch collaborator verbatim.
    pub address: String,
    /// Opaque extraction instruction, also handed through verbatim.
    #[serde(default)]
    pub extract: String,
}

impl Config {
    pub fn watch_targets(&self) -> Vec<WatchTarget> {
        self.targets
            .iter()
            .map(|t| WatchTarget::new(&t.address, &t.extract))
            .collect()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    match config.storage.backend.as_str() {
        "json" | "sqlite" => {}
        other => anyhow::bail!("Unknown storage backend: '{}'. Must be json or sqlite.", other),
    }

    if config.watch.interval_secs == 0 {
        anyhow::bail!("watch.interval_secs must be >= 1");
    }

    if config.watch.fetch_timeout_secs == 0 {
        anyhow::bail!("watch.fetch_timeout_secs must be >= 1");
    }

    let mut seen = HashSet::new();
    for target in &config.targets {
        if target.address.trim().is_empty() {
            anyhow::bail!("targets entries must have a non-empty address");
        }
        if !seen.insert(target.address.as_str()) {
            anyhow::bail!("Duplicate target address: '{}'", target.address);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("drift.toml");
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let (_tmp, path) = write_config(
            r#"
            [storage]
            path = "./data"
            "#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.storage.backend, "json");
        assert_eq!(config.watch.interval_secs, 300);
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let (_tmp, path) = write_config(
            r#"
            [storage]
            path = "./data"

            [watch]
            interval_secs = 0
            "#,
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let (_tmp, path) = write_config(
            r#"
            [storage]
            backend = "redis"
            path = "./data"
            "#,
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_rejects_duplicate_addresses() {
        let (_tmp, path) = write_config(
            r#"
            [storage]
            path = "./data"

            [[targets]]
            address = "https://x.test/a"

            [[targets]]
            address = "https://x.test/a"
            "#,
        );
        assert!(load_config(&path).is_err());
    }
}
