//! Configuration loading
//!
//! Settings come from an optional TOML file and are overridden by command
//! line flags. Example `~/.config/monitored-rsync/config.toml`:
//!
//! ```toml
//! exclude = ["build", "node_modules"]
//! delay_ms = 500
//! dry_run = false
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use watcher::MonitorConfig;

/// File-level settings; every field is optional so flags can fill the gaps
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub exclude: Option<Vec<String>>,
    pub delay_ms: Option<u64>,
    pub dry_run: Option<bool>,
    pub queue_capacity: Option<usize>,
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub exclude: Option<Vec<String>>,
    pub delay_ms: Option<u64>,
    pub dry_run: bool,
}

/// Default config file location
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("monitored-rsync").join("config.toml"))
}

/// Load the config file
///
/// An explicit path must exist. The default location is optional.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig> {
    match explicit {
        Some(path) => load_file(path),
        None => match config_file_path() {
            Some(path) if path.exists() => load_file(&path),
            _ => Ok(FileConfig::default()),
        },
    }
}

pub fn load_file(path: &Path) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

/// Merge file settings with flags; flags win
pub fn resolve(file: FileConfig, overrides: Overrides) -> MonitorConfig {
    let mut config = MonitorConfig::default();

    if let Some(exclude) = overrides.exclude.or(file.exclude) {
        config.exclude = exclude;
    }
    if let Some(delay_ms) = overrides.delay_ms.or(file.delay_ms) {
        config.delay = Duration::from_millis(delay_ms);
    }
    config.dry_run = overrides.dry_run || file.dry_run.unwrap_or(false);
    if let Some(capacity) = file.queue_capacity {
        config.queue_capacity = capacity;
    }

    config
}
