//! Application configuration.

use crate::error::{AppError, AppResult};
use eclipse_client::ClientConfig;
use eclipse_core::FeedId;
use eclipse_feed::DEFAULT_MAX_PROVIDERS;
use eclipse_telemetry::LogConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Config file read when neither `--config` nor `ECLIPSE_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ECLIPSE_CONFIG";

/// Feed display defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDefaults {
    /// Provider-list slots probed per feed.
    #[serde(default = "default_max_providers")]
    pub max_providers: usize,
    /// Display names keyed by feed id, e.g. `"3" = "ALEO/USD"`.
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

fn default_max_providers() -> usize {
    DEFAULT_MAX_PROVIDERS
}

impl Default for FeedDefaults {
    fn default() -> Self {
        Self {
            max_providers: default_max_providers(),
            names: BTreeMap::new(),
        }
    }
}

impl FeedDefaults {
    /// Configured display name of `feed_id`.
    pub fn name_for(&self, feed_id: FeedId) -> Option<&str> {
        self.names.get(&feed_id.to_string()).map(String::as_str)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LogConfig,
    #[serde(default)]
    pub feed: FeedDefaults,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Path precedence: `path`, then `ECLIPSE_CONFIG`, then
    /// `config/default.toml`. An explicitly named file must exist; a missing
    /// default file yields `AppConfig::default()`.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let explicit = path
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV).ok());

        match explicit {
            Some(path) => Self::from_file(&path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
