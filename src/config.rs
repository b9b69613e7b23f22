//! Tracker configuration
//!
//! Sources are merged in this order (later sources override earlier):
//! 1. Defaults from `TrackerConfig::default()`
//! 2. TOML file (if given and present)
//! 3. Environment variables prefixed `CLICK_TRACKER_`
//!    (e.g. `CLICK_TRACKER_API_ENDPOINT`)

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_PREFIX: &str = "CLICK_TRACKER_";
pub const DATA_DIR_NAME: &str = "ClickTracker";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerConfig {
    /// Base URL of the sync API; counts are posted to `{api_endpoint}/clicks`
    pub api_endpoint: String,
    pub sync_interval_secs: u64,
    pub request_timeout_secs: u64,
    /// Minimum spacing of repetitive diagnostic lines
    pub log_interval_secs: u64,
    /// Holds `app_settings.json` and `click_data.jsonl`
    pub data_dir: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "http://localhost:3000/api".to_string(),
            sync_interval_secs: 60,
            request_timeout_secs: 30,
            log_interval_secs: 60,
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(DATA_DIR_NAME)
}

impl TrackerConfig {
    /// Load from defaults, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
                tracing::debug!("Loaded configuration file {}", path.display());
            } else {
                tracing::warn!("Configuration file {} not found, using defaults", path.display());
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let endpoint = self.api_endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Invalid("api_endpoint must not be empty".to_string()));
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api_endpoint must be an http(s) URL, got {endpoint}"
            )));
        }
        if self.sync_interval_secs == 0 {
            return Err(ConfigError::Invalid("sync_interval_secs must be > 0".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_interval(&self) -> Duration {
        Duration::from_secs(self.log_interval_secs)
    }
}
