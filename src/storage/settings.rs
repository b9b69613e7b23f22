//! Persisted login state
//!
//! The login flow writes `app_settings.json`; the sync scheduler only reads
//! the identity out of it, once per tick.

use crate::storage::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "app_settings.json";

/// Username and bearer token of the logged-in user.
///
/// An empty username means "not logged in".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub auth_token: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            auth_token: auth_token.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.username.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub name: String,
    pub connection_string: String,
    pub is_default: bool,
    pub added_date: DateTime<Utc>,
}

/// On-disk settings document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
    #[serde(default)]
    pub selected_server: Option<String>,
    #[serde(default)]
    pub last_username: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            servers: vec![ServerConfig {
                name: "Default Server".to_string(),
                connection_string: "http://localhost:3000".to_string(),
                is_default: true,
                added_date: Utc::now(),
            }],
            selected_server: Some("Default Server".to_string()),
            last_username: None,
            auth_token: None,
        }
    }
}

impl AppSettings {
    pub fn identity(&self) -> Identity {
        Identity {
            username: self.last_username.clone().unwrap_or_default(),
            auth_token: self.auth_token.clone().unwrap_or_default(),
        }
    }
}

/// Read access to the current identity
pub trait SettingsStore: Send + Sync {
    fn load_identity(&self) -> StorageResult<Identity>;
}

/// Settings backed by `app_settings.json` in the data directory
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings document; a missing file yields defaults
    pub fn load_settings(&self) -> StorageResult<AppSettings> {
        if !self.path.exists() {
            return Ok(AppSettings::default());
        }
        let data = std::fs::read(&self.path)?;
        serde_json::from_slice(&data).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    pub fn save_settings(&self, settings: &AppSettings) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn load_identity(&self) -> StorageResult<Identity> {
        Ok(self.load_settings()?.identity())
    }
}

/// In-memory identity, for embedding hosts and tests
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    identity: ParkingMutex<Identity>,
}

impl MemorySettingsStore {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity: ParkingMutex::new(identity),
        }
    }

    pub fn set_identity(&self, identity: Identity) {
        *self.identity.lock() = identity;
    }

    /// Simulate logout
    pub fn clear(&self) {
        *self.identity.lock() = Identity::default();
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load_identity(&self) -> StorageResult<Identity> {
        Ok(self.identity.lock().clone())
    }
}
