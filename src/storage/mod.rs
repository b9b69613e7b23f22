//! Local persistence: login identity and synced-count records

pub mod records;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

pub use records::{JsonlRecordStore, MemoryRecordStore, SyncRecord, SyncRecordStore};
pub use settings::{
    AppSettings, FileSettingsStore, Identity, MemorySettingsStore, ServerConfig, SettingsStore,
};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;
