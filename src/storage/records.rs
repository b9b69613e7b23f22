//! Local audit trail of synced counts

use crate::capture::input::types::{CounterSnapshot, ResetResult};
use crate::storage::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const RECORDS_FILE: &str = "click_data.jsonl";

/// Counts acknowledged by the server and removed from the live counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    pub id: Uuid,
    pub username: String,
    pub mouse_clicks: u64,
    pub keyboard_presses: u64,
    pub timestamp: DateTime<Utc>,
}

impl SyncRecord {
    /// Build the record for the categories that actually reset.
    ///
    /// Returns `None` when no non-zero count was removed, since nothing was
    /// synced.
    pub fn from_reset(
        username: &str,
        snapshot: &CounterSnapshot,
        reset: ResetResult,
    ) -> Option<Self> {
        let mouse_clicks = if reset.mouse { snapshot.mouse_clicks } else { 0 };
        let keyboard_presses = if reset.keyboard {
            snapshot.keyboard_presses
        } else {
            0
        };
        if mouse_clicks == 0 && keyboard_presses == 0 {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            mouse_clicks,
            keyboard_presses,
            timestamp: snapshot.taken_at,
        })
    }
}

pub trait SyncRecordStore: Send + Sync {
    fn append(&self, record: &SyncRecord) -> StorageResult<()>;
}

/// Appends one JSON object per line to `click_data.jsonl`
#[derive(Debug)]
pub struct JsonlRecordStore {
    path: PathBuf,
    // Serializes appends from overlapping ticks
    write_lock: ParkingMutex<()>,
}

impl JsonlRecordStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(RECORDS_FILE),
            write_lock: ParkingMutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_all(&self) -> StorageResult<Vec<SyncRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        data.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str::<SyncRecord>(line).map_err(StorageError::from))
            .collect()
    }
}

impl SyncRecordStore for JsonlRecordStore {
    fn append(&self, record: &SyncRecord) -> StorageResult<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&line)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: ParkingMutex<Vec<SyncRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SyncRecord> {
        self.records.lock().clone()
    }
}

impl SyncRecordStore for MemoryRecordStore {
    fn append(&self, record: &SyncRecord) -> StorageResult<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
