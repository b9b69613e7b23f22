//! Host wiring: counter, input tracking and background sync

use crate::capture::{CaptureError, EventCounter, InputCategory, InputEventSource, InputTracker};
use crate::config::TrackerConfig;
use crate::storage::{FileSettingsStore, JsonlRecordStore, SettingsStore, SyncRecordStore};
use crate::sync::{ClientError, HttpSyncClient, SchedulerError, SyncRunner, SyncScheduler, SyncTransport};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Live counts for a UI poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub mouse_clicks: u64,
    pub keyboard_presses: u64,
}

pub struct ClickTracker {
    counter: Arc<EventCounter>,
    tracker: InputTracker,
    scheduler: SyncScheduler,
}

impl ClickTracker {
    /// Wire the default collaborators: file stores in `config.data_dir` and
    /// the HTTP sync client.
    pub fn new(config: &TrackerConfig, source: impl InputEventSource + 'static) -> Result<Self, AppError> {
        let transport = HttpSyncClient::new(&config.api_endpoint, config.request_timeout())?;
        Ok(Self::with_collaborators(
            config,
            source,
            Arc::new(FileSettingsStore::new(&config.data_dir)),
            Arc::new(transport),
            Arc::new(JsonlRecordStore::new(&config.data_dir)),
        ))
    }

    pub fn with_collaborators(
        config: &TrackerConfig,
        source: impl InputEventSource + 'static,
        settings: Arc<dyn SettingsStore>,
        transport: Arc<dyn SyncTransport>,
        records: Arc<dyn SyncRecordStore>,
    ) -> Self {
        let counter = Arc::new(EventCounter::new());
        let tracker = InputTracker::new(source, counter.clone(), config.log_interval());
        let runner = Arc::new(SyncRunner::new(
            counter.clone(),
            settings,
            transport,
            records,
            config.log_interval(),
        ));
        let scheduler = SyncScheduler::new(runner, config.sync_interval());

        Self {
            counter,
            tracker,
            scheduler,
        }
    }

    /// Begin counting, then begin syncing. Must run inside a tokio runtime.
    pub fn start(&self) -> Result<(), AppError> {
        self.tracker.start()?;
        if let Err(e) = self.scheduler.start() {
            // Undo the half-start
            if let Err(stop_err) = self.tracker.stop() {
                tracing::warn!("Failed to stop input tracking: {}", stop_err);
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Stop syncing first, then stop counting. An in-flight sync still
    /// finishes; counts stay in memory.
    pub async fn shutdown(&self) {
        self.scheduler.stop().await;
        if let Err(e) = self.tracker.stop() {
            tracing::warn!("Failed to stop input tracking: {}", e);
        }
    }

    pub fn counts(&self) -> Counts {
        Counts {
            mouse_clicks: self.counter.read(InputCategory::Mouse),
            keyboard_presses: self.counter.read(InputCategory::Keyboard),
        }
    }

    pub fn counter(&self) -> &Arc<EventCounter> {
        &self.counter
    }

    pub fn scheduler(&self) -> &SyncScheduler {
        &self.scheduler
    }

    pub fn is_running(&self) -> bool {
        self.tracker.is_tracking() && self.scheduler.is_running()
    }
}
