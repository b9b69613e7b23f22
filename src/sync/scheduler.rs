//! Background sync scheduler
//!
//! Every interval a tick takes the [`SyncLease`], snapshots the counters,
//! sends the snapshot and, on success, resets only the categories that did
//! not move while the request was in flight. A moved category keeps its full
//! live value and is sent again next tick, so delivery to the server is
//! at-least-once and no local event is ever dropped.
//!
//! Every failure is contained in its tick. The only hard invariant is that
//! the lease is released on every exit path, which the guard guarantees.

use crate::capture::input::counter::EventCounter;
use crate::capture::input::types::{InputCategory, ResetResult};
use crate::storage::{SettingsStore, SyncRecord, SyncRecordStore};
use crate::sync::client::{SyncOutcome, SyncTransport};
use crate::sync::lease::SyncLease;
use crate::utils::LogThrottle;
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Sync scheduler already running")]
    AlreadyRunning,

    #[error("Sync scheduler must be started inside a tokio runtime")]
    NoRuntime,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Another tick holds the lease; nothing happened
    LeaseHeld,
    /// No logged-in user
    NotConfigured,
    /// Both counters were zero, no request sent
    Idle,
    /// Server acknowledged; per-category reset results
    Synced(ResetResult),
    /// Send failed; counters untouched
    Failed(SyncOutcome),
}

/// Collaborators for one tick. Shared between the driver and manual callers.
pub struct SyncRunner {
    counter: Arc<EventCounter>,
    settings: Arc<dyn SettingsStore>,
    transport: Arc<dyn SyncTransport>,
    records: Arc<dyn SyncRecordStore>,
    lease: SyncLease,
    log_throttle: LogThrottle,
}

impl SyncRunner {
    pub fn new(
        counter: Arc<EventCounter>,
        settings: Arc<dyn SettingsStore>,
        transport: Arc<dyn SyncTransport>,
        records: Arc<dyn SyncRecordStore>,
        log_interval: Duration,
    ) -> Self {
        Self {
            counter,
            settings,
            transport,
            records,
            lease: SyncLease::new(),
            log_throttle: LogThrottle::new(log_interval),
        }
    }

    pub fn lease(&self) -> &SyncLease {
        &self.lease
    }

    pub fn counter(&self) -> &Arc<EventCounter> {
        &self.counter
    }

    /// Run one sync attempt
    pub async fn tick(&self) -> TickOutcome {
        let Some(_lease) = self.lease.try_acquire() else {
            tracing::trace!("Sync already in progress, skipping tick");
            return TickOutcome::LeaseHeld;
        };

        // Read fresh every tick: the user may have logged out since the last one
        let identity = match self.settings.load_identity() {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("Failed to load settings, skipping sync: {}", e);
                return TickOutcome::NotConfigured;
            }
        };
        if !identity.is_configured() {
            tracing::debug!("No username found, skipping sync");
            return TickOutcome::NotConfigured;
        }

        let snapshot = self.counter.snapshot();
        if snapshot.is_empty() {
            return TickOutcome::Idle;
        }

        if self.log_throttle.should_log() {
            tracing::debug!(
                "Syncing for user {} - mouse: {}, keyboard: {}",
                identity.username,
                snapshot.mouse_clicks,
                snapshot.keyboard_presses
            );
        }

        let outcome = self.transport.send(&identity, &snapshot).await;
        if !outcome.is_success() {
            if outcome.is_auth_problem() {
                tracing::warn!("Sync for user {} failed: {}", identity.username, outcome);
            } else {
                tracing::debug!("Sync failed ({}), will retry next interval", outcome);
            }
            return TickOutcome::Failed(outcome);
        }

        let reset = self.counter.reset_snapshot(&snapshot);

        if let Some(record) = SyncRecord::from_reset(&identity.username, &snapshot, reset) {
            // The server already has these counts; a local write failure
            // must not resurrect them
            if let Err(e) = self.records.append(&record) {
                tracing::warn!("Failed to write sync record: {}", e);
            }
        }

        for category in InputCategory::ALL {
            if !reset.get(category) {
                tracing::debug!(
                    "{} count changed during sync ({} -> {}), delta kept for next interval",
                    category,
                    snapshot.get(category),
                    self.counter.read(category)
                );
            }
        }
        if reset.mouse && reset.keyboard {
            tracing::info!(
                "Synced and reset counters (mouse={}, keyboard={})",
                snapshot.mouse_clicks,
                snapshot.keyboard_presses
            );
        }

        TickOutcome::Synced(reset)
    }
}

/// Dropping this drops the shutdown sender, which also ends the driver loop
struct Driver {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Drives [`SyncRunner::tick`] on a fixed interval
pub struct SyncScheduler {
    runner: Arc<SyncRunner>,
    interval: Duration,
    driver: ParkingMutex<Option<Driver>>,
}

impl SyncScheduler {
    pub fn new(runner: Arc<SyncRunner>, interval: Duration) -> Self {
        Self {
            runner,
            interval,
            driver: ParkingMutex::new(None),
        }
    }

    pub fn runner(&self) -> &Arc<SyncRunner> {
        &self.runner
    }

    /// Run one tick on the caller's task
    pub async fn tick(&self) -> TickOutcome {
        self.runner.tick().await
    }

    /// Start the recurring trigger. The first tick fires immediately.
    pub fn start(&self) -> Result<(), SchedulerError> {
        let mut driver = self.driver.lock();
        if driver.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;

        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = runtime.spawn(drive(self.runner.clone(), self.interval, shutdown_rx));
        *driver = Some(Driver { shutdown, handle });

        tracing::info!("Sync scheduler started (interval={:?})", self.interval);
        Ok(())
    }

    /// Stop scheduling new ticks. A tick already in flight runs to completion.
    pub async fn stop(&self) {
        let driver = self.driver.lock().take();
        let Some(driver) = driver else {
            return;
        };
        let _ = driver.shutdown.send(());
        if let Err(e) = driver.handle.await {
            tracing::error!("Sync driver ended abnormally: {}", e);
        }
        tracing::info!("Sync scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.driver.lock().is_some()
    }
}

async fn drive(runner: Arc<SyncRunner>, period: Duration, mut shutdown: oneshot::Receiver<()>) {
    // interval() panics on a zero period
    let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => spawn_tick(runner.clone()),
        }
    }
}

/// Run the tick as its own task so stopping the driver never cancels it
fn spawn_tick(runner: Arc<SyncRunner>) {
    let tick = tokio::spawn(async move { runner.tick().await });
    tokio::spawn(async move {
        if let Err(e) = tick.await {
            tracing::error!("Sync tick aborted: {}", e);
        }
    });
}
