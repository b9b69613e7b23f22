//! Click Tracker - counts mouse clicks and key presses and keeps a remote
//! service in sync with them.
//!
//! An event source feeds a lock-free [`capture::EventCounter`]; a background
//! [`sync::SyncScheduler`] periodically sends the counts and resets only what
//! the server acknowledged without racing new input.

pub mod app;
pub mod capture;
pub mod config;
pub mod storage;
pub mod sync;
pub mod utils;

pub use app::{AppError, ClickTracker, Counts};
pub use config::TrackerConfig;

use capture::InputEventSource;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run the tracker until Ctrl-C
pub fn run(config_path: Option<&Path>, source: impl InputEventSource + 'static) -> anyhow::Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "click_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Click Tracker v{}", env!("CARGO_PKG_VERSION"));

    let config = TrackerConfig::load(config_path)?;
    tracing::debug!(
        "Using endpoint {} and data directory {}",
        config.api_endpoint,
        config.data_dir.display()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let tracker = ClickTracker::new(&config, source)?;
        tracker.start()?;

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown requested");

        tracker.shutdown().await;
        let counts = tracker.counts();
        tracing::info!(
            "Stopped with unsynced counts (mouse={}, keyboard={})",
            counts.mouse_clicks,
            counts.keyboard_presses
        );
        Ok::<(), anyhow::Error>(())
    })
}
