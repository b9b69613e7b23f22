//! Reconciling local counts with the remote service
//!
//! - [`client`]: one HTTP round-trip, outcome classification
//! - [`lease`]: single in-flight sync guarantee
//! - [`scheduler`]: periodic tick and conditional reset

pub mod client;
pub mod lease;
pub mod scheduler;

pub use client::{ClientError, HttpSyncClient, SyncOutcome, SyncTransport};
pub use lease::{LeaseGuard, SyncLease};
pub use scheduler::{SchedulerError, SyncRunner, SyncScheduler, TickOutcome};
