//! Input activity counting (mouse clicks, key presses)
//!
//! An [`InputTracker`] attaches to an event source and bumps a shared
//! [`EventCounter`]; the sync scheduler snapshots and resets that same
//! counter.

pub mod counter;
pub mod tracker;
pub mod types;

pub use counter::EventCounter;
pub use tracker::InputTracker;
pub use types::{CounterSnapshot, InputCategory, ResetResult};
