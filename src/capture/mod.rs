//! Input capture
//!
//! This module provides the event source abstraction and the counters it feeds.

pub mod input;
pub mod source;

// Re-export input types
pub use input::{CounterSnapshot, EventCounter, InputCategory, InputTracker, ResetResult};

// Re-export source trait
pub use source::{CaptureError, CaptureResult, InputEventSource, InputHandler, ManualEventSource};
