//! Input event source trait
//!
//! Abstracts the platform hook that reports mouse clicks and key presses.
//! The tracker only needs "call this handler once per qualifying event".

use crate::capture::input::types::InputCategory;
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while attaching to an event source
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Event source already started")]
    AlreadyStarted,

    #[error("Event source not started")]
    NotStarted,
}

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Callback invoked once per qualifying input event, from any thread
pub type InputHandler = Arc<dyn Fn(InputCategory) + Send + Sync>;

/// Trait for input event sources
///
/// Implementations filter raw platform events (e.g. only button-down and
/// key-down) and must invoke the handler exactly once per physical event.
pub trait InputEventSource: Send + Sync {
    /// Human readable source name for diagnostics
    fn name(&self) -> &str;

    /// Attach the handler and begin delivering events
    fn start(&self, handler: InputHandler) -> CaptureResult<()>;

    /// Detach the handler; no events are delivered afterwards
    fn stop(&self) -> CaptureResult<()>;
}

/// Event source driven by explicit [`emit`](ManualEventSource::emit) calls.
///
/// Used when events arrive from somewhere other than an OS hook, and as the
/// deterministic source in tests.
#[derive(Default)]
pub struct ManualEventSource {
    handler: RwLock<Option<InputHandler>>,
}

impl ManualEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one event on the caller's thread.
    ///
    /// Returns `false` if no handler is attached.
    pub fn emit(&self, category: InputCategory) -> bool {
        // Clone out so the handler never runs under the lock; concurrent
        // emitters share the read side
        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => {
                handler(category);
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.handler.read().is_some()
    }
}

impl InputEventSource for ManualEventSource {
    fn name(&self) -> &str {
        "manual"
    }

    fn start(&self, handler: InputHandler) -> CaptureResult<()> {
        let mut slot = self.handler.write();
        if slot.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }
        *slot = Some(handler);
        Ok(())
    }

    fn stop(&self) -> CaptureResult<()> {
        self.handler
            .write()
            .take()
            .map(|_| ())
            .ok_or(CaptureError::NotStarted)
    }
}

impl<S: InputEventSource + ?Sized> InputEventSource for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn start(&self, handler: InputHandler) -> CaptureResult<()> {
        (**self).start(handler)
    }

    fn stop(&self) -> CaptureResult<()> {
        (**self).stop()
    }
}
