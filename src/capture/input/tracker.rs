use crate::capture::input::counter::EventCounter;
use crate::capture::input::types::InputCategory;
use crate::capture::source::{CaptureError, CaptureResult, InputEventSource, InputHandler};
use crate::utils::LogThrottle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Feeds events from an [`InputEventSource`] into a shared [`EventCounter`]
pub struct InputTracker {
    source: Box<dyn InputEventSource>,
    counter: Arc<EventCounter>,
    is_tracking: Arc<AtomicBool>,
    log_throttle: Arc<LogThrottle>,
}

impl InputTracker {
    pub fn new(
        source: impl InputEventSource + 'static,
        counter: Arc<EventCounter>,
        log_interval: Duration,
    ) -> Self {
        Self {
            source: Box::new(source),
            counter,
            is_tracking: Arc::new(AtomicBool::new(false)),
            log_throttle: Arc::new(LogThrottle::new(log_interval)),
        }
    }

    pub fn counter(&self) -> &Arc<EventCounter> {
        &self.counter
    }

    fn handler(&self) -> InputHandler {
        let counter = self.counter.clone();
        let is_tracking = self.is_tracking.clone();
        let log_throttle = self.log_throttle.clone();

        Arc::new(move |category: InputCategory| {
            // Events racing with stop() are dropped
            if !is_tracking.load(Ordering::Relaxed) {
                return;
            }
            counter.increment(category);

            if log_throttle.should_log() {
                tracing::debug!(
                    "Current counts - mouse: {}, keyboard: {}",
                    counter.read(InputCategory::Mouse),
                    counter.read(InputCategory::Keyboard)
                );
            }
        })
    }

    /// Attach to the event source and start counting
    pub fn start(&self) -> CaptureResult<()> {
        if self.is_tracking.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyStarted);
        }

        if let Err(e) = self.source.start(self.handler()) {
            self.is_tracking.store(false, Ordering::SeqCst);
            return Err(e);
        }

        tracing::info!("Input tracking started (source={})", self.source.name());
        Ok(())
    }

    /// Detach from the event source. Counter values are kept.
    pub fn stop(&self) -> CaptureResult<()> {
        if !self.is_tracking.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        if let Err(e) = self.source.stop() {
            // Handler is still attached, so keep counting and allow a retry
            self.is_tracking.store(true, Ordering::SeqCst);
            return Err(e);
        }

        tracing::info!(
            "Input tracking stopped (mouse={}, keyboard={})",
            self.counter.read(InputCategory::Mouse),
            self.counter.read(InputCategory::Keyboard)
        );
        Ok(())
    }

    pub fn is_tracking(&self) -> bool {
        self.is_tracking.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::source::ManualEventSource;

    fn tracker() -> (Arc<ManualEventSource>, InputTracker) {
        let source = Arc::new(ManualEventSource::new());
        let tracker = InputTracker::new(
            source.clone(),
            Arc::new(EventCounter::new()),
            Duration::from_secs(60),
        );
        (source, tracker)
    }

    #[test]
    fn test_events_counted_while_tracking() {
        let (source, tracker) = tracker();
        tracker.start().unwrap();

        source.emit(InputCategory::Mouse);
        source.emit(InputCategory::Keyboard);
        source.emit(InputCategory::Keyboard);

        assert_eq!(tracker.counter().read(InputCategory::Mouse), 1);
        assert_eq!(tracker.counter().read(InputCategory::Keyboard), 2);
    }

    #[test]
    fn test_stop_keeps_counts_and_detaches() {
        let (source, tracker) = tracker();
        tracker.start().unwrap();
        source.emit(InputCategory::Mouse);
        tracker.stop().unwrap();

        assert!(!tracker.is_tracking());
        assert!(!source.emit(InputCategory::Mouse));
        assert_eq!(tracker.counter().read(InputCategory::Mouse), 1);
    }

    #[test]
    fn test_double_start_rejected() {
        let (_source, tracker) = tracker();
        tracker.start().unwrap();
        assert!(matches!(tracker.start(), Err(CaptureError::AlreadyStarted)));
        assert!(tracker.is_tracking());
    }

    #[test]
    fn test_restart_after_stop() {
        let (source, tracker) = tracker();
        tracker.start().unwrap();
        tracker.stop().unwrap();
        tracker.stop().unwrap();
        tracker.start().unwrap();

        source.emit(InputCategory::Keyboard);
        assert_eq!(tracker.counter().read(InputCategory::Keyboard), 1);
    }

    /// Source whose first detach fails
    struct StubbornSource {
        inner: ManualEventSource,
        fail_next_stop: AtomicBool,
    }

    impl InputEventSource for StubbornSource {
        fn name(&self) -> &str {
            "stubborn"
        }

        fn start(&self, handler: InputHandler) -> CaptureResult<()> {
            self.inner.start(handler)
        }

        fn stop(&self) -> CaptureResult<()> {
            if self.fail_next_stop.swap(false, Ordering::SeqCst) {
                return Err(CaptureError::NotStarted);
            }
            self.inner.stop()
        }
    }

    #[test]
    fn test_failed_stop_keeps_tracking() {
        let source = Arc::new(StubbornSource {
            inner: ManualEventSource::new(),
            fail_next_stop: AtomicBool::new(true),
        });
        let tracker = InputTracker::new(
            source.clone(),
            Arc::new(EventCounter::new()),
            Duration::from_secs(60),
        );
        tracker.start().unwrap();

        assert!(tracker.stop().is_err());
        assert!(tracker.is_tracking());
        assert!(source.inner.emit(InputCategory::Mouse));
        assert_eq!(tracker.counter().read(InputCategory::Mouse), 1);

        tracker.stop().unwrap();
        assert!(!tracker.is_tracking());
        tracker.start().unwrap();
        source.inner.emit(InputCategory::Mouse);
        assert_eq!(tracker.counter().read(InputCategory::Mouse), 2);
    }

    #[test]
    fn test_source_failure_leaves_tracker_stopped() {
        let (source, tracker) = tracker();
        // Occupy the source so the tracker cannot attach
        source.start(Arc::new(|_| {})).unwrap();

        assert!(tracker.start().is_err());
        assert!(!tracker.is_tracking());
    }
}
