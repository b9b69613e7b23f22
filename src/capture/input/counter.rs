//! Lock-free click and key press counters
//!
//! The counter pair is written from the event-source callback thread and
//! read/reset from the sync scheduler. Every mutation is a single atomic
//! instruction so neither side ever blocks the other.

use crate::capture::input::types::{CounterSnapshot, InputCategory, ResetResult};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct EventCounter {
    mouse_clicks: AtomicU64,
    keyboard_presses: AtomicU64,
}

impl EventCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, category: InputCategory) -> &AtomicU64 {
        match category {
            InputCategory::Mouse => &self.mouse_clicks,
            InputCategory::Keyboard => &self.keyboard_presses,
        }
    }

    /// Count one event of the given category
    pub fn increment(&self, category: InputCategory) {
        self.slot(category).fetch_add(1, Ordering::AcqRel);
    }

    /// Current value, safe to poll from any thread
    pub fn read(&self, category: InputCategory) -> u64 {
        self.slot(category).load(Ordering::Acquire)
    }

    /// Read both counters. The two loads are independent, so a concurrent
    /// increment may land between them.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            mouse_clicks: self.read(InputCategory::Mouse),
            keyboard_presses: self.read(InputCategory::Keyboard),
            taken_at: chrono::Utc::now(),
        }
    }

    /// Reset `category` to zero only if it still holds `expected`.
    ///
    /// Returns `false` and leaves the counter untouched when it moved since
    /// `expected` was read.
    pub fn reset_if_unchanged(&self, category: InputCategory, expected: u64) -> bool {
        self.slot(category)
            .compare_exchange(expected, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Apply [`reset_if_unchanged`](Self::reset_if_unchanged) to each category
    /// of `snapshot` independently.
    pub fn reset_snapshot(&self, snapshot: &CounterSnapshot) -> ResetResult {
        ResetResult {
            mouse: self.reset_if_unchanged(InputCategory::Mouse, snapshot.mouse_clicks),
            keyboard: self.reset_if_unchanged(InputCategory::Keyboard, snapshot.keyboard_presses),
        }
    }
}
