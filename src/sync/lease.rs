//! Single-slot sync lease
//!
//! At most one sync attempt may be in flight. A tick acquires the lease with
//! an atomic test-and-set and gets back a guard; dropping the guard (return,
//! early exit, panic unwind, or future cancellation) releases it.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SyncLease {
    held: AtomicBool,
}

impl SyncLease {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lease, or `None` if another attempt holds it
    pub fn try_acquire(&self) -> Option<LeaseGuard<'_>> {
        if self.held.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(LeaseGuard { lease: self })
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Proof of holding the [`SyncLease`]; releases it on drop
#[must_use = "the lease is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LeaseGuard<'a> {
    lease: &'a SyncLease,
}

impl Drop for LeaseGuard<'_> {
    fn drop(&mut self) {
        self.lease.held.store(false, Ordering::Release);
    }
}
