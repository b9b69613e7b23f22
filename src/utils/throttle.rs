//! Rate limiter for repetitive diagnostic log lines

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::time::Duration;

/// Lets at most one caller through per `period`.
///
/// Safe to hit from the input callback thread: the check is a single
/// lock-free state update on a monotonic clock and never blocks.
pub struct LogThrottle {
    // None for a zero period: every call logs
    limiter: Option<DefaultDirectRateLimiter>,
}

impl LogThrottle {
    pub fn new(period: Duration) -> Self {
        Self {
            limiter: Quota::with_period(period).map(RateLimiter::direct),
        }
    }

    /// Returns `true` if the caller should emit its log line now
    pub fn should_log(&self) -> bool {
        self.limiter
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }
}
