//! Small shared helpers

pub mod throttle;

pub use throttle::LogThrottle;
