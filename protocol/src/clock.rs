//! Time sources.
//!
//! Validation takes the current time from a [`Clock`] instead of reading
//! the system clock directly, so release gating can be tested at exact
//! instants.

use chrono::Utc;

/// Source of the current time in Unix milliseconds.
pub trait Clock {
    fn now(&self) -> i64;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock stopped at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(i64);

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
