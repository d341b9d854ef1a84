//! Wall-clock source for all elapsed-time math.
//!
//! Every timestamp in the show is epoch milliseconds read through the
//! [`Clock`] trait, so timer logic can be driven deterministically in
//! tests with a [`ManualClock`].

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// A source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync + core::fmt::Debug {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Real wall-clock time via [`chrono::Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `start_ms`.
    pub const fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    /// Move the clock forward by `ms` milliseconds.
    pub fn advance_ms(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::AcqRel);
    }

    /// Move the clock forward by whole seconds.
    pub fn advance_secs(&self, secs: i64) {
        self.advance_ms(secs.saturating_mul(1000));
    }

    /// Jump to an absolute time.
    pub fn set_ms(&self, ms: i64) {
        self.now_ms.store(ms, Ordering::Release);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::Acquire)
    }
}
