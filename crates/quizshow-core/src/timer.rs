//! Countdown timer state machine.
//!
//! The timer moves `Stopped -> Running <-> Paused -> Stopped`. While
//! running, remaining time is never stored: it is recomputed from the
//! start timestamp on every read, so scheduler jitter in the periodic
//! tick can never accumulate into drift. The only stored remaining value
//! is the one frozen at the moment of pausing.
//!
//! # Invariants
//!
//! - A start timestamp exists only while Running or Paused.
//! - A pause timestamp exists only while Paused.
//! - Elapsed seconds are floored; remaining time never goes below zero.
//! - Duration changes are only accepted while Stopped.

use quizshow_types::{Phase, TimerValue};

/// Milliseconds per second.
const MS_PER_SECOND: i64 = 1000;

/// Internal timer state. Each variant carries only the timestamps that
/// are meaningful for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Not counting.
    Stopped,
    /// Counting down since `started_at_ms`.
    Running {
        /// Effective start time, shifted forward by every pause.
        started_at_ms: i64,
    },
    /// Frozen at `frozen`.
    Paused {
        /// Effective start time at the moment of pausing.
        started_at_ms: i64,
        /// When the pause began.
        paused_at_ms: i64,
        /// Remaining time captured when pausing.
        frozen: TimerValue,
    },
}

/// Derived view of the timer at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    /// Remaining time.
    pub current: TimerValue,
    /// Maximum time of the countdown.
    pub max: TimerValue,
    /// Current phase.
    pub phase: Phase,
}

/// The countdown timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEngine {
    value: TimerValue,
    max: TimerValue,
    state: TimerState,
}

impl TimerEngine {
    /// Create a stopped timer configured for `value`.
    pub const fn new(value: TimerValue) -> Self {
        Self {
            value,
            max: value,
            state: TimerState::Stopped,
        }
    }

    /// The configured duration.
    pub const fn value(&self) -> TimerValue {
        self.value
    }

    /// The maximum of the active countdown.
    pub const fn max(&self) -> TimerValue {
        self.max
    }

    /// The raw state, including timestamps.
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// The current phase.
    pub const fn phase(&self) -> Phase {
        match self.state {
            TimerState::Stopped => Phase::Stopped,
            TimerState::Running { .. } => Phase::Running,
            TimerState::Paused { .. } => Phase::Paused,
        }
    }

    /// Start counting down from `value`.
    ///
    /// Only legal while Stopped; returns `false` and changes nothing
    /// otherwise.
    pub const fn start(&mut self, value: TimerValue, now_ms: i64) -> bool {
        if !matches!(self.state, TimerState::Stopped) {
            return false;
        }
        self.value = value;
        self.max = value;
        self.state = TimerState::Running {
            started_at_ms: now_ms,
        };
        true
    }

    /// Freeze the countdown. Returns the frozen remaining time, or `None`
    /// if the timer was not running.
    pub fn pause(&mut self, now_ms: i64) -> Option<TimerValue> {
        let TimerState::Running { started_at_ms } = self.state else {
            return None;
        };
        let frozen = remaining_since(self.value, started_at_ms, now_ms);
        self.state = TimerState::Paused {
            started_at_ms,
            paused_at_ms: now_ms,
            frozen,
        };
        Some(frozen)
    }

    /// Continue a paused countdown from its frozen value. Returns the
    /// remaining time after resuming, or `None` if the timer was not
    /// paused.
    pub fn resume(&mut self, now_ms: i64) -> Option<TimerValue> {
        let TimerState::Paused {
            started_at_ms,
            paused_at_ms,
            ..
        } = self.state
        else {
            return None;
        };
        let paused_for_ms = now_ms.saturating_sub(paused_at_ms).max(0);
        let started_at_ms = started_at_ms.saturating_add(paused_for_ms);
        self.state = TimerState::Running { started_at_ms };
        Some(remaining_since(self.value, started_at_ms, now_ms))
    }

    /// Change the configured duration. Rejected unless Stopped.
    pub const fn reconfigure(&mut self, value: TimerValue) -> bool {
        if !matches!(self.state, TimerState::Stopped) {
            return false;
        }
        self.value = value;
        self.max = value;
        true
    }

    /// Re-arm the display at the configured duration. Rejected unless
    /// Stopped.
    pub const fn reset(&mut self) -> bool {
        if !matches!(self.state, TimerState::Stopped) {
            return false;
        }
        self.max = self.value;
        true
    }

    /// Return to Stopped from any state, clearing all timestamps.
    pub const fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// Remaining time at `now_ms`.
    pub fn remaining(&self, now_ms: i64) -> TimerValue {
        match self.state {
            TimerState::Stopped => self.value,
            TimerState::Running { started_at_ms } => {
                remaining_since(self.value, started_at_ms, now_ms)
            }
            TimerState::Paused { frozen, .. } => frozen,
        }
    }

    /// Remaining time, max and phase at `now_ms`.
    pub fn snapshot(&self, now_ms: i64) -> TimerSnapshot {
        if self.value.is_unlimited() {
            return TimerSnapshot {
                current: TimerValue::UNLIMITED,
                max: TimerValue::UNLIMITED,
                phase: self.phase(),
            };
        }
        TimerSnapshot {
            current: self.remaining(now_ms),
            max: self.max,
            phase: self.phase(),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerValue::default())
    }
}

/// `max(0, total - floor((now - started) / 1000))`, saturating on clock skew.
fn remaining_since(value: TimerValue, started_at_ms: i64, now_ms: i64) -> TimerValue {
    let TimerValue::Seconds(total) = value else {
        return TimerValue::UNLIMITED;
    };
    let elapsed_ms = now_ms.saturating_sub(started_at_ms).max(0);
    let elapsed_secs = elapsed_ms.checked_div(MS_PER_SECOND).unwrap_or(0);
    let elapsed = u32::try_from(elapsed_secs).unwrap_or(u32::MAX);
    TimerValue::Seconds(total.saturating_sub(elapsed))
}
