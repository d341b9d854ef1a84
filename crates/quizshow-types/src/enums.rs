//! Enumeration types shared by the show state and the wire protocol.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Timer values
// ---------------------------------------------------------------------------

/// Countdown length used when nothing else has been configured.
pub const DEFAULT_TIMER_SECONDS: u32 = 30;

/// Marker serialized as the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Sentinel {
    /// The timer never runs out.
    #[serde(rename = "unlimited")]
    Unlimited,
}

/// A timer duration or reading: whole seconds, or `"unlimited"`.
///
/// On the wire this is either a JSON number or the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum TimerValue {
    /// A finite countdown in whole seconds.
    Seconds(u32),
    /// No countdown at all.
    Unlimited(Sentinel),
}

impl TimerValue {
    /// The `"unlimited"` timer value.
    pub const UNLIMITED: Self = Self::Unlimited(Sentinel::Unlimited);

    /// Return the number of seconds, or `None` for an unlimited timer.
    pub const fn seconds(self) -> Option<u32> {
        match self {
            Self::Seconds(s) => Some(s),
            Self::Unlimited(_) => None,
        }
    }

    /// Whether this is the `"unlimited"` sentinel.
    pub const fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited(_))
    }
}

impl Default for TimerValue {
    fn default() -> Self {
        Self::Seconds(DEFAULT_TIMER_SECONDS)
    }
}

impl core::fmt::Display for TimerValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Seconds(s) => write!(f, "{s}s"),
            Self::Unlimited(_) => f.write_str("unlimited"),
        }
    }
}

// ---------------------------------------------------------------------------
// Timer phase
// ---------------------------------------------------------------------------

/// Activity of the countdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Phase {
    /// Not started for the current question.
    #[default]
    Stopped,
    /// Counting down.
    Running,
    /// Frozen at a captured remaining value.
    Paused,
}

impl Phase {
    /// Whether the timer has been started (running or paused).
    pub const fn is_started(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

// ---------------------------------------------------------------------------
// Highlight
// ---------------------------------------------------------------------------

/// How a highlighted answer option is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum HighlightKind {
    /// The contestant locked in this answer.
    Selected,
    /// Revealed as the correct answer.
    Correct,
    /// Revealed as a wrong answer.
    Wrong,
}
