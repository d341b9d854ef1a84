//! Inbound commands and outbound events carried over the transport.
//!
//! Both directions use adjacently tagged JSON objects:
//!
//! ```json
//! {"command": "pick-answer", "data": 2}
//! {"event": "update-timer", "data": {"current": 27, "max": 30, "audioTrigger": false, "startPosition": 32}}
//! ```
//!
//! Commands and events without a payload omit `data`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Phase, TimerValue};
use crate::structs::{Question, QuestionDraft};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A command sent by the operator console (or a display asking to resync).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "command", content = "data", rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum ClientCommand {
    /// Load a new question, or edit the text of the running one.
    SetQuestion(QuestionDraft),
    /// Reveal the answer options and start the countdown.
    RevealOptions,
    /// Lock in an answer (zero-based option index).
    ///
    /// Indices are signed so an out-of-range value, negative included,
    /// reaches the router and is dropped like any other failed guard.
    PickAnswer(i32),
    /// Mark an option as the correct answer.
    MarkCorrect(i32),
    /// Mark an option as a wrong answer.
    MarkWrong(i32),
    /// Re-arm the countdown display at the configured duration.
    ResetTimer,
    /// Change the configured countdown duration.
    SetTimerDuration(TimerValue),
    /// Pause the countdown with an audio cue.
    PauseTimer,
    /// Pause the countdown silently.
    FreezeTimer,
    /// Resume a paused countdown.
    ResumeTimer,
    /// Clear the question, highlight and timer.
    RemoveQuestion,
    /// Play a named audio cue on every display.
    PlayAudio(String),
    /// Ask for a full resync of the current show state.
    RequestSync,
    /// Switch every display to another screen.
    SetScreen(String),
}

impl ClientCommand {
    /// Wire name of the command, for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetQuestion(_) => "set-question",
            Self::RevealOptions => "reveal-options",
            Self::PickAnswer(_) => "pick-answer",
            Self::MarkCorrect(_) => "mark-correct",
            Self::MarkWrong(_) => "mark-wrong",
            Self::ResetTimer => "reset-timer",
            Self::SetTimerDuration(_) => "set-timer-duration",
            Self::PauseTimer => "pause-timer",
            Self::FreezeTimer => "freeze-timer",
            Self::ResumeTimer => "resume-timer",
            Self::RemoveQuestion => "remove-question",
            Self::PlayAudio(_) => "play-audio",
            Self::RequestSync => "request-sync",
            Self::SetScreen(_) => "set-screen",
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound payloads
// ---------------------------------------------------------------------------

/// Payload of `update-timer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TimerUpdate {
    /// Remaining time.
    pub current: TimerValue,
    /// Maximum time of the countdown.
    pub max: TimerValue,
    /// Whether displays should (re)start the countdown soundtrack.
    pub audio_trigger: bool,
    /// Seek position for the countdown soundtrack, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub start_position: Option<u32>,
}

/// Payload of `current-timer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimerReading {
    /// Remaining time.
    pub current: TimerValue,
    /// Maximum time of the countdown.
    pub max: TimerValue,
}

/// Payload of `timer-phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhaseUpdate {
    /// The timer phase clients should display.
    pub phase: Phase,
}

/// Payload of `freeze-timer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FreezeUpdate {
    /// Whether the pause should be accompanied by an audio cue.
    pub audio: bool,
}

/// Payload of `unfreeze-timer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UnfreezeUpdate {
    /// Whether the countdown soundtrack should restart.
    pub audio: bool,
    /// Soundtrack seek position when `audio` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub audio_offset: Option<u32>,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// An event pushed to display clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum ServerEvent {
    /// Show this question body (options stay hidden until revealed).
    DisplayQuestion(Question),
    /// Reveal the answer options.
    RevealOptions,
    /// Highlight the locked-in option.
    HighlightAnswer(usize),
    /// Mark an option correct.
    MarkCorrect(usize),
    /// Mark an option wrong.
    MarkWrong(usize),
    /// Full timer update, optionally restarting the soundtrack.
    UpdateTimer(TimerUpdate),
    /// Plain timer reading.
    CurrentTimer(TimerReading),
    /// Timer phase change.
    TimerPhase(PhaseUpdate),
    /// Stop the on-screen countdown.
    FreezeTimer(FreezeUpdate),
    /// Continue the on-screen countdown.
    UnfreezeTimer(UnfreezeUpdate),
    /// Remove the question from screen.
    ClearQuestion,
    /// Switch to another screen.
    ChangeScreen(String),
    /// Play a named audio cue.
    TriggerAudio(String),
}

impl ServerEvent {
    /// Wire name of the event, for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DisplayQuestion(_) => "display-question",
            Self::RevealOptions => "reveal-options",
            Self::HighlightAnswer(_) => "highlight-answer",
            Self::MarkCorrect(_) => "mark-correct",
            Self::MarkWrong(_) => "mark-wrong",
            Self::UpdateTimer(_) => "update-timer",
            Self::CurrentTimer(_) => "current-timer",
            Self::TimerPhase(_) => "timer-phase",
            Self::FreezeTimer(_) => "freeze-timer",
            Self::UnfreezeTimer(_) => "unfreeze-timer",
            Self::ClearQuestion => "clear-question",
            Self::ChangeScreen(_) => "change-screen",
            Self::TriggerAudio(_) => "trigger-audio",
        }
    }

    /// Shorthand for a `timer-phase` event.
    pub const fn phase(phase: Phase) -> Self {
        Self::TimerPhase(PhaseUpdate { phase })
    }
}
