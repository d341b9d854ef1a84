//! Core show state records and the status projection.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{HighlightKind, Phase, TimerValue};

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// The question currently on display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Question {
    /// Question body.
    pub text: String,
    /// Answer options, in display order.
    pub options: [String; OPTION_COUNT],
    /// Timer duration configured when the question was set.
    pub timer: TimerValue,
    /// Timer maximum configured when the question was set.
    pub max_timer: TimerValue,
    /// Whether the answer options have been revealed.
    pub show_options: bool,
}

/// Operator-submitted question before validation.
///
/// Missing fields deserialize as empty so that malformed payloads reach
/// the router and are dropped there rather than failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestionDraft {
    /// Question body.
    #[serde(default)]
    pub text: String,
    /// Answer options; exactly [`OPTION_COUNT`] non-blank entries are accepted.
    #[serde(default)]
    pub options: Vec<String>,
}

/// One highlighted answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Highlight {
    /// Zero-based option index.
    pub index: usize,
    /// How the option is marked.
    pub kind: HighlightKind,
}

/// Point-in-time view of the show served by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ShowStatus {
    /// Current timer phase.
    pub phase: Phase,
    /// Remaining time right now.
    pub current: TimerValue,
    /// Maximum time of the active countdown.
    pub max: TimerValue,
    /// Active screen identifier.
    pub screen: String,
    /// Whether a question is loaded.
    pub has_question: bool,
    /// Whether the loaded question's options are revealed.
    pub show_options: bool,
    /// The highlighted option, if any.
    pub highlight: Option<Highlight>,
    /// Number of connected transport clients.
    pub connected_clients: usize,
}
