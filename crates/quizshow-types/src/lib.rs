//! Shared type definitions for the Quizshow live display channel.
//!
//! Every type that crosses the transport lives here so the operator
//! console, the displays and the server agree on one shape. Types flow
//! to `TypeScript` via `ts-rs` for the display front-end.
//!
//! # Modules
//!
//! - [`ids`] -- Client identifier
//! - [`enums`] -- Timer values, phases, highlight kinds
//! - [`structs`] -- Question, highlight, status records
//! - [`protocol`] -- Inbound commands and outbound events

pub mod enums;
pub mod ids;
pub mod protocol;
pub mod structs;

pub use enums::{DEFAULT_TIMER_SECONDS, HighlightKind, Phase, Sentinel, TimerValue};
pub use ids::ClientId;
pub use protocol::{
    ClientCommand, FreezeUpdate, PhaseUpdate, ServerEvent, TimerReading, TimerUpdate,
    UnfreezeUpdate,
};
pub use structs::{Highlight, OPTION_COUNT, Question, QuestionDraft, ShowStatus};
