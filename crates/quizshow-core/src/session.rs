//! The show session: question, highlight, screen and timer.
//!
//! [`Session`] is the single mutable record of the show. Each setter is an
//! atomic replace; nothing here broadcasts. Callers mutate first and then
//! hand the resulting state to the [`Synchronizer`](crate::sync::Synchronizer).

use quizshow_types::{Highlight, Question, TimerValue};

use crate::timer::TimerEngine;

/// Process-wide show state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    question: Option<Question>,
    highlight: Option<Highlight>,
    screen: String,
    timer: TimerEngine,
}

impl Session {
    /// Create an empty session showing `screen`, with the timer configured
    /// for `timer_value`.
    pub fn new(timer_value: TimerValue, screen: impl Into<String>) -> Self {
        Self {
            question: None,
            highlight: None,
            screen: screen.into(),
            timer: TimerEngine::new(timer_value),
        }
    }

    /// The loaded question, if any.
    pub const fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// Replace the loaded question.
    pub fn set_question(&mut self, question: Option<Question>) {
        self.question = question;
    }

    /// The highlighted option, if any.
    pub const fn highlight(&self) -> Option<Highlight> {
        self.highlight
    }

    /// Replace the highlighted option.
    pub const fn set_highlight(&mut self, highlight: Option<Highlight>) {
        self.highlight = highlight;
    }

    /// The active screen identifier.
    pub fn screen(&self) -> &str {
        &self.screen
    }

    /// Replace the active screen identifier.
    pub fn set_screen(&mut self, screen: String) {
        self.screen = screen;
    }

    /// The countdown timer.
    pub const fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    /// Mutable access to the countdown timer.
    pub const fn timer_mut(&mut self) -> &mut TimerEngine {
        &mut self.timer
    }

    /// Drop the question and highlight and stop the timer in one step.
    pub fn clear(&mut self) {
        self.question = None;
        self.highlight = None;
        self.timer.stop();
    }
}
