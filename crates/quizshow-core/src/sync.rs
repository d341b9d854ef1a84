//! Broadcast synchronization: turning session state into outbound events.
//!
//! The [`Synchronizer`] produces two kinds of output:
//!
//! - a **full resync** for one client, returned to the caller so the
//!   transport can deliver it to exactly that client, and
//! - **batches** for every client, handed to a [`Fanout`].
//!
//! A batch is an ordered slice of events that every client receives as a
//! unit; batches never interleave.
//!
//! # Ordering
//!
//! A full resync always sends the question body before revealing options
//! or highlighting, so a display never paints a highlight against stale or
//! missing option text.
//!
//! # Throttling
//!
//! Routine periodic ticks are dropped if any broadcast went out less than
//! the throttle window ago. Forced updates (those that restart the
//! countdown soundtrack) are never throttled.

use std::sync::Arc;

use quizshow_types::{
    FreezeUpdate, Highlight, HighlightKind, Phase, ServerEvent, TimerReading, TimerUpdate,
    TimerValue, UnfreezeUpdate,
};
use tracing::debug;

use crate::session::Session;
use crate::timer::TimerEngine;

/// An ordered group of events delivered to every client as one unit.
pub type Batch = Arc<[ServerEvent]>;

/// Capability to publish a batch to all connected clients.
///
/// The transport owns the subscriber list; the core only needs to hand
/// batches to it.
pub trait Fanout: Send + Sync {
    /// Deliver `batch` to every connected client. Returns the number of
    /// clients it was queued for (0 when nobody is connected).
    fn publish(&self, batch: Batch) -> usize;
}

/// A fanout with no subscribers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpFanout;

impl Fanout for NoOpFanout {
    fn publish(&self, _batch: Batch) -> usize {
        0
    }
}

/// Minimum-interval gate for routine timer broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    window_ms: i64,
    last_broadcast_ms: Option<i64>,
}

impl Throttle {
    /// Create a throttle that suppresses routine updates closer than
    /// `window_ms` to the previous broadcast.
    pub const fn new(window_ms: i64) -> Self {
        Self {
            window_ms,
            last_broadcast_ms: None,
        }
    }

    /// Record that a broadcast went out at `now_ms`.
    pub const fn record(&mut self, now_ms: i64) {
        self.last_broadcast_ms = Some(now_ms);
    }

    /// Whether a routine update at `now_ms` may go out.
    pub fn admits_routine(&self, now_ms: i64) -> bool {
        self.last_broadcast_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.window_ms)
    }

    /// When the last broadcast went out.
    pub const fn last_broadcast_ms(&self) -> Option<i64> {
        self.last_broadcast_ms
    }
}

/// Builds outbound events from session state and publishes batches.
pub struct Synchronizer {
    fanout: Arc<dyn Fanout>,
    throttle: Throttle,
    track_last_second: u32,
}

impl core::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("throttle", &self.throttle)
            .field("track_last_second", &self.track_last_second)
            .finish_non_exhaustive()
    }
}

impl Synchronizer {
    /// Create a synchronizer publishing through `fanout`.
    ///
    /// `track_last_second` is the last second of the countdown soundtrack;
    /// the soundtrack seek position is `track_last_second - remaining`.
    pub fn new(fanout: Arc<dyn Fanout>, throttle_window_ms: i64, track_last_second: u32) -> Self {
        Self {
            fanout,
            throttle: Throttle::new(throttle_window_ms),
            track_last_second,
        }
    }

    /// The throttle state.
    pub const fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Soundtrack seek position for `remaining`, or `None` for unlimited.
    pub fn start_position(&self, remaining: TimerValue) -> Option<u32> {
        remaining
            .seconds()
            .map(|secs| self.track_last_second.saturating_sub(secs))
    }

    /// Resync for a client that may already be showing older state (a
    /// lagged subscriber or an explicit `request-sync`).
    ///
    /// Same as [`full_resync`](Self::full_resync), except that with no
    /// question loaded it opens with `clear-question` so a question the
    /// client missed the removal of does not stay on screen.
    pub fn recovery_resync(&self, session: &Session, now_ms: i64) -> Vec<ServerEvent> {
        let resync = self.full_resync(session, now_ms);
        if session.question().is_some() {
            return resync;
        }
        let mut events = Vec::with_capacity(resync.len().saturating_add(1));
        events.push(ServerEvent::ClearQuestion);
        events.extend(resync);
        events
    }

    /// Everything a newly connected client needs, in display order.
    ///
    /// With no question loaded only the screen and timer phase are sent.
    pub fn full_resync(&self, session: &Session, now_ms: i64) -> Vec<ServerEvent> {
        let mut events = Vec::new();

        if let Some(question) = session.question() {
            events.push(ServerEvent::DisplayQuestion(question.clone()));
            if question.show_options {
                events.push(ServerEvent::RevealOptions);
                events.extend(self.timer_events(session.timer(), now_ms, false, None));
            }
            if let Some(highlight) = session.highlight() {
                events.push(highlight_event(highlight));
            }
        }

        events.push(ServerEvent::ChangeScreen(session.screen().to_owned()));
        events.push(ServerEvent::phase(session.timer().phase()));
        events
    }

    /// Per-client timer snapshot: [`timer_readout`](Self::timer_readout)
    /// followed by a freeze or unfreeze marker matching the phase. Nothing
    /// is appended while stopped or unlimited.
    pub fn timer_events(
        &self,
        timer: &TimerEngine,
        now_ms: i64,
        audio_trigger: bool,
        start_position: Option<u32>,
    ) -> Vec<ServerEvent> {
        let mut events = self.timer_readout(timer, now_ms, audio_trigger, start_position);
        if timer.value().is_unlimited() {
            return events;
        }
        match timer.phase() {
            Phase::Stopped => {}
            Phase::Paused => events.push(ServerEvent::FreezeTimer(FreezeUpdate { audio: false })),
            Phase::Running => events.push(ServerEvent::UnfreezeTimer(UnfreezeUpdate {
                audio: false,
                audio_offset: None,
            })),
        }
        events
    }

    /// `update-timer` then `current-timer` for the timer at `now_ms`.
    ///
    /// `start_position` overrides the computed soundtrack seek position.
    /// No position is sent while stopped or unlimited.
    pub fn timer_readout(
        &self,
        timer: &TimerEngine,
        now_ms: i64,
        audio_trigger: bool,
        start_position: Option<u32>,
    ) -> Vec<ServerEvent> {
        let snapshot = timer.snapshot(now_ms);
        let position = if snapshot.phase == Phase::Stopped || snapshot.current.is_unlimited() {
            None
        } else {
            start_position.or_else(|| self.start_position(snapshot.current))
        };
        vec![
            ServerEvent::UpdateTimer(TimerUpdate {
                current: snapshot.current,
                max: snapshot.max,
                audio_trigger,
                start_position: position,
            }),
            ServerEvent::CurrentTimer(TimerReading {
                current: snapshot.current,
                max: snapshot.max,
            }),
        ]
    }

    /// Publish `events` to every client as one batch.
    ///
    /// Every broadcast counts against the throttle window. Empty input is
    /// not published.
    pub fn broadcast_all(&mut self, events: Vec<ServerEvent>, now_ms: i64) -> usize {
        if events.is_empty() {
            return 0;
        }
        self.throttle.record(now_ms);
        let batch: Batch = events.into();
        let first = batch.first().map_or("", ServerEvent::name);
        let recipients = self.fanout.publish(batch);
        debug!(first_event = first, recipients, "broadcast batch");
        recipients
    }

    /// Routine once-per-second refresh while the timer is running.
    ///
    /// Returns `true` if a batch was published; `false` when the timer is
    /// not running or the update was throttled.
    pub fn periodic_tick(&mut self, session: &Session, now_ms: i64) -> bool {
        if session.timer().phase() != Phase::Running {
            return false;
        }
        if !self.throttle.admits_routine(now_ms) {
            debug!("periodic tick throttled");
            return false;
        }
        let events = self.timer_events(session.timer(), now_ms, false, None);
        self.broadcast_all(events, now_ms);
        true
    }
}

/// The outbound event that reproduces `highlight` on a display.
pub const fn highlight_event(highlight: Highlight) -> ServerEvent {
    match highlight.kind {
        HighlightKind::Selected => ServerEvent::HighlightAnswer(highlight.index),
        HighlightKind::Correct => ServerEvent::MarkCorrect(highlight.index),
        HighlightKind::Wrong => ServerEvent::MarkWrong(highlight.index),
    }
}
