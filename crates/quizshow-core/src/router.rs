//! Event routing: operator commands in, state mutations and broadcasts out.
//!
//! [`EventRouter`] owns the [`Session`], the [`Synchronizer`] and the clock.
//! For every command it checks the guard against current state, applies
//! one session transition, and hands the resulting batch to the
//! synchronizer.
//!
//! # Validation policy
//!
//! Commands that fail their guard (blank question fields, out-of-range
//! index, timer already started, ...) are dropped without a reply and
//! without a broadcast. The operator console is trusted and small; a
//! dropped command is simply re-sent.

use std::sync::Arc;

use quizshow_types::{
    ClientCommand, FreezeUpdate, Highlight, HighlightKind, OPTION_COUNT, Phase, Question,
    QuestionDraft, ServerEvent, ShowStatus, TimerUpdate, TimerValue, UnfreezeUpdate,
};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::{AudioConfig, ScreenConfig, ShowConfig};
use crate::session::Session;
use crate::sync::{Fanout, Synchronizer};

/// What happened to a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The guard failed; nothing changed and nothing was sent.
    Ignored,
    /// State changed and a batch went to every client.
    Broadcast {
        /// Number of clients the batch was queued for.
        recipients: usize,
    },
    /// Events for the sender only.
    Reply(Vec<ServerEvent>),
}

/// Dispatches commands against the show session.
#[derive(Debug)]
pub struct EventRouter {
    session: Session,
    sync: Synchronizer,
    clock: Arc<dyn Clock>,
    audio: AudioConfig,
    screens: ScreenConfig,
}

impl EventRouter {
    /// Build a router with a fresh session from `config`.
    pub fn new(config: &ShowConfig, clock: Arc<dyn Clock>, fanout: Arc<dyn Fanout>) -> Self {
        Self {
            session: Session::new(config.timer.default_duration, config.screens.initial.clone()),
            sync: Synchronizer::new(
                fanout,
                config.timer.throttle_window(),
                config.audio.track_last_second,
            ),
            clock,
            audio: config.audio.clone(),
            screens: config.screens.clone(),
        }
    }

    /// Read-only view of the session.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Full resync for one newly connected client.
    pub fn full_resync(&self) -> Vec<ServerEvent> {
        self.sync.full_resync(&self.session, self.clock.now_ms())
    }

    /// Resync for a client that may hold stale state.
    pub fn recovery_resync(&self) -> Vec<ServerEvent> {
        self.sync.recovery_resync(&self.session, self.clock.now_ms())
    }

    /// Routine refresh, called by the ticker. Returns `true` if a batch
    /// went out.
    pub fn periodic_tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.sync.periodic_tick(&self.session, now)
    }

    /// Status snapshot for the HTTP status endpoint.
    pub fn status(&self, connected_clients: usize) -> ShowStatus {
        let snapshot = self.session.timer().snapshot(self.clock.now_ms());
        ShowStatus {
            phase: snapshot.phase,
            current: snapshot.current,
            max: snapshot.max,
            screen: self.session.screen().to_owned(),
            has_question: self.session.question().is_some(),
            show_options: self.session.question().is_some_and(|q| q.show_options),
            highlight: self.session.highlight(),
            connected_clients,
        }
    }

    /// Validate and apply one command.
    pub fn dispatch(&mut self, command: ClientCommand) -> Dispatch {
        let name = command.name();
        let now = self.clock.now_ms();

        let events = match command {
            ClientCommand::RequestSync => {
                return Dispatch::Reply(self.sync.recovery_resync(&self.session, now));
            }
            ClientCommand::SetQuestion(draft) => self.set_question(draft),
            ClientCommand::RevealOptions => self.reveal_options(now),
            ClientCommand::PickAnswer(index) => self.pick_answer(index, now),
            ClientCommand::MarkCorrect(index) => self.mark(index, HighlightKind::Correct),
            ClientCommand::MarkWrong(index) => self.mark(index, HighlightKind::Wrong),
            ClientCommand::ResetTimer => self.reset_timer(),
            ClientCommand::SetTimerDuration(value) => self.set_timer_duration(value),
            ClientCommand::PauseTimer => self.pause(now, true),
            ClientCommand::FreezeTimer => self.pause(now, false),
            ClientCommand::ResumeTimer => self.resume(now),
            ClientCommand::RemoveQuestion => Some(self.remove_question()),
            ClientCommand::PlayAudio(cue) => Some(vec![ServerEvent::TriggerAudio(cue)]),
            ClientCommand::SetScreen(screen) => self.set_screen(screen),
        };

        let Some(events) = events else {
            debug!(command = name, "command ignored");
            return Dispatch::Ignored;
        };
        let recipients = self.sync.broadcast_all(events, now);
        info!(command = name, recipients, phase = ?self.session.timer().phase(), "command applied");
        Dispatch::Broadcast { recipients }
    }

    // -----------------------------------------------------------------------
    // Question
    // -----------------------------------------------------------------------

    fn set_question(&mut self, draft: QuestionDraft) -> Option<Vec<ServerEvent>> {
        let (text, options) = validate_draft(draft)?;
        let phase = self.session.timer().phase();
        let duration = self.session.timer().value();

        let question = if phase.is_started() {
            // Live edit: keep the countdown and reveal state.
            let current = self.session.question()?;
            Question {
                text,
                options,
                ..current.clone()
            }
        } else {
            self.session.set_highlight(None);
            Question {
                text,
                options,
                timer: duration,
                max_timer: duration,
                show_options: false,
            }
        };

        self.session.set_question(Some(question.clone()));
        Some(vec![
            ServerEvent::DisplayQuestion(question),
            ServerEvent::phase(phase),
        ])
    }

    fn reveal_options(&mut self, now: i64) -> Option<Vec<ServerEvent>> {
        if self.session.timer().phase().is_started() {
            return None;
        }
        let mut question = self.session.question()?.clone();
        question.show_options = true;
        self.session.set_question(Some(question));

        let timer = self.session.timer_mut();
        let duration = timer.value();
        timer.start(duration, now);
        let current = timer.remaining(now);
        let max = timer.max();

        Some(vec![
            ServerEvent::RevealOptions,
            ServerEvent::UpdateTimer(TimerUpdate {
                current,
                max,
                audio_trigger: true,
                start_position: self.sync.start_position(current),
            }),
            ServerEvent::phase(Phase::Running),
        ])
    }

    fn remove_question(&mut self) -> Vec<ServerEvent> {
        self.session.clear();
        vec![ServerEvent::ClearQuestion, ServerEvent::phase(Phase::Stopped)]
    }

    // -----------------------------------------------------------------------
    // Highlight
    // -----------------------------------------------------------------------

    fn pick_answer(&mut self, index: i32, now: i64) -> Option<Vec<ServerEvent>> {
        let index = self.highlight(index, HighlightKind::Selected)?;
        let mut events = vec![
            ServerEvent::HighlightAnswer(index),
            ServerEvent::TriggerAudio(self.audio.lock_cue.clone()),
        ];
        // Locking in an answer stops the clock.
        if self.session.timer_mut().pause(now).is_some() {
            events.push(ServerEvent::FreezeTimer(FreezeUpdate { audio: false }));
            events.push(ServerEvent::phase(Phase::Paused));
        }
        Some(events)
    }

    fn mark(&mut self, index: i32, kind: HighlightKind) -> Option<Vec<ServerEvent>> {
        let index = self.highlight(index, kind)?;
        let (event, cue) = match kind {
            HighlightKind::Correct => (ServerEvent::MarkCorrect(index), &self.audio.correct_cue),
            HighlightKind::Wrong => (ServerEvent::MarkWrong(index), &self.audio.wrong_cue),
            HighlightKind::Selected => (ServerEvent::HighlightAnswer(index), &self.audio.lock_cue),
        };
        Some(vec![event, ServerEvent::TriggerAudio(cue.clone())])
    }

    /// Set the highlight if a question is loaded and `index` names one of
    /// its options. Returns the accepted index.
    fn highlight(&mut self, index: i32, kind: HighlightKind) -> Option<usize> {
        let index = usize::try_from(index).ok()?;
        if self.session.question().is_none() || index >= OPTION_COUNT {
            return None;
        }
        self.session.set_highlight(Some(Highlight { index, kind }));
        Some(index)
    }

    // -----------------------------------------------------------------------
    // Timer
    // -----------------------------------------------------------------------

    fn reset_timer(&mut self) -> Option<Vec<ServerEvent>> {
        if !self.session.timer_mut().reset() {
            return None;
        }
        Some(vec![self.stopped_timer_update()])
    }

    fn set_timer_duration(&mut self, value: TimerValue) -> Option<Vec<ServerEvent>> {
        if !self.session.timer_mut().reconfigure(value) {
            return None;
        }
        Some(vec![self.stopped_timer_update()])
    }

    fn stopped_timer_update(&self) -> ServerEvent {
        let timer = self.session.timer();
        ServerEvent::UpdateTimer(TimerUpdate {
            current: timer.value(),
            max: timer.max(),
            audio_trigger: false,
            start_position: None,
        })
    }

    fn pause(&mut self, now: i64, audio: bool) -> Option<Vec<ServerEvent>> {
        self.session.timer_mut().pause(now)?;
        Some(vec![
            ServerEvent::FreezeTimer(FreezeUpdate { audio }),
            ServerEvent::phase(Phase::Paused),
        ])
    }

    fn resume(&mut self, now: i64) -> Option<Vec<ServerEvent>> {
        let remaining = self.session.timer_mut().resume(now)?;
        let offset = self.sync.start_position(remaining);

        let mut events = vec![ServerEvent::UnfreezeTimer(UnfreezeUpdate {
            audio: true,
            audio_offset: offset,
        })];
        events.extend(
            self.sync
                .timer_readout(self.session.timer(), now, true, offset),
        );
        events.push(ServerEvent::phase(Phase::Running));
        Some(events)
    }

    // -----------------------------------------------------------------------
    // Screen
    // -----------------------------------------------------------------------

    fn set_screen(&mut self, screen: String) -> Option<Vec<ServerEvent>> {
        if !self.screens.accepts(&screen) {
            return None;
        }
        self.session.set_screen(screen.clone());
        Some(vec![ServerEvent::ChangeScreen(screen)])
    }
}

/// Accept a draft only if the text and all [`OPTION_COUNT`] options are
/// non-blank.
fn validate_draft(draft: QuestionDraft) -> Option<(String, [String; OPTION_COUNT])> {
    if draft.text.trim().is_empty() || draft.options.iter().any(|o| o.trim().is_empty()) {
        return None;
    }
    let options: [String; OPTION_COUNT] = draft.options.try_into().ok()?;
    Some((draft.text, options))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use quizshow_types::TimerReading;

    use super::*;
    use crate::clock::ManualClock;
    use crate::sync::tests::RecordingFanout;

    const T0: i64 = 1_700_000_000_000;

    struct Harness {
        router: EventRouter,
        clock: Arc<ManualClock>,
        fanout: Arc<RecordingFanout>,
    }

    fn harness_with(config: &ShowConfig) -> Harness {
        let clock = Arc::new(ManualClock::new(T0));
        let fanout = Arc::new(RecordingFanout::default());
        let router = EventRouter::new(
            config,
            Arc::clone(&clock) as Arc<dyn Clock>,
            Arc::clone(&fanout) as Arc<dyn Fanout>,
        );
        Harness {
            router,
            clock,
            fanout,
        }
    }

    fn harness() -> Harness {
        harness_with(&ShowConfig::default())
    }

    fn draft(text: &str, options: [&str; 4]) -> ClientCommand {
        ClientCommand::SetQuestion(QuestionDraft {
            text: text.to_owned(),
            options: options.iter().map(|o| (*o).to_owned()).collect(),
        })
    }

    fn capital_question() -> ClientCommand {
        draft("Capital of Peru?", ["Lima", "Quito", "Bogota", "La Paz"])
    }

    fn names(batch: &[ServerEvent]) -> Vec<&'static str> {
        batch.iter().map(ServerEvent::name).collect()
    }

    #[test]
    fn blank_option_is_ignored() {
        let mut h = harness();
        let before = h.router.session().clone();

        let result = h.router.dispatch(draft("Q?", ["a", " ", "c", "d"]));

        assert_eq!(result, Dispatch::Ignored);
        assert_eq!(h.router.session(), &before);
        assert!(h.fanout.batches().is_empty());
    }

    #[test]
    fn blank_text_and_wrong_option_count_are_ignored() {
        let mut h = harness();
        assert_eq!(h.router.dispatch(draft("  ", ["a", "b", "c", "d"])), Dispatch::Ignored);
        let three = ClientCommand::SetQuestion(QuestionDraft {
            text: String::from("Q?"),
            options: vec![String::from("a"), String::from("b"), String::from("c")],
        });
        assert_eq!(h.router.dispatch(three), Dispatch::Ignored);
        assert!(h.fanout.batches().is_empty());
    }

    #[test]
    fn set_question_broadcasts_body_and_phase() {
        let mut h = harness();
        assert_eq!(
            h.router.dispatch(capital_question()),
            Dispatch::Broadcast { recipients: 1 }
        );

        let question = h.router.session().question().unwrap();
        assert_eq!(question.text, "Capital of Peru?");
        assert_eq!(question.timer, TimerValue::Seconds(30));
        assert!(!question.show_options);

        let batches = h.fanout.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(names(&batches[0]), ["display-question", "timer-phase"]);
    }

    #[test]
    fn pick_answer_highlights_and_survives_resync() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.fanout.take();

        assert_eq!(
            h.router.dispatch(ClientCommand::PickAnswer(2)),
            Dispatch::Broadcast { recipients: 1 }
        );
        assert_eq!(
            h.router.session().highlight(),
            Some(Highlight {
                index: 2,
                kind: HighlightKind::Selected,
            })
        );
        let batches = h.fanout.take();
        assert_eq!(
            batches[0],
            vec![
                ServerEvent::HighlightAnswer(2),
                ServerEvent::TriggerAudio(String::from("lock")),
            ]
        );

        let resync = h.router.full_resync();
        assert!(resync.contains(&ServerEvent::HighlightAnswer(2)));
        let question_at = resync.iter().position(|e| e.name() == "display-question");
        let highlight_at = resync.iter().position(|e| e.name() == "highlight-answer");
        assert!(question_at < highlight_at);
    }

    #[test]
    fn pick_answer_freezes_a_running_timer() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::RevealOptions);
        h.clock.advance_secs(7);
        h.fanout.take();

        h.router.dispatch(ClientCommand::PickAnswer(0));

        assert_eq!(h.router.session().timer().phase(), Phase::Paused);
        assert_eq!(h.router.session().timer().remaining(h.clock.now_ms()), TimerValue::Seconds(23));
        assert_eq!(
            names(&h.fanout.take()[0]),
            ["highlight-answer", "trigger-audio", "freeze-timer", "timer-phase"]
        );
    }

    #[test]
    fn out_of_range_or_questionless_marks_are_ignored() {
        let mut h = harness();
        assert_eq!(h.router.dispatch(ClientCommand::MarkCorrect(1)), Dispatch::Ignored);

        h.router.dispatch(capital_question());
        assert_eq!(h.router.dispatch(ClientCommand::MarkWrong(4)), Dispatch::Ignored);
        assert_eq!(h.router.dispatch(ClientCommand::PickAnswer(i32::MAX)), Dispatch::Ignored);
        assert_eq!(h.router.dispatch(ClientCommand::PickAnswer(-1)), Dispatch::Ignored);
        assert_eq!(h.router.dispatch(ClientCommand::MarkCorrect(-3)), Dispatch::Ignored);
        assert_eq!(h.fanout.batches().len(), 1);
        assert!(h.router.session().highlight().is_none());
    }

    #[test]
    fn marks_replace_previous_highlight() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::PickAnswer(1));
        h.router.dispatch(ClientCommand::MarkWrong(1));
        h.fanout.take();
        h.router.dispatch(ClientCommand::MarkCorrect(0));

        assert_eq!(
            h.router.session().highlight(),
            Some(Highlight {
                index: 0,
                kind: HighlightKind::Correct,
            })
        );
        assert_eq!(
            h.fanout.take()[0],
            vec![
                ServerEvent::MarkCorrect(0),
                ServerEvent::TriggerAudio(String::from("correct")),
            ]
        );
    }

    #[test]
    fn duration_then_reveal_then_ten_seconds() {
        let mut h = harness();
        h.router.dispatch(ClientCommand::SetTimerDuration(TimerValue::Seconds(45)));
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::RevealOptions);
        h.clock.advance_secs(10);

        let timer = h.router.session().timer();
        assert_eq!(timer.remaining(h.clock.now_ms()), TimerValue::Seconds(35));
        assert_eq!(timer.max(), TimerValue::Seconds(45));
    }

    #[test]
    fn reveal_starts_timer_with_forced_update() {
        let mut h = harness();
        assert_eq!(h.router.dispatch(ClientCommand::RevealOptions), Dispatch::Ignored);

        h.router.dispatch(capital_question());
        h.fanout.take();
        h.router.dispatch(ClientCommand::RevealOptions);

        assert!(h.router.session().question().unwrap().show_options);
        assert_eq!(
            h.fanout.take()[0],
            vec![
                ServerEvent::RevealOptions,
                ServerEvent::UpdateTimer(TimerUpdate {
                    current: TimerValue::Seconds(30),
                    max: TimerValue::Seconds(30),
                    audio_trigger: true,
                    start_position: Some(29),
                }),
                ServerEvent::phase(Phase::Running),
            ]
        );

        // A second reveal cannot restart the countdown.
        h.clock.advance_secs(3);
        assert_eq!(h.router.dispatch(ClientCommand::RevealOptions), Dispatch::Ignored);
    }

    #[test]
    fn duration_and_reset_rejected_once_started() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::RevealOptions);
        let before = h.router.session().clone();

        assert_eq!(
            h.router.dispatch(ClientCommand::SetTimerDuration(TimerValue::Seconds(10))),
            Dispatch::Ignored
        );
        assert_eq!(h.router.dispatch(ClientCommand::ResetTimer), Dispatch::Ignored);
        h.router.dispatch(ClientCommand::PauseTimer);
        assert_eq!(
            h.router.dispatch(ClientCommand::SetTimerDuration(TimerValue::Seconds(10))),
            Dispatch::Ignored
        );
        assert_eq!(h.router.session().timer().value(), before.timer().value());
    }

    #[test]
    fn reset_and_duration_broadcast_stopped_update() {
        let mut h = harness();
        h.router.dispatch(ClientCommand::SetTimerDuration(TimerValue::UNLIMITED));
        h.router.dispatch(ClientCommand::ResetTimer);

        let expected = vec![ServerEvent::UpdateTimer(TimerUpdate {
            current: TimerValue::UNLIMITED,
            max: TimerValue::UNLIMITED,
            audio_trigger: false,
            start_position: None,
        })];
        assert_eq!(h.fanout.batches(), vec![expected.clone(), expected]);
    }

    #[test]
    fn pause_and_resume_guards_and_events() {
        let mut h = harness();
        assert_eq!(h.router.dispatch(ClientCommand::PauseTimer), Dispatch::Ignored);
        assert_eq!(h.router.dispatch(ClientCommand::ResumeTimer), Dispatch::Ignored);

        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::RevealOptions);
        assert_eq!(h.router.dispatch(ClientCommand::ResumeTimer), Dispatch::Ignored);

        h.clock.advance_ms(12_300);
        h.fanout.take();
        h.router.dispatch(ClientCommand::PauseTimer);
        assert_eq!(
            h.fanout.take()[0],
            vec![
                ServerEvent::FreezeTimer(FreezeUpdate { audio: true }),
                ServerEvent::phase(Phase::Paused),
            ]
        );
        assert_eq!(h.router.dispatch(ClientCommand::FreezeTimer), Dispatch::Ignored);

        // A long break must not eat into the countdown.
        h.clock.advance_secs(300);
        h.router.dispatch(ClientCommand::ResumeTimer);
        assert_eq!(
            h.fanout.take()[0],
            vec![
                ServerEvent::UnfreezeTimer(UnfreezeUpdate {
                    audio: true,
                    audio_offset: Some(41),
                }),
                ServerEvent::UpdateTimer(TimerUpdate {
                    current: TimerValue::Seconds(18),
                    max: TimerValue::Seconds(30),
                    audio_trigger: true,
                    start_position: Some(41),
                }),
                ServerEvent::CurrentTimer(TimerReading {
                    current: TimerValue::Seconds(18),
                    max: TimerValue::Seconds(30),
                }),
                ServerEvent::phase(Phase::Running),
            ]
        );
    }

    #[test]
    fn freeze_is_a_silent_pause() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::RevealOptions);
        h.fanout.take();

        h.router.dispatch(ClientCommand::FreezeTimer);
        assert_eq!(
            h.fanout.take()[0],
            vec![
                ServerEvent::FreezeTimer(FreezeUpdate { audio: false }),
                ServerEvent::phase(Phase::Paused),
            ]
        );
    }

    #[test]
    fn live_edit_keeps_countdown_and_highlight() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::RevealOptions);
        h.router.dispatch(ClientCommand::MarkWrong(3));
        h.clock.advance_secs(5);

        h.router
            .dispatch(draft("Capital of Peru (typo fixed)?", ["Lima", "Quito", "Bogota", "Sucre"]));

        let session = h.router.session();
        let question = session.question().unwrap();
        assert_eq!(question.text, "Capital of Peru (typo fixed)?");
        assert!(question.show_options);
        assert_eq!(session.timer().phase(), Phase::Running);
        assert_eq!(session.timer().remaining(h.clock.now_ms()), TimerValue::Seconds(25));
        assert!(session.highlight().is_some());
    }

    #[test]
    fn new_question_while_stopped_clears_highlight() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::MarkCorrect(0));
        h.router.dispatch(draft("Next?", ["1", "2", "3", "4"]));

        assert!(h.router.session().highlight().is_none());
        assert_eq!(h.router.session().question().unwrap().text, "Next?");
    }

    #[test]
    fn remove_question_clears_in_one_batch() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::RevealOptions);
        h.router.dispatch(ClientCommand::PickAnswer(1));
        h.fanout.take();

        h.router.dispatch(ClientCommand::RemoveQuestion);

        let session = h.router.session();
        assert!(session.question().is_none());
        assert!(session.highlight().is_none());
        assert_eq!(session.timer().phase(), Phase::Stopped);
        assert_eq!(
            h.fanout.take(),
            vec![vec![ServerEvent::ClearQuestion, ServerEvent::phase(Phase::Stopped)]]
        );
    }

    #[test]
    fn request_sync_replies_without_broadcast() {
        let mut h = harness();
        let reply = h.router.dispatch(ClientCommand::RequestSync);
        assert_eq!(
            reply,
            Dispatch::Reply(vec![
                ServerEvent::ClearQuestion,
                ServerEvent::ChangeScreen(String::from("logo")),
                ServerEvent::phase(Phase::Stopped),
            ])
        );
        assert!(h.fanout.batches().is_empty());

        h.router.dispatch(capital_question());
        let reply = h.router.dispatch(ClientCommand::RequestSync);
        assert!(matches!(
            &reply,
            Dispatch::Reply(events)
                if matches!(events.first(), Some(ServerEvent::DisplayQuestion(_)))
                    && !events.contains(&ServerEvent::ClearQuestion)
        ));
    }

    #[test]
    fn play_audio_and_set_screen_broadcast() {
        let mut h = harness();
        h.router.dispatch(ClientCommand::PlayAudio(String::from("applause")));
        h.router.dispatch(ClientCommand::SetScreen(String::from("leaderboard")));
        assert_eq!(h.router.session().screen(), "leaderboard");
        assert_eq!(
            h.fanout.take(),
            vec![
                vec![ServerEvent::TriggerAudio(String::from("applause"))],
                vec![ServerEvent::ChangeScreen(String::from("leaderboard"))],
            ]
        );
    }

    #[test]
    fn screen_allow_list_is_enforced() {
        let mut config = ShowConfig::default();
        config.screens.allowed = vec![String::from("logo"), String::from("question")];
        let mut h = harness_with(&config);

        assert_eq!(
            h.router.dispatch(ClientCommand::SetScreen(String::from("credits"))),
            Dispatch::Ignored
        );
        assert_eq!(h.router.dispatch(ClientCommand::SetScreen(String::new())), Dispatch::Ignored);
        assert_eq!(h.router.session().screen(), "logo");
    }

    #[test]
    fn ticks_are_throttled_after_command_broadcasts() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::RevealOptions);
        h.fanout.take();

        h.clock.advance_ms(500);
        assert!(!h.router.periodic_tick());
        h.clock.advance_ms(500);
        assert!(h.router.periodic_tick());

        let batches = h.fanout.take();
        assert_eq!(names(&batches[0]), ["update-timer", "current-timer", "unfreeze-timer"]);
    }

    #[test]
    fn status_reflects_session() {
        let mut h = harness();
        h.router.dispatch(capital_question());
        h.router.dispatch(ClientCommand::RevealOptions);
        h.clock.advance_secs(4);

        let status = h.router.status(3);
        assert_eq!(status.phase, Phase::Running);
        assert_eq!(status.current, TimerValue::Seconds(26));
        assert!(status.has_question);
        assert!(status.show_options);
        assert_eq!(status.connected_clients, 3);
    }
}
