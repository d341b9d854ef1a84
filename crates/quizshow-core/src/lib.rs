//! Show session state, countdown timer, and broadcast synchronization for
//! the Quizshow live display channel.
//!
//! One operator console mutates a single show session; every display must
//! see the same question, highlight, screen and countdown, including
//! displays that join mid-show.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait with system and manual clocks.
//! - [`config`] -- Configuration loading from `quizshow-config.yaml`.
//! - [`timer`] -- Drift-free countdown state machine.
//! - [`session`] -- The show session record.
//! - [`sync`] -- Full resync, batch fan-out, tick throttling.
//! - [`router`] -- Command guards and dispatch.
//! - [`ticker`] -- Periodic refresh task.
//!
//! [`Clock`]: clock::Clock

pub mod clock;
pub mod config;
pub mod router;
pub mod session;
pub mod sync;
pub mod ticker;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ShowConfig};
pub use router::{Dispatch, EventRouter};
pub use session::Session;
pub use sync::{Batch, Fanout, NoOpFanout, Synchronizer, Throttle};
pub use ticker::{run_ticker, spawn_ticker};
pub use timer::{TimerEngine, TimerSnapshot, TimerState};
