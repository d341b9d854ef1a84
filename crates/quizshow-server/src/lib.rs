//! Transport for the quiz show control channel.
//!
//! This crate exposes the show over HTTP:
//!
//! - **`WebSocket` endpoint** (`/ws`) shared by operator panels and
//!   audience displays. Every connection gets a full resync on join and
//!   then every broadcast batch, in order.
//! - **REST endpoints** for status (`/api/status`) and one-shot commands
//!   (`/api/command`).
//!
//! # Architecture
//!
//! All state lives in one [`EventRouter`](quizshow_core::EventRouter)
//! behind a single async mutex in [`AppState`]. The router publishes
//! batches through the [`SubscriberRegistry`], a
//! [`tokio::sync::broadcast`] channel, so a slow socket never holds the
//! lock.

pub mod error;
pub mod handlers;
pub mod registry;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use registry::{SubscriberRegistry, Subscription};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
