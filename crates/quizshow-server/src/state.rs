//! Shared application state for the transport.
//!
//! [`AppState`] pairs the [`EventRouter`] (behind one async mutex, so every
//! command, tick and join is serialized) with the [`SubscriberRegistry`]
//! that the router publishes through.

use std::sync::Arc;

use quizshow_core::{Clock, Dispatch, EventRouter, Fanout, ShowConfig};
use quizshow_types::{ClientCommand, ServerEvent, ShowStatus};
use tokio::sync::Mutex;

use crate::registry::{SubscriberRegistry, Subscription};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The show, behind the single-writer lock.
    pub router: Arc<Mutex<EventRouter>>,
    /// Connected clients.
    pub subscribers: SubscriberRegistry,
}

impl AppState {
    /// Create the show from configuration.
    pub fn new(config: &ShowConfig, clock: Arc<dyn Clock>) -> Self {
        let subscribers = SubscriberRegistry::new();
        let fanout: Arc<dyn Fanout> = Arc::new(subscribers.clone());
        let router = EventRouter::new(config, clock, fanout);
        Self {
            router: Arc::new(Mutex::new(router)),
            subscribers,
        }
    }

    /// Register a client and build its full resync.
    ///
    /// Both happen under the router lock, so no batch can be published
    /// between the snapshot and the subscription.
    pub async fn join(&self) -> (Subscription, Vec<ServerEvent>) {
        let router = self.router.lock().await;
        let subscription = self.subscribers.add();
        let resync = router.full_resync();
        (subscription, resync)
    }

    /// Replace a lagged subscription with a fresh one and build a
    /// recovery resync for it, under the router lock.
    ///
    /// The client already painted some older state, so the resync clears
    /// a question it may have missed the removal of.
    pub async fn rejoin(&self, stale: Subscription) -> (Subscription, Vec<ServerEvent>) {
        let router = self.router.lock().await;
        self.subscribers.remove(stale);
        let subscription = self.subscribers.add();
        let resync = router.recovery_resync();
        (subscription, resync)
    }

    /// Apply one command.
    pub async fn dispatch(&self, command: ClientCommand) -> Dispatch {
        self.router.lock().await.dispatch(command)
    }

    /// Current status snapshot.
    pub async fn status(&self) -> ShowStatus {
        let connected = self.subscribers.connected();
        self.router.lock().await.status(connected)
    }
}
