//! Registry of connected display and operator clients.
//!
//! Clients are added when their `WebSocket` opens and removed when it
//! closes. Fan-out uses a [`tokio::sync::broadcast`] channel, so
//! publishing never blocks the session lock; a client that falls more
//! than [`BROADCAST_CAPACITY`] batches behind is told it lagged and is
//! re-synchronized by the transport.

use quizshow_core::{Batch, Fanout};
use quizshow_types::ClientId;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the per-client batch backlog.
pub const BROADCAST_CAPACITY: usize = 256;

/// Connected-client registry and batch fan-out.
#[derive(Debug, Clone)]
pub struct SubscriberRegistry {
    tx: broadcast::Sender<Batch>,
}

impl SubscriberRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    /// Register a new client. It receives every batch published after
    /// this call.
    pub fn add(&self) -> Subscription {
        let subscription = Subscription {
            id: ClientId::new(),
            rx: self.tx.subscribe(),
        };
        debug!(client = %subscription.id, "Subscriber added");
        subscription
    }

    /// Unregister a client. Returns the number still connected.
    pub fn remove(&self, subscription: Subscription) -> usize {
        let id = subscription.id;
        drop(subscription);
        let remaining = self.connected();
        debug!(client = %id, remaining, "Subscriber removed");
        remaining
    }

    /// Number of connected clients.
    pub fn connected(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Fanout for SubscriberRegistry {
    fn publish(&self, batch: Batch) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no display is connected.
        self.tx.send(batch).unwrap_or(0)
    }
}

/// One registered client's view of the batch stream.
#[derive(Debug)]
pub struct Subscription {
    id: ClientId,
    rx: broadcast::Receiver<Batch>,
}

impl Subscription {
    /// The client's identifier.
    pub const fn id(&self) -> ClientId {
        self.id
    }

    /// Wait for the next batch.
    ///
    /// # Errors
    ///
    /// Returns [`broadcast::error::RecvError::Lagged`] if batches were
    /// dropped for this client, or `Closed` if the registry is gone.
    pub async fn recv(&mut self) -> Result<Batch, broadcast::error::RecvError> {
        self.rx.recv().await
    }
}
