//! `WebSocket` handler: one persistent duplex channel per client.
//!
//! On connect the client is registered and receives a full resync. After
//! that it receives every broadcast batch, and any text frame it sends is
//! parsed as a [`ClientCommand`]. Frames that do not parse are ignored.
//!
//! If a client falls behind the broadcast backlog it is re-registered and
//! sent a recovery resync instead of the batches it missed.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use quizshow_core::{Batch, Dispatch};
use quizshow_types::{ClientCommand, ClientId, ServerEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a show `WebSocket`.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_show(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Whichever side of the connection produced something first.
enum Step {
    Batch(Result<Batch, RecvError>),
    Inbound(Option<Result<Message, axum::Error>>),
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let (mut subscription, resync) = state.join().await;
    let mut client = subscription.id();
    info!(%client, connected = state.subscribers.connected(), "Client connected");

    if send_events(&mut socket, &resync).await.is_ok() {
        loop {
            let step = tokio::select! {
                result = subscription.recv() => Step::Batch(result),
                msg = socket.recv() => Step::Inbound(msg),
            };

            match step {
                Step::Batch(Ok(batch)) => {
                    if send_events(&mut socket, &batch).await.is_err() {
                        debug!(%client, "Client disconnected (send failed)");
                        break;
                    }
                }
                Step::Batch(Err(RecvError::Lagged(skipped))) => {
                    warn!(%client, skipped, "Client lagged, resynchronizing");
                    let (fresh, resync) = state.rejoin(subscription).await;
                    subscription = fresh;
                    client = subscription.id();
                    if send_events(&mut socket, &resync).await.is_err() {
                        break;
                    }
                }
                Step::Batch(Err(RecvError::Closed)) => {
                    debug!(%client, "Registry closed, shutting down socket");
                    break;
                }
                Step::Inbound(Some(Ok(Message::Text(text)))) => {
                    let Some(reply) = handle_text(&state, client, text.as_str()).await else {
                        continue;
                    };
                    if send_events(&mut socket, &reply).await.is_err() {
                        break;
                    }
                }
                Step::Inbound(Some(Ok(Message::Ping(data)))) => {
                    if socket.send(Message::Pong(data)).await.is_err() {
                        debug!(%client, "Client disconnected (pong failed)");
                        break;
                    }
                }
                Step::Inbound(Some(Ok(Message::Close(_))) | None) => break,
                Step::Inbound(Some(Err(e))) => {
                    debug!(%client, error = %e, "WebSocket error");
                    break;
                }
                Step::Inbound(Some(Ok(_))) => {
                    // Binary and pong frames carry no commands.
                }
            }
        }
    }

    let remaining = state.subscribers.remove(subscription);
    info!(%client, connected = remaining, "Client disconnected");
}

/// Parse and dispatch one text frame. Returns events addressed to the
/// sender, if any.
async fn handle_text(state: &AppState, client: ClientId, text: &str) -> Option<Vec<ServerEvent>> {
    let command: ClientCommand = match serde_json::from_str(text) {
        Ok(command) => command,
        Err(e) => {
            debug!(%client, error = %e, "Ignoring malformed command");
            return None;
        }
    };
    debug!(%client, command = command.name(), "Command received");

    match state.dispatch(command).await {
        Dispatch::Reply(events) => Some(events),
        Dispatch::Ignored | Dispatch::Broadcast { .. } => None,
    }
}

/// Send each event as its own JSON text frame, in order.
async fn send_events(socket: &mut WebSocket, events: &[ServerEvent]) -> Result<(), axum::Error> {
    for event in events {
        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                warn!(event = event.name(), "Failed to serialize event: {e}");
                continue;
            }
        };
        socket.send(Message::Text(json.into())).await?;
    }
    Ok(())
}
