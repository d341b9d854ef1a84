//! HTTP handlers.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Liveness text |
//! | `GET` | `/api/status` | Current show status |
//! | `POST` | `/api/command` | Dispatch one command without a `WebSocket` |
//!
//! `POST /api/command` follows the same permissive policy as the socket:
//! a command whose guard fails returns `200` with `applied: false`. Only a
//! body that is not a command at all is rejected with `400`.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use quizshow_core::Dispatch;
use quizshow_types::{ClientCommand, ServerEvent, ShowStatus};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for `POST /api/command`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandResponse {
    /// Whether the command passed its guard.
    pub applied: bool,
    /// Clients the resulting batch was queued for.
    pub recipients: usize,
    /// Events addressed to the caller (only for `request-sync`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ServerEvent>,
}

/// `GET /`
///
/// One-line liveness text with the timer phase and client count.
pub async fn index(State(state): State<Arc<AppState>>) -> String {
    let status = state.status().await;
    format!(
        "quizshow is running: phase={:?}, screen={}, clients={}\n",
        status.phase, status.screen, status.connected_clients
    )
}

/// `GET /api/status`
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ShowStatus> {
    Json(state.status().await)
}

/// `POST /api/command`
pub async fn command(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClientCommand>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Json(command) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected HTTP command");
        ApiError::InvalidCommand(rejection.body_text())
    })?;

    let response = match state.dispatch(command).await {
        Dispatch::Ignored => CommandResponse {
            applied: false,
            recipients: 0,
            events: Vec::new(),
        },
        Dispatch::Broadcast { recipients } => CommandResponse {
            applied: true,
            recipients,
            events: Vec::new(),
        },
        Dispatch::Reply(events) => CommandResponse {
            applied: true,
            recipients: 0,
            events,
        },
    };
    Ok(Json(response))
}
