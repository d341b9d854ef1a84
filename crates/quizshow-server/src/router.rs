//! Axum router construction.
//!
//! Assembles the `WebSocket` channel and the small REST surface into a
//! single [`Router`] with CORS enabled so browser displays served from
//! another origin can connect.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// - `GET /` -- liveness text
/// - `GET /ws` -- display/operator `WebSocket`
/// - `GET /api/status` -- current show status
/// - `POST /api/command` -- dispatch a single command
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws", get(ws::ws_show))
        .route("/api/status", get(handlers::status))
        .route("/api/command", post(handlers::command))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
