//! Error types for the HTTP API.
//!
//! [`ApiError`] converts into an Axum response with a JSON body of the
//! form `{"error": ..., "status": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors surfaced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was not a recognizable command.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidCommand(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
