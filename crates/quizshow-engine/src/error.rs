//! Error types for the quizshow binary.

/// Top-level error for the binary.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: quizshow_core::ConfigError,
    },

    /// The HTTP server failed to start or crashed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: quizshow_server::ServerError,
    },

    /// The ticker task panicked or was cancelled.
    #[error("ticker error: {message}")]
    Ticker {
        /// Description of the ticker failure.
        message: String,
    },
}
