//! Quizshow binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `quizshow-config.yaml` (or the path in
//!    `QUIZSHOW_CONFIG`), falling back to defaults
//! 2. Initialize structured logging (tracing)
//! 3. Build the show state on the system clock
//! 4. Spawn the periodic timer ticker
//! 5. Serve HTTP and `WebSocket` until `Ctrl-C`
//! 6. Stop the ticker and exit

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use quizshow_core::config::LoggingConfig;
use quizshow_core::{ShowConfig, SystemClock, spawn_ticker};
use quizshow_server::{AppState, ServerConfig, start_server};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const DEFAULT_CONFIG_PATH: &str = "quizshow-config.yaml";

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    let (config, source) = load_config()?;
    init_tracing(&config.logging);

    info!("quizshow starting");
    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "Configuration loaded"),
        ConfigSource::Defaults => info!("Config file not found, using defaults"),
    }
    info!(
        host = %config.server.host,
        port = config.server.port,
        default_duration = %config.timer.default_duration,
        tick_interval_ms = config.timer.tick_interval_ms,
        throttle_window_ms = config.timer.throttle_window_ms,
        "Show configured"
    );

    let state = Arc::new(AppState::new(&config, Arc::new(SystemClock)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = spawn_ticker(
        Arc::clone(&state.router),
        Duration::from_millis(config.timer.tick_interval_ms),
        shutdown_rx,
    );

    let server_config = ServerConfig::from(&config.server);
    let served = start_server(&server_config, state, async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        info!("Ctrl-C received, shutting down");
    })
    .await;

    // Stop the ticker whether the server exited cleanly or not.
    if shutdown_tx.send(true).is_err() {
        debug!("Ticker already stopped");
    }
    ticker.await.map_err(|e| EngineError::Ticker {
        message: e.to_string(),
    })?;

    served?;
    info!("quizshow stopped");
    Ok(())
}

/// Where the configuration came from. Logged once tracing is up.
enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Load configuration from `QUIZSHOW_CONFIG` or `quizshow-config.yaml`.
fn load_config() -> Result<(ShowConfig, ConfigSource), EngineError> {
    let explicit = std::env::var_os("QUIZSHOW_CONFIG").map(PathBuf::from);
    load_config_from(explicit, Path::new(DEFAULT_CONFIG_PATH))
}

/// An explicitly named file must exist; only the implicit `fallback` may
/// be absent, in which case defaults are used.
fn load_config_from(
    explicit: Option<PathBuf>,
    fallback: &Path,
) -> Result<(ShowConfig, ConfigSource), EngineError> {
    if let Some(path) = explicit {
        let config = ShowConfig::from_file(&path)?;
        return Ok((config, ConfigSource::File(path)));
    }
    if fallback.exists() {
        let config = ShowConfig::from_file(fallback)?;
        return Ok((config, ConfigSource::File(fallback.to_path_buf())));
    }
    let mut config = ShowConfig::default();
    config.server.apply_env_overrides();
    config.validate()?;
    Ok((config, ConfigSource::Defaults))
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
