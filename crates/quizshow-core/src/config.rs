//! Configuration loading and typed config structures for Quizshow.
//!
//! The configuration lives in `quizshow-config.yaml` next to the binary's
//! working directory. Every field has a default, so the file is optional
//! and may be partial.

use std::path::Path;

use quizshow_types::TimerValue;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level show configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShowConfig {
    /// Listening address.
    #[serde(default)]
    pub server: ServerSettings,

    /// Countdown and broadcast cadence.
    #[serde(default)]
    pub timer: TimerConfig,

    /// Audio cue names and soundtrack geometry.
    #[serde(default)]
    pub audio: AudioConfig,

    /// Screen identifiers.
    #[serde(default)]
    pub screens: ScreenConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShowConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the listener:
    /// - `QUIZSHOW_HOST` overrides `server.host`
    /// - `QUIZSHOW_PORT` overrides `server.port` (ignored if not a port)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.server.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check values that would break the ticker or throttle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.tick_interval_ms < 100 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "timer.tick_interval_ms must be at least 100, got {}",
                    self.timer.tick_interval_ms
                ),
            });
        }
        if self.timer.throttle_window_ms > self.timer.tick_interval_ms {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "timer.throttle_window_ms ({}) must not exceed timer.tick_interval_ms ({})",
                    self.timer.throttle_window_ms, self.timer.tick_interval_ms
                ),
            });
        }
        if self.screens.initial.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "screens.initial must not be blank".to_owned(),
            });
        }
        Ok(())
    }
}

/// Listening address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("QUIZSHOW_HOST") {
            self.host = val;
        }
        if let Some(port) = std::env::var("QUIZSHOW_PORT")
            .ok()
            .and_then(|val| val.parse().ok())
        {
            self.port = port;
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Countdown and broadcast cadence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimerConfig {
    /// Countdown duration at startup (seconds or `"unlimited"`).
    #[serde(default)]
    pub default_duration: TimerValue,

    /// Period of the running-timer refresh broadcast.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Routine refreshes closer than this to the previous broadcast are
    /// dropped.
    #[serde(default = "default_throttle_window_ms")]
    pub throttle_window_ms: u64,
}

impl TimerConfig {
    /// Throttle window as signed milliseconds for timestamp math.
    pub fn throttle_window(&self) -> i64 {
        i64::try_from(self.throttle_window_ms).unwrap_or(i64::MAX)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration: TimerValue::default(),
            tick_interval_ms: default_tick_interval_ms(),
            throttle_window_ms: default_throttle_window_ms(),
        }
    }
}

/// Audio cue names and soundtrack geometry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AudioConfig {
    /// Last second of the countdown soundtrack; the seek position sent to
    /// displays is this minus the remaining seconds.
    #[serde(default = "default_track_last_second")]
    pub track_last_second: u32,

    /// Cue played when an answer is locked in.
    #[serde(default = "default_lock_cue")]
    pub lock_cue: String,

    /// Cue played when an answer is marked correct.
    #[serde(default = "default_correct_cue")]
    pub correct_cue: String,

    /// Cue played when an answer is marked wrong.
    #[serde(default = "default_wrong_cue")]
    pub wrong_cue: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            track_last_second: default_track_last_second(),
            lock_cue: default_lock_cue(),
            correct_cue: default_correct_cue(),
            wrong_cue: default_wrong_cue(),
        }
    }
}

/// Screen identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScreenConfig {
    /// Screen shown at startup.
    #[serde(default = "default_initial_screen")]
    pub initial: String,

    /// Accepted screen identifiers. Empty accepts any non-blank value.
    #[serde(default)]
    pub allowed: Vec<String>,
}

impl ScreenConfig {
    /// Whether `screen` may be set.
    pub fn accepts(&self, screen: &str) -> bool {
        if screen.trim().is_empty() {
            return false;
        }
        self.allowed.is_empty() || self.allowed.iter().any(|s| s == screen)
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            initial: default_initial_screen(),
            allowed: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    5000
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_throttle_window_ms() -> u64 {
    950
}

const fn default_track_last_second() -> u32 {
    59
}

fn default_lock_cue() -> String {
    String::from("lock")
}

fn default_correct_cue() -> String {
    String::from("correct")
}

fn default_wrong_cue() -> String {
    String::from("wrong")
}

fn default_initial_screen() -> String {
    String::from("logo")
}

fn default_log_level() -> String {
    String::from("info")
}
