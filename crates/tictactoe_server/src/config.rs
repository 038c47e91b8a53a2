//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tictactoe_core::{MAX_DIMENSION, MIN_DIMENSION};
use tracing::{debug, info, instrument};

/// Configuration for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Board side length for games created without an explicit dimension.
    #[serde(default = "default_dimension")]
    default_dimension: usize,

    /// Name of the cookie carrying the session id.
    #[serde(default = "default_session_cookie")]
    session_cookie: String,

    /// Seconds a session may sit idle before its games are dropped.
    #[serde(default = "default_session_ttl_secs")]
    session_ttl_secs: u64,

    /// Upper bound on live sessions; the least recently seen is evicted.
    #[serde(default = "default_max_sessions")]
    max_sessions: usize,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    8080
}

#[instrument]
fn default_dimension() -> usize {
    tictactoe_core::DEFAULT_DIMENSION
}

#[instrument]
fn default_session_cookie() -> String {
    "TTTSESSIONID".to_string()
}

#[instrument]
fn default_session_ttl_secs() -> u64 {
    30 * 60
}

#[instrument]
fn default_max_sessions() -> usize {
    10_000
}

#[instrument]
fn default_log_filter() -> String {
    "info,tictactoe_server=debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_dimension: default_dimension(),
            session_cookie: default_session_cookie(),
            session_ttl_secs: default_session_ttl_secs(),
            max_sessions: default_max_sessions(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads from `path` when given, otherwise uses defaults.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                info!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Applies command-line overrides and re-validates.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        dimension: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(dimension) = dimension {
            self.default_dimension = dimension;
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks value ranges.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&self.default_dimension) {
            return Err(ConfigError::new(format!(
                "default_dimension must be within {}..={}, got {}",
                MIN_DIMENSION, MAX_DIMENSION, self.default_dimension
            )));
        }
        let cookie_ok = !self.session_cookie.is_empty()
            && self
                .session_cookie
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !cookie_ok {
            return Err(ConfigError::new(format!(
                "session_cookie must be a non-empty token of [A-Za-z0-9_-], got {:?}",
                self.session_cookie
            )));
        }
        if self.session_ttl_secs == 0 {
            return Err(ConfigError::new("session_ttl_secs must be positive".to_string()));
        }
        if self.max_sessions == 0 {
            return Err(ConfigError::new("max_sessions must be positive".to_string()));
        }
        Ok(())
    }

    /// Idle lifetime of a session.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Renders the configuration as TOML.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self)
            .map_err(|e| ConfigError::new(format!("Failed to render config: {}", e)))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
