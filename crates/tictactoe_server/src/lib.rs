//! Tic-tac-toe server library - session-scoped game storage over REST
//!
//! # Architecture
//!
//! - **Store**: per-session map of game id to game, plus the session registry
//! - **Api**: axum router for `/api/v1.0/game`, cookie sessions, error payloads
//! - **Config**: TOML configuration with command-line overrides
//!
//! Game rules and transition validation live in [`tictactoe_core`].
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_server::{AppState, ServerConfig, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let app = router(AppState::from_config(config));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod config;
mod error;
mod store;

// Crate-level exports - REST interface
pub use api::{
    ApiError, AppState, ClientSession, CreateParams, ErrorMessage, GAME_PATH, SessionCookie,
    cookie_value, create_game, delete_game, get_game, router, update_game,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Errors
pub use error::{StoreError, StoreErrorKind};

// Crate-level exports - Session storage
pub use store::{ALL_GAMES, Attached, GameStore, Lookup, SessionId, SessionManager};
