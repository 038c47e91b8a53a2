//! REST interface for the game resource.

mod error;
mod handlers;
mod session;

pub use error::{ApiError, ErrorMessage};
pub use handlers::{CreateParams, create_game, delete_game, get_game, update_game};
pub use session::{ClientSession, SessionCookie, cookie_value};

use crate::config::ServerConfig;
use crate::store::SessionManager;
use axum::{
    Router,
    extract::Request,
    response::Response,
    routing::{get, post},
};
use derive_new::new;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{debug, info};

/// Base path of the game resource.
pub const GAME_PATH: &str = "/api/v1.0/game";

/// Shared application state.
#[derive(Debug, Clone, new)]
pub struct AppState {
    /// All client sessions.
    pub sessions: SessionManager,
    /// Effective configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Builds state from configuration.
    pub fn from_config(config: ServerConfig) -> Self {
        let sessions = SessionManager::new(config.session_ttl(), *config.max_sessions());
        Self::new(sessions, Arc::new(config))
    }
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(GAME_PATH, post(create_game))
        .route(
            &format!("{GAME_PATH}/{{id}}"),
            get(get_game).put(update_game).delete(delete_game),
        )
        .layer(
            ServiceBuilder::new()
                .map_request(log_request)
                .map_response(log_response),
        )
        .with_state(state)
}

fn log_request(req: Request) -> Request {
    info!(
        method = %req.method(),
        uri = %req.uri(),
        "Incoming HTTP request"
    );
    req
}

fn log_response(res: Response) -> Response {
    debug!(status = %res.status(), "Response sent");
    res
}
