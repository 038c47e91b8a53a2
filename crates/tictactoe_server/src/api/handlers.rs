//! Request handlers for the game resource.
//!
//! Each handler resolves the caller's session first and always returns the
//! session cookie alongside its outcome, so a client that starts a session
//! with a failing request still learns its session id.

use super::AppState;
use super::error::ApiError;
use super::session::{ClientSession, SessionCookie};
use crate::error::StoreError;
use crate::store::Lookup;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use tictactoe_core::Game;
use tracing::{info, instrument};

/// Query parameters accepted when creating a game.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateParams {
    /// Board side length; the configured default when absent.
    pub dimension: Option<usize>,
}

/// Creates a new game in the caller's session.
/// POST /api/v1.0/game
#[instrument(skip_all, fields(session_id = %session.id))]
pub async fn create_game(
    State(state): State<AppState>,
    session: ClientSession,
    params: Result<Query<CreateParams>, QueryRejection>,
) -> (SessionCookie, Result<Json<Game>, ApiError>) {
    let outcome = params
        .map_err(|rejection| ApiError::malformed(rejection.body_text()))
        .and_then(|Query(params)| {
            let dimension = params.dimension.unwrap_or(*state.config.default_dimension());
            session
                .games
                .create_with_dimension(dimension)
                .map(Json)
                .map_err(|e| ApiError::malformed(e.to_string()))
        });
    (session.cookie(), outcome)
}

/// Reads one game, or all of the session's games for the id `all`.
/// GET /api/v1.0/game/{id}
#[instrument(skip_all, fields(session_id = %session.id, game_id = %id))]
pub async fn get_game(
    session: ClientSession,
    Path(id): Path<String>,
) -> (SessionCookie, Result<Json<Lookup>, ApiError>) {
    let outcome = session.games.get(&id).map(Json).map_err(ApiError::from);
    (session.cookie(), outcome)
}

/// Submits a proposed next state for a game.
/// PUT /api/v1.0/game/{id}
#[instrument(skip_all, fields(session_id = %session.id, game_id = %id))]
pub async fn update_game(
    session: ClientSession,
    Path(id): Path<String>,
    payload: Result<Json<Game>, JsonRejection>,
) -> (SessionCookie, Result<Json<Game>, ApiError>) {
    let outcome = payload
        .map_err(|rejection| ApiError::malformed(rejection.body_text()))
        .and_then(|Json(proposed)| {
            session
                .games
                .advance(&id, proposed)
                .map(Json)
                .map_err(ApiError::from)
        });
    if let Ok(Json(game)) = &outcome {
        info!(status = %game.status(), winner = ?game.winner(), "Game updated");
    }
    (session.cookie(), outcome)
}

/// Deletes a game.
/// DELETE /api/v1.0/game/{id}
#[instrument(skip_all, fields(session_id = %session.id, game_id = %id))]
pub async fn delete_game(
    session: ClientSession,
    Path(id): Path<String>,
) -> (SessionCookie, Result<StatusCode, ApiError>) {
    let outcome = if session.games.delete(&id) {
        Ok(StatusCode::OK)
    } else {
        Err(StoreError::not_found(id.as_str()).into())
    };
    (session.cookie(), outcome)
}
