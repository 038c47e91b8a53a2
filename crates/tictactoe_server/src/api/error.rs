//! API error handling.
//!
//! Every failure reaches the client as `{ "message": string }` with a status
//! code matching its kind.

use crate::error::{StoreError, StoreErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Error payload sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Human-readable error message.
    pub message: String,
}

/// Per-request failure outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ApiError {
    /// Lookup of a game id the session does not hold.
    #[display("Not found: {}", message)]
    NotFound {
        /// Client-facing message.
        message: String,
    },
    /// Submitted state failed validation. Stored state is unchanged.
    #[display("Invalid transition: {}", message)]
    InvalidTransition {
        /// Client-facing message.
        message: String,
    },
    /// Request payload did not decode into the expected shape.
    #[display("Malformed input: {}", message)]
    MalformedInput {
        /// Client-facing message.
        message: String,
    },
}

impl ApiError {
    /// Builds a malformed-input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedInput { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Message carried in the response body.
    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound { message }
            | ApiError::InvalidTransition { message }
            | ApiError::MalformedInput { message } => message,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let message = err.client_message();
        match err.kind {
            StoreErrorKind::NotFound { .. } => ApiError::NotFound { message },
            StoreErrorKind::InvalidTransition { .. } => ApiError::InvalidTransition { message },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status != StatusCode::NOT_FOUND {
            warn!(%status, error = %self, "Request failed");
        }
        let body = Json(ErrorMessage {
            message: self.message().to_string(),
        });
        (status, body).into_response()
    }
}
