//! Store error types.

use derive_more::{Display, Error};
use tictactoe_core::{GameId, TransitionError};
use tracing::instrument;

/// What went wrong in a store operation.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StoreErrorKind {
    /// No game with this identifier in the session.
    #[display("Game not found for ID: {}", id)]
    NotFound {
        /// Requested identifier.
        id: GameId,
    },
    /// Proposed state is not a legal successor of the stored one.
    #[display("Game status is invalidate: {}", reason)]
    InvalidTransition {
        /// Rejection reason.
        reason: TransitionError,
    },
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", kind, file, line)]
pub struct StoreError {
    /// Error kind.
    pub kind: StoreErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: StoreErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Lookup miss for `id`.
    #[track_caller]
    pub fn not_found(id: impl Into<GameId>) -> Self {
        Self::new(StoreErrorKind::NotFound { id: id.into() })
    }

    /// Rejected transition.
    #[track_caller]
    pub fn invalid_transition(reason: TransitionError) -> Self {
        Self::new(StoreErrorKind::InvalidTransition { reason })
    }

    /// Message safe to show a client (no source location).
    pub fn client_message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<TransitionError> for StoreError {
    #[track_caller]
    fn from(reason: TransitionError) -> Self {
        Self::invalid_transition(reason)
    }
}
