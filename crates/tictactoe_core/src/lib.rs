//! Tictactoe Core - n×n tic-tac-toe state machine
//!
//! Pure game logic with no I/O: board representation, validation of proposed
//! next states, and win/draw detection.
//!
//! # Example
//!
//! ```
//! use tictactoe_core::{Game, Mark, Status, advance};
//!
//! let stored = Game::new();
//! let mut proposed = stored.clone();
//! proposed.place(1, 1, Mark::X).unwrap();
//!
//! let next = advance(&stored, proposed, tictactoe_core::now_millis()).unwrap();
//! assert_eq!(next.status(), Status::Playing);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod game;
mod grid;
mod rules;
mod transition;
mod types;

// Crate-level exports - Game aggregate
pub use game::{DEFAULT_DIMENSION, Game, GameError, MAX_DIMENSION, MIN_DIMENSION, now_millis};

// Crate-level exports - Board
pub use grid::{Grid, OutOfBounds};

// Crate-level exports - Domain types
pub use types::{EMPTY, GameId, Mark, Square, Status};

// Crate-level exports - Rules
pub use rules::{check_winner, is_full};

// Crate-level exports - Transitions
pub use transition::{TransitionError, advance, check_transition, prepare_candidate, validate};
