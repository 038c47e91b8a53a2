//! Core domain types for n×n tic-tac-toe.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Integer stored in an empty cell.
pub const EMPTY: i32 = 0;

/// A player's mark on the board.
///
/// On the wire a mark is an integer: `1` for X, `2` for O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, strum::EnumIter)]
pub enum Mark {
    /// Player X (goes first), encoded as `1`.
    #[display("X")]
    X,
    /// Player O (goes second), encoded as `2`.
    #[display("O")]
    O,
}

impl Mark {
    /// Returns the integer encoding of this mark.
    pub const fn value(self) -> i32 {
        match self {
            Mark::X => 1,
            Mark::O => 2,
        }
    }

    /// Decodes a mark from its integer encoding.
    pub const fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Mark::X),
            2 => Some(Mark::O),
            _ => None,
        }
    }
}

/// Interpreted view of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Mark),
}

impl Square {
    /// Interprets a raw cell value. Returns `None` for anything outside `{0, 1, 2}`.
    pub const fn from_value(value: i32) -> Option<Self> {
        match value {
            EMPTY => Some(Square::Empty),
            other => match Mark::from_value(other) {
                Some(mark) => Some(Square::Occupied(mark)),
                None => None,
            },
        }
    }

    /// Returns the raw cell value.
    pub const fn value(self) -> i32 {
        match self {
            Square::Empty => EMPTY,
            Square::Occupied(mark) => mark.value(),
        }
    }
}

impl From<Mark> for Square {
    fn from(mark: Mark) -> Self {
        Square::Occupied(mark)
    }
}

/// Lifecycle status of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Status {
    /// No moves made yet.
    #[default]
    Start,
    /// At least one move made, game not decided.
    Playing,
    /// Won or drawn. Terminal.
    End,
}

/// Opaque game identifier.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::borrow::Borrow<str> for GameId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GameId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
