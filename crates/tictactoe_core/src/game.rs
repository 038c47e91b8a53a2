//! The `Game` aggregate and its wire encoding.

use super::grid::{Grid, OutOfBounds};
use super::rules;
use super::types::{GameId, Mark, Square, Status};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Board side length used when none is requested.
pub const DEFAULT_DIMENSION: usize = 3;

/// Smallest accepted board side length.
pub const MIN_DIMENSION: usize = 1;

/// Largest accepted board side length.
pub const MAX_DIMENSION: usize = 32;

/// Reasons a game cannot be built or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// Requested side length is outside the supported range.
    #[display(
        "Dimension {} is outside the supported range {}..={}",
        dimension,
        MIN_DIMENSION,
        MAX_DIMENSION
    )]
    InvalidDimension {
        /// Requested side length.
        dimension: usize,
    },
    /// Grid rows do not form a `dimension × dimension` matrix.
    #[display("Grid is not a {}x{} matrix", dimension, dimension)]
    GridShape {
        /// Declared side length.
        dimension: usize,
    },
    /// Winner is not one of `0`, `1`, `2`.
    #[display("Winner {} is not 0, 1 or 2", value)]
    InvalidWinner {
        /// Offending value.
        value: i32,
    },
}

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// One tic-tac-toe game.
///
/// `id` and `dimension` are fixed at construction. `status`, `winner` and
/// `last_update_time` are only ever derived by this crate; a decoded game
/// carries whatever the client sent until the transition policy refreshes
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameRecord", into = "GameRecord")]
pub struct Game {
    pub(crate) id: GameId,
    pub(crate) dimension: usize,
    pub(crate) grid: Grid,
    pub(crate) status: Status,
    pub(crate) winner: Option<Mark>,
    pub(crate) last_update_time: i64,
}

impl Game {
    /// Creates a new 3x3 game.
    #[instrument]
    pub fn new() -> Self {
        Self::build(DEFAULT_DIMENSION, now_millis())
    }

    /// Creates a new game with the given side length.
    #[instrument]
    pub fn with_dimension(dimension: usize) -> Result<Self, GameError> {
        check_dimension(dimension)?;
        Ok(Self::build(dimension, now_millis()))
    }

    fn build(dimension: usize, created_at: i64) -> Self {
        let game = Self {
            id: GameId::generate(),
            dimension,
            grid: Grid::new(dimension),
            status: Status::Start,
            winner: None,
            last_update_time: created_at,
        };
        debug!(game_id = %game.id, dimension, "Created game");
        game
    }

    /// Game identifier.
    pub fn id(&self) -> &GameId {
        &self.id
    }

    /// Board side length.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The board.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }


    /// Lifecycle status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Recorded winner, if any.
    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// Time of the last accepted state, in epoch milliseconds.
    pub fn last_update_time(&self) -> i64 {
        self.last_update_time
    }

    /// Places `mark` at `(row, col)` on this copy of the board.
    ///
    /// Nothing is checked beyond bounds; the result is only a proposal until
    /// it passes [`advance`](crate::advance).
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), OutOfBounds> {
        self.grid.set(row, col, Square::Occupied(mark))
    }

    /// Writes a raw value at `(row, col)` on this copy of the board.
    ///
    /// Values outside `{0, 1, 2}` are kept so validation can reject them.
    pub fn set_value(&mut self, row: usize, col: usize, value: i32) -> Result<(), OutOfBounds> {
        self.grid.set_value(row, col, value)
    }

    /// Runs win detection and records the result in `winner`.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn check_winner(&mut self) -> Option<Mark> {
        self.winner = rules::check_winner(&self.grid);
        self.winner
    }

    /// True when no cell is empty.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn check_full(&self) -> bool {
        rules::is_full(&self.grid)
    }

    /// Encodes the game as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a game from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

fn check_dimension(dimension: usize) -> Result<(), GameError> {
    if (MIN_DIMENSION..=MAX_DIMENSION).contains(&dimension) {
        Ok(())
    } else {
        Err(GameError::InvalidDimension { dimension })
    }
}

/// Wire shape of a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameRecord {
    id: GameId,
    dimension: usize,
    grid: Grid,
    status: Status,
    winner: i32,
    last_update_time: i64,
}

impl TryFrom<GameRecord> for Game {
    type Error = GameError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        check_dimension(record.dimension)?;
        if record.grid.dimension() != record.dimension || !record.grid.is_square() {
            return Err(GameError::GridShape {
                dimension: record.dimension,
            });
        }
        let winner = match record.winner {
            0 => None,
            value => Some(Mark::from_value(value).ok_or(GameError::InvalidWinner { value })?),
        };
        Ok(Self {
            id: record.id,
            dimension: record.dimension,
            grid: record.grid,
            status: record.status,
            winner,
            last_update_time: record.last_update_time,
        })
    }
}

impl From<Game> for GameRecord {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            dimension: game.dimension,
            grid: game.grid,
            status: game.status,
            winner: game.winner.map_or(0, Mark::value),
            last_update_time: game.last_update_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_game_starts_empty() {
        let game = Game::new();
        assert_eq!(game.dimension(), 3);
        assert_eq!(game.status(), Status::Start);
        assert_eq!(game.winner(), None);
        assert!(!game.check_full());
    }

    #[test]
    fn test_dimension_range() {
        assert_eq!(Game::with_dimension(5).unwrap().grid().dimension(), 5);
        assert_eq!(
            Game::with_dimension(0),
            Err(GameError::InvalidDimension { dimension: 0 })
        );
        assert!(Game::with_dimension(MAX_DIMENSION + 1).is_err());
    }

    #[test]
    fn test_check_winner_records_result() {
        let mut game = Game::new();
        game.winner = Some(Mark::O);
        assert_eq!(game.check_winner(), None);
        assert_eq!(game.winner(), None);

        for row in 0..3 {
            game.place(row, 1, Mark::X).unwrap();
        }
        assert_eq!(game.check_winner(), Some(Mark::X));
        assert_eq!(game.winner(), Some(Mark::X));
    }

    #[test]
    fn test_check_full_has_no_side_effects() {
        let mut game = Game::new();
        let rows = [[1, 2, 1], [2, 1, 1], [2, 1, 2]];
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                game.set_value(row, col, value).unwrap();
            }
        }
        let before = game.clone();
        assert!(game.check_full());
        assert!(game.check_full());
        assert_eq!(game, before);
    }

    #[test]
    fn test_wire_field_names() {
        let mut game = Game::new();
        game.place(0, 0, Mark::X).unwrap();
        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["id"], json!(game.id().as_str()));
        assert_eq!(value["dimension"], json!(3));
        assert_eq!(value["grid"], json!([[1, 0, 0], [0, 0, 0], [0, 0, 0]]));
        assert_eq!(value["status"], json!("START"));
        assert_eq!(value["winner"], json!(0));
        assert_eq!(value["lastUpdateTime"], json!(game.last_update_time()));
    }

    #[test]
    fn test_decode_keeps_out_of_range_cells() {
        let json = json!({
            "id": "abc",
            "dimension": 3,
            "grid": [[9, 0, 0], [0, 0, 0], [0, 0, 0]],
            "status": "PLAYING",
            "winner": 0,
            "lastUpdateTime": 1
        });
        let game: Game = serde_json::from_value(json).unwrap();
        assert_eq!(game.grid().value(0, 0), Some(9));
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        let ragged = json!({
            "id": "abc", "dimension": 3,
            "grid": [[0, 0, 0], [0, 0], [0, 0, 0]],
            "status": "START", "winner": 0, "lastUpdateTime": 1
        });
        assert!(serde_json::from_value::<Game>(ragged).is_err());

        let bad_winner = json!({
            "id": "abc", "dimension": 1, "grid": [[0]],
            "status": "START", "winner": 3, "lastUpdateTime": 1
        });
        assert!(serde_json::from_value::<Game>(bad_winner).is_err());

        let bad_status = json!({
            "id": "abc", "dimension": 1, "grid": [[0]],
            "status": "PAUSED", "winner": 0, "lastUpdateTime": 1
        });
        assert!(serde_json::from_value::<Game>(bad_status).is_err());
    }
}
