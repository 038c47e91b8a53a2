//! Validated state transitions.
//!
//! A client never mutates a stored game directly. It submits a whole proposed
//! game, and the stored game only moves forward when the proposal is exactly
//! one legal move ahead of it. Accepting a proposal runs in two phases:
//!
//! 1. [`prepare_candidate`] overwrites the server-owned fields of the proposal
//!    (timestamp, status, winner).
//! 2. [`check_transition`] compares the candidate with the stored game. It is a
//!    pure predicate over two snapshots.
//!
//! [`advance`] runs both.

use super::game::Game;
use super::types::{Mark, Square, Status};
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

/// Why a proposed game is not a legal successor of the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum TransitionError {
    /// Proposed game has a different identifier.
    #[display("game identifier does not match")]
    IdMismatch,
    /// Proposed game has a different side length.
    #[display("board dimension does not match")]
    DimensionMismatch,
    /// A board is not a `dimension × dimension` matrix.
    #[display("board is not a {}x{} matrix", dimension, dimension)]
    GridShape {
        /// Declared side length.
        dimension: usize,
    },
    /// Proposed game is older than the stored one.
    #[display("proposed state is older than the stored state")]
    Stale,
    /// Stored game has already ended.
    #[display("game is already over")]
    GameOver,
    /// Proposed status moves backwards.
    #[display("status cannot go from {} to {}", from, to)]
    StatusRegression {
        /// Stored status.
        from: Status,
        /// Proposed status.
        to: Status,
    },
    /// A cell holds something other than `0`, `1` or `2`.
    #[display("cell ({}, {}) holds invalid value {}", row, col, value)]
    InvalidCell {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// Offending value.
        value: i32,
    },
    /// Proposed board is identical to the stored one.
    #[display("no cell changed")]
    NoChange,
    /// More than one cell changed.
    #[display("more than one cell changed")]
    MultipleChanges,
    /// The changed cell was cleared.
    #[display("a mark was removed")]
    Erased,
    /// The mark placed does not belong to the player whose turn it is.
    #[display("{} moved out of turn", mark)]
    OutOfTurn {
        /// Mark that was placed.
        mark: Mark,
    },
}

/// Per-player mark counts on one board.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    x: usize,
    o: usize,
}

impl Tally {
    fn record(&mut self, square: Square) {
        match square {
            Square::Occupied(Mark::X) => self.x += 1,
            Square::Occupied(Mark::O) => self.o += 1,
            Square::Empty => {}
        }
    }
}

/// Checks that `proposed` is a legal single-move successor of `current`.
///
/// Never mutates either game.
#[instrument(skip_all, fields(game_id = %current.id))]
pub fn check_transition(current: &Game, proposed: &Game) -> Result<(), TransitionError> {
    if current.id != proposed.id {
        return Err(TransitionError::IdMismatch);
    }
    if current.dimension != proposed.dimension {
        return Err(TransitionError::DimensionMismatch);
    }
    for game in [current, proposed] {
        if game.grid.dimension() != game.dimension || !game.grid.is_square() {
            return Err(TransitionError::GridShape {
                dimension: game.dimension,
            });
        }
    }
    if proposed.last_update_time < current.last_update_time {
        return Err(TransitionError::Stale);
    }
    if current.status == Status::End {
        return Err(TransitionError::GameOver);
    }
    if current.status == Status::Playing && proposed.status == Status::Start {
        return Err(TransitionError::StatusRegression {
            from: current.status,
            to: proposed.status,
        });
    }

    let mut before = Tally::default();
    let mut after = Tally::default();
    let mut changed: Option<Square> = None;

    let rows = current.grid.rows().iter().zip(proposed.grid.rows());
    for (row, (old_row, new_row)) in rows.enumerate() {
        for (col, (&old, &new)) in old_row.iter().zip(new_row).enumerate() {
            let new_square = Square::from_value(new).ok_or(TransitionError::InvalidCell {
                row,
                col,
                value: new,
            })?;
            if let Some(old_square) = Square::from_value(old) {
                before.record(old_square);
            }
            after.record(new_square);

            if old != new {
                if changed.is_some() {
                    return Err(TransitionError::MultipleChanges);
                }
                changed = Some(new_square);
            }
        }
    }

    match changed {
        None => Err(TransitionError::NoChange),
        Some(Square::Empty) => Err(TransitionError::Erased),
        Some(Square::Occupied(Mark::X)) => {
            if before.x + 1 == after.x && before.o == after.o && after.x == after.o + 1 {
                Ok(())
            } else {
                Err(TransitionError::OutOfTurn { mark: Mark::X })
            }
        }
        Some(Square::Occupied(Mark::O)) => {
            if before.x == after.x && before.o + 1 == after.o && after.x == after.o {
                Ok(())
            } else {
                Err(TransitionError::OutOfTurn { mark: Mark::O })
            }
        }
    }
}

/// True when `proposed` is a legal single-move successor of `current`.
pub fn validate(current: &Game, proposed: &Game) -> bool {
    check_transition(current, proposed).is_ok()
}

/// Derives the server-owned fields of a client proposal.
///
/// The timestamp becomes `now_ms`, never earlier than the stored game's. The
/// status becomes `END` on a full board or a win and `PLAYING` otherwise, and
/// the winner is recomputed from the board.
#[instrument(skip_all, fields(game_id = %proposed.id, now_ms = now_ms))]
pub fn prepare_candidate(current: &Game, mut proposed: Game, now_ms: i64) -> Game {
    proposed.last_update_time = now_ms.max(current.last_update_time);
    proposed.status = if proposed.check_full() {
        Status::End
    } else {
        Status::Playing
    };
    if proposed.check_winner().is_some() {
        proposed.status = Status::End;
    }
    proposed
}

/// Turns a client proposal into the next stored state, or rejects it.
#[instrument(skip_all, fields(game_id = %current.id, now_ms = now_ms))]
pub fn advance(current: &Game, proposed: Game, now_ms: i64) -> Result<Game, TransitionError> {
    let candidate = prepare_candidate(current, proposed, now_ms);
    match check_transition(current, &candidate) {
        Ok(()) => {
            info!(
                status = %candidate.status,
                winner = ?candidate.winner,
                "Transition accepted"
            );
            debug!(board = %candidate.grid.display(), "Board after move");
            Ok(candidate)
        }
        Err(reason) => {
            warn!(%reason, "Transition rejected");
            debug!(board = %current.grid.display(), "Stored board kept");
            Err(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid;

    fn with_move(game: &Game, row: usize, col: usize, mark: Mark) -> Game {
        let mut next = game.clone();
        next.place(row, col, mark).unwrap();
        next
    }

    #[test]
    fn test_identical_states_rejected() {
        let game = Game::new();
        assert!(!validate(&game, &game));
        assert_eq!(
            check_transition(&game, &game),
            Err(TransitionError::NoChange)
        );
    }

    #[test]
    fn test_id_and_dimension_must_match() {
        let game = Game::new();
        let other = with_move(&Game::new(), 0, 0, Mark::X);
        assert_eq!(
            check_transition(&game, &other),
            Err(TransitionError::IdMismatch)
        );

        let mut bigger = Game::with_dimension(4).unwrap();
        bigger.id = game.id.clone();
        bigger.place(0, 0, Mark::X).unwrap();
        assert_eq!(
            check_transition(&game, &bigger),
            Err(TransitionError::DimensionMismatch)
        );
    }

    #[test]
    fn test_truncated_grid_rejected() {
        let game = Game::new();
        let mut next = game.clone();
        next.grid = Grid::from_rows(vec![vec![1, 0, 0], vec![0, 0, 0]]);
        assert_eq!(
            check_transition(&game, &next),
            Err(TransitionError::GridShape { dimension: 3 })
        );
        assert!(!validate(&game, &next));
    }

    #[test]
    fn test_extended_grid_rejected() {
        let game = Game::new();
        let mut next = game.clone();
        next.grid = Grid::from_rows(vec![
            vec![1, 0, 0],
            vec![0, 0, 0, 9, 9],
            vec![0, 0, 0],
            vec![2, 2, 2],
        ]);
        assert_eq!(
            advance(&game, next, game.last_update_time + 1),
            Err(TransitionError::GridShape { dimension: 3 })
        );

        let mut wide = game.clone();
        wide.grid = Grid::from_rows(vec![vec![1, 0, 0, 0], vec![0, 0, 0, 0], vec![0, 0, 0, 0]]);
        assert!(!validate(&game, &wide));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let game = Game::new();
        let mut next = with_move(&game, 0, 0, Mark::X);
        next.last_update_time = game.last_update_time - 1;
        assert_eq!(check_transition(&game, &next), Err(TransitionError::Stale));
    }

    #[test]
    fn test_status_cannot_regress() {
        let mut game = Game::new();
        game.status = Status::Playing;
        let mut next = with_move(&game, 0, 0, Mark::X);
        next.status = Status::Start;
        assert!(matches!(
            check_transition(&game, &next),
            Err(TransitionError::StatusRegression { .. })
        ));

        game.status = Status::End;
        next.status = Status::Playing;
        assert_eq!(
            check_transition(&game, &next),
            Err(TransitionError::GameOver)
        );
        next.status = Status::End;
        assert_eq!(
            check_transition(&game, &next),
            Err(TransitionError::GameOver)
        );
    }

    #[test]
    fn test_out_of_range_cell_rejected() {
        let game = Game::new();
        let mut next = with_move(&game, 0, 0, Mark::X);
        next.grid.set_value(2, 2, 3).unwrap();
        assert_eq!(
            check_transition(&game, &next),
            Err(TransitionError::InvalidCell {
                row: 2,
                col: 2,
                value: 3
            })
        );

        let mut only_bad = game.clone();
        only_bad.grid.set_value(1, 1, -1).unwrap();
        assert!(!validate(&game, &only_bad));
    }

    #[test]
    fn test_two_changed_cells_rejected() {
        let game = Game::new();
        let next = with_move(&with_move(&game, 0, 0, Mark::X), 1, 1, Mark::O);
        assert_eq!(
            check_transition(&game, &next),
            Err(TransitionError::MultipleChanges)
        );
    }

    #[test]
    fn test_o_cannot_open() {
        let game = Game::new();
        let next = with_move(&game, 1, 1, Mark::O);
        assert_eq!(
            check_transition(&game, &next),
            Err(TransitionError::OutOfTurn { mark: Mark::O })
        );
    }

    #[test]
    fn test_x_cannot_move_twice() {
        let game = with_move(&Game::new(), 0, 0, Mark::X);
        let next = with_move(&game, 0, 1, Mark::X);
        assert_eq!(
            check_transition(&game, &next),
            Err(TransitionError::OutOfTurn { mark: Mark::X })
        );
    }

    #[test]
    fn test_erasing_a_mark_rejected() {
        let game = with_move(&Game::new(), 0, 0, Mark::X);
        let mut next = game.clone();
        next.grid.set(0, 0, Square::Empty).unwrap();
        assert_eq!(check_transition(&game, &next), Err(TransitionError::Erased));
    }

    #[test]
    fn test_overwriting_opponent_mark_rejected() {
        let game = with_move(&with_move(&Game::new(), 0, 0, Mark::X), 1, 1, Mark::O);
        let next = with_move(&game, 1, 1, Mark::X);
        assert!(!validate(&game, &next));
    }

    #[test]
    fn test_alternating_moves_accepted() {
        let mut current = Game::new();
        let moves = [
            (0, 0, Mark::X),
            (1, 1, Mark::O),
            (2, 2, Mark::X),
            (0, 2, Mark::O),
        ];
        for (step, (row, col, mark)) in moves.into_iter().enumerate() {
            let proposed = with_move(&current, row, col, mark);
            current = advance(&current, proposed, 1_000 + step as i64).unwrap();
            assert_eq!(current.status(), Status::Playing);
        }
    }

    #[test]
    fn test_prepare_candidate_overrides_client_fields() {
        let current = Game::new();
        let mut proposed = with_move(&current, 0, 0, Mark::X);
        proposed.status = Status::End;
        proposed.winner = Some(Mark::O);
        proposed.last_update_time = i64::MAX;

        let candidate = prepare_candidate(&current, proposed, current.last_update_time - 50);
        assert_eq!(candidate.status(), Status::Playing);
        assert_eq!(candidate.winner(), None);
        assert_eq!(candidate.last_update_time(), current.last_update_time());
    }

    #[test]
    fn test_win_ends_game() {
        let mut current = Game::new();
        current.grid = Grid::from_rows(vec![vec![1, 2, 0], vec![1, 2, 0], vec![0, 0, 0]]);
        current.status = Status::Playing;
        let proposed = with_move(&current, 2, 0, Mark::X);
        let next = advance(&current, proposed, current.last_update_time + 1).unwrap();
        assert_eq!(next.status(), Status::End);
        assert_eq!(next.winner(), Some(Mark::X));

        let after_end = with_move(&next, 2, 1, Mark::O);
        assert_eq!(
            advance(&next, after_end, next.last_update_time + 1),
            Err(TransitionError::GameOver)
        );
    }

    #[test]
    fn test_rejection_leaves_current_untouched() {
        let current = Game::new();
        let snapshot = current.clone();
        let bad = with_move(&current, 0, 0, Mark::O);
        assert!(advance(&current, bad, current.last_update_time + 1).is_err());
        assert_eq!(current, snapshot);
    }
}
