//! Tests for the tic-tac-toe transition state machine.

use tictactoe_core::{Game, Mark, Status, TransitionError, advance, validate};

/// Plays `moves` from a fresh game, advancing the clock by one per move.
fn play(moves: &[(usize, usize, Mark)]) -> Result<Game, TransitionError> {
    let mut current = Game::new();
    let mut clock = current.last_update_time();
    for &(row, col, mark) in moves {
        let mut proposed = current.clone();
        proposed.place(row, col, mark).unwrap();
        clock += 1;
        current = advance(&current, proposed, clock)?;
    }
    Ok(current)
}

#[test]
fn test_column_win() {
    let game = play(&[
        (0, 0, Mark::X),
        (0, 1, Mark::O),
        (1, 0, Mark::X),
        (1, 1, Mark::O),
        (2, 0, Mark::X),
    ])
    .unwrap();
    assert_eq!(game.winner(), Some(Mark::X));
    assert_eq!(game.status(), Status::End);
}

#[test]
fn test_second_player_wins() {
    let game = play(&[
        (0, 0, Mark::X),
        (0, 1, Mark::O),
        (1, 0, Mark::X),
        (1, 1, Mark::O),
        (0, 2, Mark::X),
        (2, 1, Mark::O),
    ])
    .unwrap();
    assert_eq!(game.winner(), Some(Mark::O));
    assert_eq!(game.status(), Status::End);
}

#[test]
fn test_draw() {
    let game = play(&[
        (0, 0, Mark::X),
        (0, 1, Mark::O),
        (1, 0, Mark::X),
        (1, 1, Mark::O),
        (0, 2, Mark::X),
        (1, 2, Mark::O),
        (2, 2, Mark::X),
        (2, 0, Mark::O),
        (2, 1, Mark::X),
    ])
    .unwrap();
    assert_eq!(game.winner(), None);
    assert_eq!(game.status(), Status::End);
    assert!(game.check_full());
}

#[test]
fn test_first_move_must_be_x() {
    let result = play(&[(0, 0, Mark::O)]);
    assert_eq!(result, Err(TransitionError::OutOfTurn { mark: Mark::O }));
}

#[test]
fn test_alternation_enforced_midgame() {
    let result = play(&[(0, 0, Mark::X), (1, 1, Mark::O), (2, 2, Mark::O)]);
    assert_eq!(result, Err(TransitionError::OutOfTurn { mark: Mark::O }));
}

#[test]
fn test_no_moves_after_end() {
    let game = play(&[
        (0, 0, Mark::X),
        (0, 1, Mark::O),
        (1, 0, Mark::X),
        (1, 1, Mark::O),
        (2, 0, Mark::X),
    ])
    .unwrap();
    let mut proposed = game.clone();
    proposed.place(2, 2, Mark::O).unwrap();
    assert_eq!(
        advance(&game, proposed, game.last_update_time() + 1),
        Err(TransitionError::GameOver)
    );
}

#[test]
fn test_timestamps_never_decrease() {
    let stored = Game::new();
    let mut proposed = stored.clone();
    proposed.place(0, 0, Mark::X).unwrap();
    let next = advance(&stored, proposed, 0).unwrap();
    assert!(next.last_update_time() >= stored.last_update_time());
}

#[test]
fn test_larger_board_game() {
    let stored = Game::with_dimension(4).unwrap();
    let mut proposed = stored.clone();
    proposed.place(3, 3, Mark::X).unwrap();
    let next = advance(&stored, proposed, stored.last_update_time() + 1).unwrap();
    assert_eq!(next.dimension(), 4);
    assert_eq!(next.status(), Status::Playing);
}

#[test]
fn test_validate_rejects_invalid_grid_value() {
    let stored = Game::new();
    let mut proposed = stored.clone();
    proposed.set_value(1, 1, 5).unwrap();
    assert!(!validate(&stored, &proposed));
    assert!(proposed.set_value(3, 0, 1).is_err());
}

#[test]
fn test_wire_round_trip() {
    let game = play(&[(0, 0, Mark::X), (2, 1, Mark::O)]).unwrap();
    let json = game.to_json().unwrap();
    let decoded = Game::from_json(&json).unwrap();
    assert_eq!(decoded.id(), game.id());
    assert_eq!(decoded.dimension(), game.dimension());
    assert_eq!(decoded.grid(), game.grid());
    assert_eq!(decoded.status(), game.status());
    assert_eq!(decoded.winner(), game.winner());
    assert_eq!(decoded.last_update_time(), game.last_update_time());
}
