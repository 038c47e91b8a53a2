//! Win detection logic.

use super::super::{Grid, Mark, Square};
use tracing::instrument;

/// Checks if there is a winner on the board.
///
/// Lines are scanned in a fixed order: every column, then every row, then the
/// main diagonal, then the anti-diagonal. The first line whose cells all hold
/// the same mark decides the result.
#[instrument(skip(grid), fields(dimension = grid.dimension()))]
pub fn check_winner(grid: &Grid) -> Option<Mark> {
    lines(grid.dimension()).find_map(|line| line_owner(grid, &line))
}

/// Coordinates of every line in scan order.
fn lines(n: usize) -> impl Iterator<Item = Vec<(usize, usize)>> {
    let columns = (0..n).map(move |col| (0..n).map(|row| (row, col)).collect::<Vec<_>>());
    let rows = (0..n).map(move |row| (0..n).map(|col| (row, col)).collect::<Vec<_>>());
    let diagonal = std::iter::once((0..n).map(|i| (i, i)).collect::<Vec<_>>());
    let anti_diagonal = std::iter::once((0..n).map(|i| (i, n - 1 - i)).collect::<Vec<_>>());
    columns.chain(rows).chain(diagonal).chain(anti_diagonal)
}

/// The mark occupying every cell of `line`, if any.
fn line_owner(grid: &Grid, line: &[(usize, usize)]) -> Option<Mark> {
    let mut owner = None;
    for &(row, col) in line {
        match (grid.square(row, col)?, owner) {
            (Square::Empty, _) => return None,
            (Square::Occupied(mark), None) => owner = Some(mark),
            (Square::Occupied(mark), Some(first)) if mark == first => {}
            (Square::Occupied(_), Some(_)) => return None,
        }
    }
    owner
}
