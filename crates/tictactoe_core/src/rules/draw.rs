//! Draw detection logic.

use super::super::{EMPTY, Grid};
use tracing::instrument;

/// Checks if the board is full (no cell holds `0`).
///
/// A full board with no winner indicates a draw.
#[instrument(skip(grid), fields(dimension = grid.dimension()))]
pub fn is_full(grid: &Grid) -> bool {
    grid.cells().all(|(_, _, value)| value != EMPTY)
}
