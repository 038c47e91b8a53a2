//! Square board of raw cell values.
//!
//! Cells are kept as the integers clients send so that a proposed board with
//! out-of-range values can still be inspected and rejected by validation.

use super::types::{EMPTY, Mark, Square};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Error raised when addressing a cell outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Cell ({}, {}) is outside a {}x{} board", row, col, dimension, dimension)]
pub struct OutOfBounds {
    /// Requested row.
    pub row: usize,
    /// Requested column.
    pub col: usize,
    /// Board side length.
    pub dimension: usize,
}

/// Board stored as rows of raw cell values, indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<i32>>,
}

impl Grid {
    /// Creates an empty `dimension × dimension` board.
    pub fn new(dimension: usize) -> Self {
        Self {
            rows: vec![vec![EMPTY; dimension]; dimension],
        }
    }

    /// Wraps raw rows without checking shape or values.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    /// True when every row has as many cells as there are rows.
    pub fn is_square(&self) -> bool {
        let n = self.rows.len();
        self.rows.iter().all(|row| row.len() == n)
    }

    /// Raw rows.
    pub fn rows(&self) -> &[Vec<i32>] {
        &self.rows
    }

    /// Raw value at `(row, col)`.
    pub fn value(&self, row: usize, col: usize) -> Option<i32> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Interpreted square at `(row, col)`; `None` when out of bounds or out of range.
    pub fn square(&self, row: usize, col: usize) -> Option<Square> {
        self.value(row, col).and_then(Square::from_value)
    }

    /// Overwrites a cell with an arbitrary raw value.
    pub fn set_value(&mut self, row: usize, col: usize, value: i32) -> Result<(), OutOfBounds> {
        let dimension = self.dimension();
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(OutOfBounds {
                row,
                col,
                dimension,
            })?;
        *cell = value;
        Ok(())
    }

    /// Overwrites a cell with a square.
    pub fn set(&mut self, row: usize, col: usize, square: Square) -> Result<(), OutOfBounds> {
        self.set_value(row, col, square.value())
    }

    /// Iterates `(row, col, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &value)| (row, col, value))
        })
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells()
            .filter(|&(_, _, value)| value == mark.value())
            .count()
    }

    /// Renders the board as text, `.` for empty and `?` for out-of-range cells.
    pub fn display(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&value| match Square::from_value(value) {
                        Some(Square::Empty) => ".".to_string(),
                        Some(Square::Occupied(mark)) => mark.to_string(),
                        None => "?".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty_and_square() {
        let grid = Grid::new(4);
        assert_eq!(grid.dimension(), 4);
        assert!(grid.is_square());
        assert!(grid.cells().all(|(_, _, v)| v == EMPTY));
    }

    #[test]
    fn test_ragged_rows_are_not_square() {
        let grid = Grid::from_rows(vec![vec![0, 0], vec![0]]);
        assert!(!grid.is_square());
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = Grid::new(3);
        let err = grid.set(3, 0, Square::Occupied(Mark::X)).unwrap_err();
        assert_eq!(err.dimension, 3);
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_count_and_display() {
        let mut grid = Grid::new(3);
        grid.set(0, 0, Mark::X.into()).unwrap();
        grid.set(1, 1, Mark::O.into()).unwrap();
        grid.set(2, 2, Mark::X.into()).unwrap();
        assert_eq!(grid.count(Mark::X), 2);
        assert_eq!(grid.count(Mark::O), 1);
        assert_eq!(grid.display(), "X|.|.\n.|O|.\n.|.|X");
    }
}
