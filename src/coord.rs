//! Validated board coordinates and the adjacency predicates built on them.

use core::fmt;

use crate::common::GameError;
use crate::config::BOARD_SIZE;

/// A cell on the board, validated at construction. (col, row), zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    col: u8,
    row: u8,
}

impl Coordinate {
    /// Build a coordinate, failing with `OutOfBounds` unless both components
    /// are in `[0, BOARD_SIZE)`.
    pub fn new(col: u8, row: u8) -> Result<Self, GameError> {
        if col >= BOARD_SIZE || row >= BOARD_SIZE {
            return Err(GameError::OutOfBounds { col, row });
        }
        Ok(Self { col, row })
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    /// Orthogonal adjacency: exactly one axis differs, by exactly 1.
    pub fn is_adjacent(&self, other: &Coordinate) -> bool {
        let dc = self.col.abs_diff(other.col);
        let dr = self.row.abs_diff(other.row);
        (dc == 1 && dr == 0) || (dc == 0 && dr == 1)
    }

    /// Spacing predicate for ship placement: equal or adjacent on any axis,
    /// diagonals included.
    pub fn touches(&self, other: &Coordinate) -> bool {
        self.col.abs_diff(other.col) <= 1 && self.row.abs_diff(other.row) <= 1
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}
