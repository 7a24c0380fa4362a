//! Ships: straight runs of cells with per-cell hit tracking.

use crate::common::GameError;
use crate::coord::Coordinate;

/// A ship occupying a straight horizontal or vertical run of cells, with a
/// parallel per-cell hit flag. Owned exclusively by one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    cells: Vec<Coordinate>,
    hits: Vec<bool>,
}

impl Ship {
    /// Build the inclusive run between `start` and `end`, order-independent.
    /// Fails with `InvalidShipShape` when the endpoints share neither a row
    /// nor a column. A single-cell ship (start == end) is permitted.
    pub fn new(start: Coordinate, end: Coordinate) -> Result<Self, GameError> {
        let cells = if start.col() == end.col() {
            let (lo, hi) = (start.row().min(end.row()), start.row().max(end.row()));
            (lo..=hi)
                .map(|row| Coordinate::new(start.col(), row))
                .collect::<Result<Vec<_>, _>>()?
        } else if start.row() == end.row() {
            let (lo, hi) = (start.col().min(end.col()), start.col().max(end.col()));
            (lo..=hi)
                .map(|col| Coordinate::new(col, start.row()))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            return Err(GameError::InvalidShipShape);
        };
        let hits = vec![false; cells.len()];
        Ok(Self { cells, hits })
    }

    /// Run length.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells occupied by the ship, in run order.
    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Membership test.
    pub fn occupies(&self, coord: Coordinate) -> bool {
        self.cells.contains(&coord)
    }

    /// Mark `coord` hit if the ship occupies it and it was not already hit.
    /// Returns whether a new hit was recorded; re-hitting is a no-op.
    pub fn register_hit(&mut self, coord: Coordinate) -> bool {
        match self.cells.iter().position(|c| *c == coord) {
            Some(i) if !self.hits[i] => {
                self.hits[i] = true;
                true
            }
            _ => false,
        }
    }

    /// A ship is sunk when every cell has been hit.
    pub fn is_sunk(&self) -> bool {
        self.hits.iter().all(|h| *h)
    }
}
