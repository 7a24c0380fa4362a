//! Board state: ship placements, attacked cells and attack resolution.

use crate::common::{AttackOutcome, GameError};
use crate::config::BOARD_SIZE;
use crate::coord::Coordinate;
use crate::ship::Ship;

const N: usize = BOARD_SIZE as usize;

/// One player's board: a set of ships plus permanent attacked/hit markings.
/// The hit grid is always a subset of the attacked grid.
#[derive(Debug, Clone, Default)]
pub struct Board {
    ships: Vec<Ship>,
    attacked: [[bool; N]; N],
    hits: [[bool; N]; N],
}

impl Board {
    /// Create an empty board with no ships placed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the ship spanning `start..=end`.
    ///
    /// Geometry failures propagate from `Ship::new`; a candidate that shares
    /// a cell with an existing ship is rejected with `ShipOverlaps`, and one
    /// that touches an existing ship (diagonals included) with `ShipTooClose`.
    /// On any rejection the board is unchanged. No fleet-size or ship-length
    /// limit is enforced here; that is session policy.
    pub fn place_ship(&mut self, start: Coordinate, end: Coordinate) -> Result<(), GameError> {
        let candidate = Ship::new(start, end)?;
        for existing in &self.ships {
            for cell in candidate.cells() {
                if existing.occupies(*cell) {
                    return Err(GameError::ShipOverlaps);
                }
                if existing.cells().iter().any(|c| c.touches(cell)) {
                    return Err(GameError::ShipTooClose);
                }
            }
        }
        self.ships.push(candidate);
        Ok(())
    }

    /// Resolve an attack at `coord`.
    ///
    /// The attacked mark is permanent: once a cell has been attacked every
    /// later attack short-circuits to `AlreadyAttacked` with no state change,
    /// whatever the original outcome was.
    pub fn receive_attack(&mut self, coord: Coordinate) -> AttackOutcome {
        let (c, r) = (coord.col() as usize, coord.row() as usize);
        if self.attacked[r][c] {
            return AttackOutcome::AlreadyAttacked;
        }
        self.attacked[r][c] = true;

        let Some(i) = self.ships.iter().position(|s| s.occupies(coord)) else {
            return AttackOutcome::Miss;
        };
        self.ships[i].register_hit(coord);
        self.hits[r][c] = true;
        if !self.ships[i].is_sunk() {
            return AttackOutcome::Hit;
        }
        if self.ships.iter().all(Ship::is_sunk) {
            AttackOutcome::SunkAndGameOver
        } else {
            AttackOutcome::Sunk
        }
    }

    /// Number of ships placed so far.
    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    /// `true` once every placed ship is sunk.
    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    pub fn has_ship_at(&self, coord: Coordinate) -> bool {
        self.ships.iter().any(|s| s.occupies(coord))
    }

    pub fn is_attacked(&self, coord: Coordinate) -> bool {
        self.attacked[coord.row() as usize][coord.col() as usize]
    }

    pub fn is_hit(&self, coord: Coordinate) -> bool {
        self.hits[coord.row() as usize][coord.col() as usize]
    }
}
