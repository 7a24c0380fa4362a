//! Common types: game errors and attack outcomes.

use core::fmt;

/// Errors returned by board, session and registry operations.
///
/// All of these are recoverable and reported to the caller; none of them
/// should ever take the server process down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Coordinate outside the board.
    OutOfBounds { col: u8, row: u8 },
    /// Ship endpoints do not share a row or a column.
    InvalidShipShape,
    /// Ship placement overlaps an existing ship.
    ShipOverlaps,
    /// Ship placement touches an existing ship (diagonals included).
    ShipTooClose,
    /// Player id is not registered.
    UnknownPlayer,
    /// Session already has two seated players.
    SessionFull,
    /// Attack from a player who does not hold the turn, or outside PLAYING.
    NotYourTurn,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::OutOfBounds { col, row } => {
                write!(f, "coordinate ({},{}) is outside the board", col, row)
            }
            GameError::InvalidShipShape => write!(f, "ship must be horizontal or vertical"),
            GameError::ShipOverlaps => write!(f, "ship overlaps an existing ship"),
            GameError::ShipTooClose => write!(f, "ship touches an existing ship"),
            GameError::UnknownPlayer => write!(f, "unknown player id"),
            GameError::SessionFull => write!(f, "session already has two players"),
            GameError::NotYourTurn => write!(f, "not your turn"),
        }
    }
}

impl std::error::Error for GameError {}

/// Result of resolving an attack against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AttackOutcome {
    /// No ship at the target cell.
    Miss,
    /// A ship was hit but is still afloat.
    Hit,
    /// This hit sank a ship; other ships remain.
    Sunk,
    /// This hit sank the last remaining ship.
    SunkAndGameOver,
    /// The cell was attacked before; no state changed.
    AlreadyAttacked,
}

impl AttackOutcome {
    /// Human-readable phrasing used in push notifications.
    pub fn description(&self) -> &'static str {
        match self {
            AttackOutcome::Miss => "miss",
            AttackOutcome::Hit => "hit",
            AttackOutcome::Sunk => "ship sunk",
            AttackOutcome::SunkAndGameOver => "last ship sunk, game over",
            AttackOutcome::AlreadyAttacked => "already attacked",
        }
    }
}

impl fmt::Display for AttackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
