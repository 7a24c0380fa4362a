use core::fmt;
use std::sync::Arc;

use crate::board::Board;
use crate::notify::PlayerHandle;

/// Opaque player identity handed out by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// A seated player: identity, owned board, and the push channel back to the
/// client. Created on join with an empty board; the owning session keeps it
/// until the session ends.
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub board: Board,
    pub handle: Arc<dyn PlayerHandle>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, handle: Arc<dyn PlayerHandle>) -> Self {
        Self {
            id,
            name: name.into(),
            board: Board::new(),
            handle,
        }
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("ships", &self.board.ship_count())
            .finish()
    }
}
