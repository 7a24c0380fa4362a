use tokio::time::Duration;

use crate::board::Board;

pub const BOARD_SIZE: u8 = 10;

/// The classic fleet: carrier, battleship, cruiser, submarine, destroyer.
/// The board itself never enforces this set; it is documentation for clients
/// and the source of the default fleet-completeness policy below.
pub const STANDARD_FLEET: [usize; 5] = [5, 4, 3, 3, 2];

/// Upper bound on any single push-notification delivery attempt.
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(2);

/// Policy deciding when a player's fleet counts as fully placed.
///
/// Fleet size is a session rule, not a board rule: the board accepts any
/// number of ships and the session asks this policy when to start the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetPolicy {
    pub required_ships: usize,
}

impl FleetPolicy {
    pub const fn new(required_ships: usize) -> Self {
        Self { required_ships }
    }

    /// Whether `board` holds a complete fleet under this policy.
    pub fn is_complete(&self, board: &Board) -> bool {
        board.ship_count() >= self.required_ships
    }
}

impl Default for FleetPolicy {
    fn default() -> Self {
        Self::new(STANDARD_FLEET.len())
    }
}
