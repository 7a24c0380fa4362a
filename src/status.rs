//! Immutable status projections handed to a requesting player.

use core::fmt;

/// Phase of a two-player session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GamePhase {
    Waiting,
    PlacingShips,
    Playing,
    Finished,
}

/// Snapshot of a session's state from one player's point of view. Produced on
/// demand, never stored; safe to build at any time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusSnapshot {
    pub phase: GamePhase,
    pub current_player: Option<String>,
    pub my_turn: bool,
    pub players_connected: u8,
    pub winner: Option<String>,
    pub message: String,
}

impl StatusSnapshot {
    pub fn waiting(players_connected: u8) -> Self {
        let message = if players_connected == 0 {
            "Waiting for players...".to_string()
        } else {
            format!("Waiting for a second player... ({}/2)", players_connected)
        };
        Self {
            phase: GamePhase::Waiting,
            current_player: None,
            my_turn: false,
            players_connected,
            winner: None,
            message,
        }
    }

    pub fn placing_ships(players_connected: u8) -> Self {
        Self {
            phase: GamePhase::PlacingShips,
            current_player: None,
            my_turn: false,
            players_connected,
            winner: None,
            message: "Place your ships".to_string(),
        }
    }

    pub fn playing(current_player: &str, my_turn: bool) -> Self {
        let message = if my_turn {
            "Your turn! Attack the enemy board".to_string()
        } else {
            format!("{}'s turn, hold on...", current_player)
        };
        Self {
            phase: GamePhase::Playing,
            current_player: Some(current_player.to_string()),
            my_turn,
            players_connected: 2,
            winner: None,
            message,
        }
    }

    pub fn finished(winner: &str) -> Self {
        Self {
            phase: GamePhase::Finished,
            current_player: None,
            my_turn: false,
            players_connected: 2,
            winner: Some(winner.to_string()),
            message: format!("Game over! Winner: {}", winner),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    pub fn can_attack(&self) -> bool {
        self.phase == GamePhase::Playing && self.my_turn
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} [{}/2] {}",
            self.phase, self.players_connected, self.message
        )
    }
}
