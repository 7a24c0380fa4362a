//! Wire messages exchanged between clients and the match server.

use crate::common::AttackOutcome;
use crate::player::PlayerId;
use crate::session::SessionId;
use crate::status::StatusSnapshot;

/// Everything that travels over a connection, in both directions. Requests
/// get exactly one reply (except `Disconnect`); push variants may arrive at
/// any time.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Message {
    // Client requests. Coordinates travel raw and are validated server-side.
    Join { name: String },
    PlaceShip { player_id: PlayerId, start: (u8, u8), end: (u8, u8) },
    Attack { player_id: PlayerId, target: (u8, u8) },
    StatusReq { player_id: PlayerId },
    Disconnect { player_id: PlayerId },

    // Server replies.
    Joined { player_id: PlayerId, session_id: SessionId },
    JoinRejected { reason: String },
    PlaceResult { placed: bool },
    AttackResult(AttackReply),
    StatusResp(StatusSnapshot),

    // Server pushes, mirroring the notification handle.
    Event { text: String },
    TurnChanged { my_turn: bool, current_player: String },
    GameEnded { winner: String },
    OpponentDisconnected,
}

/// Reply to an attack request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum AttackReply {
    Outcome(AttackOutcome),
    NotYourTurn,
    UnknownSession,
    /// Request was malformed, e.g. an out-of-bounds target.
    Rejected { reason: String },
}
