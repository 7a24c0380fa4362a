//! The per-match state machine: seating, placement, turns and win detection.

use core::fmt;

use crate::common::{AttackOutcome, GameError};
use crate::config::FleetPolicy;
use crate::coord::Coordinate;
use crate::notify::deliver;
use crate::player::{Player, PlayerId};
use crate::status::{GamePhase, StatusSnapshot};

/// Identity of one two-player match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// One match from seating through finish.
///
/// Sessions are mutated only behind the registry's per-session
/// `tokio::sync::Mutex`, so every transition here is linearizable. All
/// notification delivery is bounded and fire-and-forget: a peer that cannot
/// be reached never rolls back or blocks a transition.
pub struct GameSession {
    id: SessionId,
    players: [Option<Player>; 2],
    current_turn: Option<PlayerId>,
    phase: GamePhase,
    winner: Option<String>,
    policy: FleetPolicy,
}

impl GameSession {
    pub fn new(id: SessionId, policy: FleetPolicy) -> Self {
        Self {
            id,
            players: [None, None],
            current_turn: None,
            phase: GamePhase::Waiting,
            winner: None,
            policy,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_full(&self) -> bool {
        self.players.iter().all(Option::is_some)
    }

    /// Seat a player, first-come first-served. The second seat moves the
    /// session to PLACING_SHIPS and tells both players who they face.
    pub async fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.players[0].is_none() {
            let name = player.name.clone();
            let handle = player.handle.clone();
            self.players[0] = Some(player);
            deliver(&name, handle.on_event("Waiting for a second player...")).await;
            return Ok(());
        }
        if self.players[1].is_some() {
            return Err(GameError::SessionFull);
        }
        let (first_name, first_handle) = match &self.players[0] {
            Some(p) => (p.name.clone(), p.handle.clone()),
            None => return Err(GameError::SessionFull),
        };
        let second_name = player.name.clone();
        let second_handle = player.handle.clone();
        self.players[1] = Some(player);
        self.phase = GamePhase::PlacingShips;
        log::info!("{}: {} vs {}, placing ships", self.id, first_name, second_name);

        deliver(
            &first_name,
            first_handle.on_event(&format!("Opponent connected: {}", second_name)),
        )
        .await;
        deliver(
            &second_name,
            second_handle.on_event(&format!("Playing against: {}", first_name)),
        )
        .await;
        self.notify_both("Place your ships!").await;
        Ok(())
    }

    /// Place a ship on the calling player's board during PLACING_SHIPS.
    /// Returns `false` for any rejection: wrong phase, unknown player, bad
    /// geometry or spacing. Once both fleets satisfy the policy the session
    /// starts PLAYING with the first-seated player holding the turn.
    pub async fn place_ship(&mut self, player_id: PlayerId, start: Coordinate, end: Coordinate) -> bool {
        if self.phase != GamePhase::PlacingShips {
            return false;
        }
        let Some(i) = self.index_of(player_id) else {
            return false;
        };
        let (count, name, handle) = {
            let player = match &mut self.players[i] {
                Some(p) => p,
                None => return false,
            };
            if let Err(e) = player.board.place_ship(start, end) {
                log::debug!("{}: rejected ship for {}: {}", self.id, player.name, e);
                return false;
            }
            (player.board.ship_count(), player.name.clone(), player.handle.clone())
        };
        deliver(
            &name,
            handle.on_event(&format!("Ship placed ({}/{})", count, self.policy.required_ships)),
        )
        .await;
        if self.fleets_complete() {
            self.start_game().await;
        }
        true
    }

    /// Resolve an attack by the turn holder against the opponent's board.
    ///
    /// Rejected with `NotYourTurn` outside PLAYING or when the caller does
    /// not hold the turn. The turn passes to the opponent only on a miss;
    /// hits and non-final sinks let the attacker go again. A final sink
    /// finishes the session and names the attacker winner.
    pub async fn attack(&mut self, player_id: PlayerId, target: Coordinate) -> Result<AttackOutcome, GameError> {
        if self.phase != GamePhase::Playing || self.current_turn != Some(player_id) {
            return Err(GameError::NotYourTurn);
        }
        let ai = self.index_of(player_id).ok_or(GameError::UnknownPlayer)?;
        let (attacker_name, attacker_handle) = match &self.players[ai] {
            Some(p) => (p.name.clone(), p.handle.clone()),
            None => return Err(GameError::UnknownPlayer),
        };
        let (outcome, defender_name, defender_handle) = match &mut self.players[1 - ai] {
            Some(p) => (p.board.receive_attack(target), p.name.clone(), p.handle.clone()),
            None => return Err(GameError::UnknownPlayer),
        };

        deliver(
            &attacker_name,
            attacker_handle.on_event(&format!("You attacked {}: {}", target, outcome)),
        )
        .await;
        deliver(
            &defender_name,
            defender_handle.on_event(&format!("{} attacked {}: {}", attacker_name, target, outcome)),
        )
        .await;

        match outcome {
            AttackOutcome::SunkAndGameOver => {
                self.phase = GamePhase::Finished;
                self.winner = Some(attacker_name.clone());
                log::info!("{}: {} wins", self.id, attacker_name);
                deliver(&attacker_name, attacker_handle.on_game_ended(&attacker_name)).await;
                deliver(&defender_name, defender_handle.on_game_ended(&attacker_name)).await;
            }
            AttackOutcome::Miss => self.switch_turn().await,
            // Hit, non-final sink, repeat attack: the attacker keeps the turn.
            _ => {}
        }
        Ok(outcome)
    }

    /// Status projection for `player_id`. A pure read, valid in any phase and
    /// also for ids that were never seated here.
    pub fn status(&self, player_id: PlayerId) -> StatusSnapshot {
        let players_connected = self.players.iter().flatten().count() as u8;
        match self.phase {
            GamePhase::Waiting => StatusSnapshot::waiting(players_connected),
            GamePhase::PlacingShips => StatusSnapshot::placing_ships(players_connected),
            GamePhase::Playing => {
                let current_name = self
                    .current_turn
                    .and_then(|id| self.index_of(id))
                    .and_then(|i| self.players[i].as_ref())
                    .map(|p| p.name.as_str())
                    .unwrap_or("");
                StatusSnapshot::playing(current_name, self.current_turn == Some(player_id))
            }
            GamePhase::Finished => StatusSnapshot::finished(self.winner.as_deref().unwrap_or("")),
        }
    }

    fn index_of(&self, player_id: PlayerId) -> Option<usize> {
        self.players
            .iter()
            .position(|slot| slot.as_ref().map(|p| p.id) == Some(player_id))
    }

    fn fleets_complete(&self) -> bool {
        let mut seated = 0;
        for p in self.players.iter().flatten() {
            seated += 1;
            if !self.policy.is_complete(&p.board) {
                return false;
            }
        }
        seated == 2
    }

    async fn start_game(&mut self) {
        let Some((first_id, first_name)) = self.players[0].as_ref().map(|p| (p.id, p.name.clone()))
        else {
            return;
        };
        self.phase = GamePhase::Playing;
        self.current_turn = Some(first_id);
        log::info!("{}: game started, {} attacks first", self.id, first_name);
        self.notify_both(&format!("Game on! {} attacks first.", first_name)).await;
        self.notify_turn(&first_name).await;
    }

    async fn switch_turn(&mut self) {
        let Some(next_index) = self.current_turn.and_then(|id| self.index_of(id)).map(|i| 1 - i)
        else {
            return;
        };
        let Some((next_id, next_name)) =
            self.players[next_index].as_ref().map(|p| (p.id, p.name.clone()))
        else {
            return;
        };
        self.current_turn = Some(next_id);
        self.notify_turn(&next_name).await;
    }

    async fn notify_turn(&self, current_name: &str) {
        for p in self.players.iter().flatten() {
            let mine = self.current_turn == Some(p.id);
            deliver(&p.name, p.handle.on_turn_changed(mine, current_name)).await;
        }
    }

    async fn notify_both(&self, text: &str) {
        for p in self.players.iter().flatten() {
            deliver(&p.name, p.handle.on_event(text)).await;
        }
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("players", &self.players)
            .field("current_turn", &self.current_turn)
            .finish()
    }
}
