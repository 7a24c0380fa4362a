//! Matchmaking registry: pairs joining players into sessions and routes
//! remote calls to the session that owns the caller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::common::{AttackOutcome, GameError};
use crate::config::FleetPolicy;
use crate::coord::Coordinate;
use crate::notify::{deliver, PlayerHandle};
use crate::player::{Player, PlayerId};
use crate::session::{GameSession, SessionId};
use crate::status::StatusSnapshot;

type SharedSession = Arc<AsyncMutex<GameSession>>;

/// Outcome of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JoinTicket {
    pub player_id: PlayerId,
    pub session_id: SessionId,
}

/// Index state guarded by the registry lock. The lock is never held across an
/// `.await`; session mutation happens under the per-session async mutex.
#[derive(Default)]
struct Registry {
    sessions: HashMap<SessionId, SharedSession>,
    player_sessions: HashMap<PlayerId, SessionId>,
    player_names: HashMap<PlayerId, String>,
    /// The one session currently accepting joins, if any.
    open_session: Option<SessionId>,
}

/// The server-wide matchmaking service.
///
/// Holds a pool of sessions keyed by id plus a pointer to the session that is
/// still accepting players. Ids come from monotone counters, so concurrent
/// joins can never share one.
pub struct GameService {
    state: Mutex<Registry>,
    next_player_id: AtomicU64,
    next_session_id: AtomicU64,
    policy: FleetPolicy,
}

impl GameService {
    pub fn new(policy: FleetPolicy) -> Self {
        Self {
            state: Mutex::new(Registry::default()),
            next_player_id: AtomicU64::new(1),
            next_session_id: AtomicU64::new(1),
            policy,
        }
    }

    /// Seat a new player in the open session, creating one when none exists.
    ///
    /// A seating race (the open session filled up between lookup and seating)
    /// fails with `SessionFull`; the freshly allocated player id is discarded
    /// and no routing state is left behind.
    pub async fn join_game(
        &self,
        name: &str,
        handle: Arc<dyn PlayerHandle>,
    ) -> Result<JoinTicket, GameError> {
        let player_id = PlayerId(self.next_player_id.fetch_add(1, Ordering::Relaxed));
        let (session_id, session) = self.open_session();
        let player = Player::new(player_id, name, handle.clone());
        {
            let mut guard = session.lock().await;
            guard.add_player(player).await?;
            if guard.is_full() {
                let mut state = self.state.lock().unwrap();
                if state.open_session == Some(session_id) {
                    state.open_session = None;
                }
            }
        }
        {
            let mut state = self.state.lock().unwrap();
            state.player_sessions.insert(player_id, session_id);
            state.player_names.insert(player_id, name.to_string());
        }
        log::info!("{} joined {} as {}", name, session_id, player_id);
        deliver(name, handle.on_event("Connected to server. Waiting for opponent...")).await;
        Ok(JoinTicket { player_id, session_id })
    }

    /// Place a ship for `player_id`. Any rejection, including an unknown
    /// player id, comes back as `false`; the remote surface stays simple.
    pub async fn place_ship(&self, player_id: PlayerId, start: Coordinate, end: Coordinate) -> bool {
        match self.session_for(player_id) {
            Some(session) => session.lock().await.place_ship(player_id, start, end).await,
            None => {
                log::warn!("place_ship from unknown {}", player_id);
                false
            }
        }
    }

    /// Attack on behalf of `player_id`, routed to the owning session.
    pub async fn attack(
        &self,
        player_id: PlayerId,
        target: Coordinate,
    ) -> Result<AttackOutcome, GameError> {
        let session = self.session_for(player_id).ok_or(GameError::UnknownPlayer)?;
        let outcome = session.lock().await.attack(player_id, target).await?;
        Ok(outcome)
    }

    /// Status projection for `player_id`. Unknown ids fall back to an empty
    /// waiting snapshot instead of failing.
    pub async fn status(&self, player_id: PlayerId) -> StatusSnapshot {
        match self.session_for(player_id) {
            Some(session) => session.lock().await.status(player_id),
            None => StatusSnapshot::waiting(0),
        }
    }

    /// Remove a player's registry bookkeeping.
    ///
    /// This touches routing state only: the owning session keeps its seat and
    /// the opponent is not told. Abandoned-session handling is a non-goal.
    pub fn disconnect_player(&self, player_id: PlayerId) {
        let mut state = self.state.lock().unwrap();
        let name = state.player_names.remove(&player_id);
        state.player_sessions.remove(&player_id);
        match name {
            Some(name) => log::info!("{} ({}) disconnected", name, player_id),
            None => log::debug!("disconnect for unknown {}", player_id),
        }
    }

    /// Number of players currently registered.
    pub fn connected_players(&self) -> usize {
        self.state.lock().unwrap().player_names.len()
    }

    /// Number of sessions in the pool, finished ones included.
    pub fn active_sessions(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }

    /// Return the session accepting joins, creating and registering a fresh
    /// one when there is none. Atomic with respect to concurrent joins.
    fn open_session(&self) -> (SessionId, SharedSession) {
        let mut state = self.state.lock().unwrap();
        if let Some(id) = state.open_session {
            if let Some(session) = state.sessions.get(&id) {
                return (id, session.clone());
            }
        }
        let id = SessionId(self.next_session_id.fetch_add(1, Ordering::Relaxed));
        let session = Arc::new(AsyncMutex::new(GameSession::new(id, self.policy)));
        state.sessions.insert(id, session.clone());
        state.open_session = Some(id);
        log::info!("created {}", id);
        (id, session)
    }

    fn session_for(&self, player_id: PlayerId) -> Option<SharedSession> {
        let state = self.state.lock().unwrap();
        let session_id = state.player_sessions.get(&player_id)?;
        state.sessions.get(session_id).cloned()
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new(FleetPolicy::default())
    }
}
