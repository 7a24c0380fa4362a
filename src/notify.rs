//! The push-notification seam between the session engine and a transport.

use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::config::NOTIFY_TIMEOUT;

/// Abstract handle through which the engine pushes events to one player.
///
/// The transport supplies one implementation (a remote client), tests another
/// ([`RecordingHandle`]). The engine never learns about serialization or
/// retry concerns; delivery failures are reported through the `Result` and
/// handled (logged and swallowed) by the caller.
#[async_trait::async_trait]
pub trait PlayerHandle: Send + Sync {
    /// Free-form game event text.
    async fn on_event(&self, text: &str) -> anyhow::Result<()>;

    /// Turn assignment changed; `my_turn` is from the receiver's perspective.
    async fn on_turn_changed(&self, my_turn: bool, current_player: &str) -> anyhow::Result<()>;

    /// The game finished with the named winner.
    async fn on_game_ended(&self, winner: &str) -> anyhow::Result<()>;

    /// Declared for transports that surface peer loss. The session engine
    /// itself never emits this; disconnection is registry bookkeeping only.
    async fn on_opponent_disconnected(&self) -> anyhow::Result<()>;
}

/// Attempt one push delivery with a bounded timeout. Failures are logged and
/// swallowed; the state transition that triggered the push stands regardless.
pub(crate) async fn deliver(to: &str, attempt: impl Future<Output = anyhow::Result<()>>) {
    match tokio::time::timeout(NOTIFY_TIMEOUT, attempt).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::warn!("failed to notify {}: {}", to, e),
        Err(_) => log::warn!("notification to {} timed out after {:?}", to, NOTIFY_TIMEOUT),
    }
}

/// One delivered notification, as observed by a [`RecordingHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Event(String),
    TurnChanged { my_turn: bool, current_player: String },
    GameEnded { winner: String },
    OpponentDisconnected,
}

/// In-memory [`PlayerHandle`] that records every delivery, in order.
#[derive(Debug, Default)]
pub struct RecordingHandle {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingHandle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All notifications delivered so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    /// Remove and return all recorded notifications.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap())
    }

    fn push(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[async_trait::async_trait]
impl PlayerHandle for RecordingHandle {
    async fn on_event(&self, text: &str) -> anyhow::Result<()> {
        self.push(Notice::Event(text.to_string()));
        Ok(())
    }

    async fn on_turn_changed(&self, my_turn: bool, current_player: &str) -> anyhow::Result<()> {
        self.push(Notice::TurnChanged {
            my_turn,
            current_player: current_player.to_string(),
        });
        Ok(())
    }

    async fn on_game_ended(&self, winner: &str) -> anyhow::Result<()> {
        self.push(Notice::GameEnded {
            winner: winner.to_string(),
        });
        Ok(())
    }

    async fn on_opponent_disconnected(&self) -> anyhow::Result<()> {
        self.push(Notice::OpponentDisconnected);
        Ok(())
    }
}
