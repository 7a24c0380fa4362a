//! TCP front end: length-prefixed bincode frames, the accept loop, and the
//! per-connection push handle.

use std::sync::Arc;

use anyhow::anyhow;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::common::GameError;
use crate::coord::Coordinate;
use crate::notify::PlayerHandle;
use crate::player::PlayerId;
use crate::protocol::{AttackReply, Message};
use crate::service::GameService;

/// Maximum frame size; larger frames are rejected before allocation.
pub const MAX_MESSAGE_SIZE: u32 = 64 * 1024;

/// Push messages queued per connection before delivery attempts time out.
const PUSH_QUEUE_DEPTH: usize = 32;

/// Read one frame: u32 big-endian length followed by a bincode `Message`.
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> anyhow::Result<Message> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf);
    if len == 0 || len > MAX_MESSAGE_SIZE {
        return Err(anyhow!("invalid message length: {}", len));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await?;
    let msg = bincode::deserialize(&buf).map_err(|e| anyhow!("deserialization error: {}", e))?;
    Ok(msg)
}

/// Write one length-prefixed bincode frame.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, msg: &Message) -> anyhow::Result<()> {
    let data = bincode::serialize(msg).map_err(|e| anyhow!("serialization error: {}", e))?;
    if data.len() as u32 > MAX_MESSAGE_SIZE {
        return Err(anyhow!("message too large: {} bytes", data.len()));
    }
    writer.write_all(&(data.len() as u32).to_be_bytes()).await?;
    writer.write_all(&data).await?;
    Ok(())
}

/// Push channel for one remote client. Implements the notification handle by
/// queueing frames to the connection's writer task, so the session lock is
/// never held on network I/O.
struct RemoteHandle {
    tx: mpsc::Sender<Message>,
}

impl RemoteHandle {
    async fn push(&self, msg: Message) -> anyhow::Result<()> {
        self.tx.send(msg).await.map_err(|_| anyhow!("peer connection closed"))
    }
}

#[async_trait::async_trait]
impl PlayerHandle for RemoteHandle {
    async fn on_event(&self, text: &str) -> anyhow::Result<()> {
        self.push(Message::Event { text: text.to_string() }).await
    }

    async fn on_turn_changed(&self, my_turn: bool, current_player: &str) -> anyhow::Result<()> {
        self.push(Message::TurnChanged {
            my_turn,
            current_player: current_player.to_string(),
        })
        .await
    }

    async fn on_game_ended(&self, winner: &str) -> anyhow::Result<()> {
        self.push(Message::GameEnded { winner: winner.to_string() }).await
    }

    async fn on_opponent_disconnected(&self) -> anyhow::Result<()> {
        self.push(Message::OpponentDisconnected).await
    }
}

/// Accept loop: one task per client connection.
pub async fn serve(service: Arc<GameService>, listener: TcpListener) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        log::info!("connection from {}", peer);
        let service = service.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(service, stream).await {
                log::warn!("connection {} closed: {}", peer, e);
            }
        });
    }
}

async fn handle_client(service: Arc<GameService>, stream: TcpStream) -> anyhow::Result<()> {
    let (mut reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::channel::<Message>(PUSH_QUEUE_DEPTH);

    // Replies and pushes share one writer task, which also serializes them.
    let writer_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = write_message(&mut writer, &msg).await {
                log::debug!("write failed: {}", e);
                break;
            }
        }
    });

    let mut joined: Option<PlayerId> = None;
    loop {
        let msg = match read_message(&mut reader).await {
            Ok(msg) => msg,
            Err(e) => {
                log::debug!("read loop ended: {}", e);
                break;
            }
        };
        let reply = match msg {
            Message::Join { name } => {
                let handle = Arc::new(RemoteHandle { tx: tx.clone() });
                match service.join_game(&name, handle).await {
                    Ok(ticket) => {
                        joined = Some(ticket.player_id);
                        Message::Joined {
                            player_id: ticket.player_id,
                            session_id: ticket.session_id,
                        }
                    }
                    Err(e) => Message::JoinRejected { reason: e.to_string() },
                }
            }
            Message::PlaceShip { player_id, start, end } => {
                let placed = match (Coordinate::new(start.0, start.1), Coordinate::new(end.0, end.1)) {
                    (Ok(s), Ok(e)) => service.place_ship(player_id, s, e).await,
                    _ => false,
                };
                Message::PlaceResult { placed }
            }
            Message::Attack { player_id, target } => {
                let reply = match Coordinate::new(target.0, target.1) {
                    Ok(target) => match service.attack(player_id, target).await {
                        Ok(outcome) => AttackReply::Outcome(outcome),
                        Err(GameError::NotYourTurn) => AttackReply::NotYourTurn,
                        Err(_) => AttackReply::UnknownSession,
                    },
                    Err(e) => AttackReply::Rejected { reason: e.to_string() },
                };
                Message::AttackResult(reply)
            }
            Message::StatusReq { player_id } => Message::StatusResp(service.status(player_id).await),
            Message::Disconnect { player_id } => {
                service.disconnect_player(player_id);
                if joined == Some(player_id) {
                    joined = None;
                }
                continue;
            }
            other => {
                log::warn!("ignoring non-request message from client: {:?}", other);
                continue;
            }
        };
        if tx.send(reply).await.is_err() {
            break;
        }
    }

    // Dropped connection: clear registry bookkeeping for the seated player.
    if let Some(player_id) = joined {
        service.disconnect_player(player_id);
    }
    // The session may keep push-handle clones of `tx` alive indefinitely, so
    // abort the writer instead of waiting for the channel to drain. Later
    // pushes fail fast and the session logs and swallows them.
    writer_task.abort();
    Ok(())
}
