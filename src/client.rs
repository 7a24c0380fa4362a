//! Thin typed client over the wire protocol, used by front ends and the
//! end-to-end tests.

use std::collections::VecDeque;

use anyhow::anyhow;
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::net::{read_message, write_message};
use crate::notify::Notice;
use crate::player::PlayerId;
use crate::protocol::{AttackReply, Message};
use crate::service::JoinTicket;
use crate::status::StatusSnapshot;

/// One connection to the match server. Requests are strictly
/// request/response; pushes that arrive while a reply is pending are buffered
/// and read back through [`GameClient::drain_notices`].
pub struct GameClient {
    stream: TcpStream,
    notices: VecDeque<Notice>,
}

impl GameClient {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream,
            notices: VecDeque::new(),
        })
    }

    pub async fn join(&mut self, name: &str) -> anyhow::Result<JoinTicket> {
        match self.request(Message::Join { name: name.to_string() }).await? {
            Message::Joined { player_id, session_id } => Ok(JoinTicket { player_id, session_id }),
            Message::JoinRejected { reason } => Err(anyhow!("join rejected: {}", reason)),
            other => Err(anyhow!("unexpected reply to Join: {:?}", other)),
        }
    }

    pub async fn place_ship(
        &mut self,
        player_id: PlayerId,
        start: (u8, u8),
        end: (u8, u8),
    ) -> anyhow::Result<bool> {
        match self.request(Message::PlaceShip { player_id, start, end }).await? {
            Message::PlaceResult { placed } => Ok(placed),
            other => Err(anyhow!("unexpected reply to PlaceShip: {:?}", other)),
        }
    }

    pub async fn attack(&mut self, player_id: PlayerId, target: (u8, u8)) -> anyhow::Result<AttackReply> {
        match self.request(Message::Attack { player_id, target }).await? {
            Message::AttackResult(reply) => Ok(reply),
            other => Err(anyhow!("unexpected reply to Attack: {:?}", other)),
        }
    }

    pub async fn status(&mut self, player_id: PlayerId) -> anyhow::Result<StatusSnapshot> {
        match self.request(Message::StatusReq { player_id }).await? {
            Message::StatusResp(snapshot) => Ok(snapshot),
            other => Err(anyhow!("unexpected reply to StatusReq: {:?}", other)),
        }
    }

    /// Tell the server to drop our registry entry and close the connection.
    pub async fn disconnect(mut self, player_id: PlayerId) -> anyhow::Result<()> {
        write_message(&mut self.stream, &Message::Disconnect { player_id }).await
    }

    /// Push notifications buffered so far, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Block until at least one push notification is buffered.
    pub async fn wait_for_notice(&mut self) -> anyhow::Result<Notice> {
        if let Some(notice) = self.notices.pop_front() {
            return Ok(notice);
        }
        match as_notice(read_message(&mut self.stream).await?) {
            Ok(notice) => Ok(notice),
            Err(other) => Err(anyhow!("unsolicited reply: {:?}", other)),
        }
    }

    async fn request(&mut self, msg: Message) -> anyhow::Result<Message> {
        write_message(&mut self.stream, &msg).await?;
        loop {
            match as_notice(read_message(&mut self.stream).await?) {
                Ok(notice) => self.notices.push_back(notice),
                Err(reply) => return Ok(reply),
            }
        }
    }
}

/// Split pushes from replies; pushes convert to `Notice`.
fn as_notice(msg: Message) -> Result<Notice, Message> {
    match msg {
        Message::Event { text } => Ok(Notice::Event(text)),
        Message::TurnChanged { my_turn, current_player } => {
            Ok(Notice::TurnChanged { my_turn, current_player })
        }
        Message::GameEnded { winner } => Ok(Notice::GameEnded { winner }),
        Message::OpponentDisconnected => Ok(Notice::OpponentDisconnected),
        other => Err(other),
    }
}
