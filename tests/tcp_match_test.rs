use std::sync::Arc;

use flotilla::protocol::AttackReply;
use flotilla::{
    serve, AttackOutcome, FleetPolicy, GameClient, GamePhase, GameService, Notice, PlayerId,
};
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};

async fn wait_for_phase(client: &mut GameClient, player_id: PlayerId, phase: GamePhase) {
    for _ in 0..100 {
        if client.status(player_id).await.unwrap().phase == phase {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {:?}", phase);
}

#[tokio::test(flavor = "multi_thread")]
async fn full_match_over_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let service = Arc::new(GameService::new(FleetPolicy::new(1)));
    tokio::spawn(serve(service, listener));

    let mut alice = GameClient::connect(addr).await?;
    let mut bob = GameClient::connect(addr).await?;

    let a = alice.join("alice").await?;
    let b = bob.join("bob").await?;
    assert_eq!(a.session_id, b.session_id);
    assert_ne!(a.player_id, b.player_id);

    wait_for_phase(&mut alice, a.player_id, GamePhase::PlacingShips).await;
    assert!(alice.place_ship(a.player_id, (0, 0), (0, 1)).await?);
    assert!(bob.place_ship(b.player_id, (0, 0), (0, 1)).await?);

    wait_for_phase(&mut alice, a.player_id, GamePhase::Playing).await;
    assert!(alice.status(a.player_id).await?.my_turn);

    // bob cannot move out of turn
    assert!(matches!(
        bob.attack(b.player_id, (5, 5)).await?,
        AttackReply::NotYourTurn
    ));

    // an out-of-bounds target is rejected outright
    assert!(matches!(
        alice.attack(a.player_id, (0, 10)).await?,
        AttackReply::Rejected { .. }
    ));

    // alice sinks bob's only ship in two hits, keeping the turn in between
    assert!(matches!(
        alice.attack(a.player_id, (0, 0)).await?,
        AttackReply::Outcome(AttackOutcome::Hit)
    ));
    assert!(alice.status(a.player_id).await?.my_turn);
    assert!(matches!(
        alice.attack(a.player_id, (0, 1)).await?,
        AttackReply::Outcome(AttackOutcome::SunkAndGameOver)
    ));

    let status = alice.status(a.player_id).await?;
    assert_eq!(status.phase, GamePhase::Finished);
    assert_eq!(status.winner.as_deref(), Some("alice"));

    // the loser was pushed the game-end notification
    wait_for_phase(&mut bob, b.player_id, GamePhase::Finished).await;
    let ended = Notice::GameEnded {
        winner: "alice".to_string(),
    };
    assert!(bob.drain_notices().contains(&ended));

    bob.disconnect(b.player_id).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn third_client_waits_in_a_new_session() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let service = Arc::new(GameService::default());
    tokio::spawn(serve(service, listener));

    let mut alice = GameClient::connect(addr).await?;
    let mut bob = GameClient::connect(addr).await?;
    let mut carol = GameClient::connect(addr).await?;

    let a = alice.join("alice").await?;
    let b = bob.join("bob").await?;
    let c = carol.join("carol").await?;

    assert_eq!(a.session_id, b.session_id);
    assert_ne!(c.session_id, a.session_id);

    let status = carol.status(c.player_id).await?;
    assert_eq!(status.phase, GamePhase::Waiting);
    assert_eq!(status.players_connected, 1);
    Ok(())
}
