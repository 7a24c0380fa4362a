use std::sync::Arc;

use flotilla::{
    AttackOutcome, Coordinate, FleetPolicy, GameError, GamePhase, GameSession, Notice, Player,
    PlayerId, RecordingHandle, SessionId,
};

fn c(col: u8, row: u8) -> Coordinate {
    Coordinate::new(col, row).unwrap()
}

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);

async fn seated(policy: FleetPolicy) -> (GameSession, Arc<RecordingHandle>, Arc<RecordingHandle>) {
    let mut session = GameSession::new(SessionId(1), policy);
    let h1 = RecordingHandle::new();
    let h2 = RecordingHandle::new();
    session
        .add_player(Player::new(ALICE, "alice", h1.clone()))
        .await
        .unwrap();
    session
        .add_player(Player::new(BOB, "bob", h2.clone()))
        .await
        .unwrap();
    (session, h1, h2)
}

/// Both players place one two-cell ship under a fleet policy of 1, bringing
/// the session to PLAYING with alice holding the turn.
async fn playing_session() -> (GameSession, Arc<RecordingHandle>, Arc<RecordingHandle>) {
    let (mut session, h1, h2) = seated(FleetPolicy::new(1)).await;
    assert!(session.place_ship(ALICE, c(0, 0), c(0, 1)).await);
    assert!(session.place_ship(BOB, c(0, 0), c(0, 1)).await);
    assert_eq!(session.phase(), GamePhase::Playing);
    (session, h1, h2)
}

#[tokio::test]
async fn first_seat_stays_waiting() {
    let mut session = GameSession::new(SessionId(1), FleetPolicy::default());
    let h1 = RecordingHandle::new();
    session
        .add_player(Player::new(ALICE, "alice", h1.clone()))
        .await
        .unwrap();
    assert_eq!(session.phase(), GamePhase::Waiting);
    assert!(!session.is_full());
    assert_eq!(
        h1.notices(),
        vec![Notice::Event("Waiting for a second player...".to_string())]
    );
}

#[tokio::test]
async fn second_seat_starts_placement_and_names_opponents() {
    let (session, h1, h2) = seated(FleetPolicy::default()).await;
    assert_eq!(session.phase(), GamePhase::PlacingShips);
    assert!(session.is_full());

    let n1 = h1.notices();
    assert!(n1.contains(&Notice::Event("Opponent connected: bob".to_string())));
    assert!(n1.contains(&Notice::Event("Place your ships!".to_string())));
    let n2 = h2.notices();
    assert!(n2.contains(&Notice::Event("Playing against: alice".to_string())));
}

#[tokio::test]
async fn third_seat_rejected() {
    let (mut session, _h1, _h2) = seated(FleetPolicy::default()).await;
    let h3 = RecordingHandle::new();
    assert_eq!(
        session
            .add_player(Player::new(PlayerId(3), "carol", h3))
            .await
            .unwrap_err(),
        GameError::SessionFull
    );
}

#[tokio::test]
async fn placement_before_both_seated_is_rejected() {
    let mut session = GameSession::new(SessionId(1), FleetPolicy::default());
    let h1 = RecordingHandle::new();
    session
        .add_player(Player::new(ALICE, "alice", h1))
        .await
        .unwrap();
    assert!(!session.place_ship(ALICE, c(0, 0), c(0, 4)).await);
}

#[tokio::test]
async fn game_starts_when_both_fleets_complete() {
    let (mut session, h1, h2) = seated(FleetPolicy::new(2)).await;

    assert!(session.place_ship(ALICE, c(0, 0), c(0, 4)).await);
    assert!(session.place_ship(ALICE, c(2, 0), c(2, 3)).await);
    assert_eq!(session.phase(), GamePhase::PlacingShips, "bob not done yet");

    assert!(session.place_ship(BOB, c(0, 0), c(0, 4)).await);
    h1.drain();
    h2.drain();
    assert!(session.place_ship(BOB, c(2, 0), c(2, 3)).await);
    assert_eq!(session.phase(), GamePhase::Playing);

    // first-seated player holds the first turn, from each perspective
    assert!(session.status(ALICE).my_turn);
    assert!(!session.status(BOB).my_turn);
    assert!(h1.notices().contains(&Notice::TurnChanged {
        my_turn: true,
        current_player: "alice".to_string()
    }));
    assert!(h2.notices().contains(&Notice::TurnChanged {
        my_turn: false,
        current_player: "alice".to_string()
    }));
}

#[tokio::test]
async fn placement_rejection_reports_false_without_notice() {
    let (mut session, h1, _h2) = seated(FleetPolicy::default()).await;
    assert!(session.place_ship(ALICE, c(0, 0), c(0, 4)).await);
    h1.drain();
    // overlaps the first ship
    assert!(!session.place_ship(ALICE, c(0, 2), c(3, 2)).await);
    assert_eq!(h1.notices(), vec![]);
}

#[tokio::test]
async fn attack_out_of_turn_rejected() {
    let (mut session, _h1, _h2) = playing_session().await;
    assert_eq!(
        session.attack(BOB, c(0, 0)).await.unwrap_err(),
        GameError::NotYourTurn
    );
    // rejection is caller-only: alice still holds the turn
    assert!(session.status(ALICE).my_turn);
}

#[tokio::test]
async fn attack_during_placement_rejected() {
    let (mut session, _h1, _h2) = seated(FleetPolicy::default()).await;
    assert_eq!(
        session.attack(ALICE, c(0, 0)).await.unwrap_err(),
        GameError::NotYourTurn
    );
}

#[tokio::test]
async fn hit_keeps_the_turn_miss_passes_it() {
    let (mut session, _h1, _h2) = playing_session().await;

    assert_eq!(session.attack(ALICE, c(0, 0)).await.unwrap(), AttackOutcome::Hit);
    assert!(session.status(ALICE).my_turn, "attacker goes again on hit");

    assert_eq!(session.attack(ALICE, c(5, 5)).await.unwrap(), AttackOutcome::Miss);
    assert!(session.status(BOB).my_turn, "miss passes the turn");
    assert!(!session.status(ALICE).my_turn);
}

#[tokio::test]
async fn non_final_sink_keeps_the_turn() {
    let (mut session, _h1, _h2) = seated(FleetPolicy::new(2)).await;
    for id in [ALICE, BOB] {
        assert!(session.place_ship(id, c(0, 0), c(0, 1)).await);
        assert!(session.place_ship(id, c(5, 5), c(5, 5)).await);
    }
    assert_eq!(session.phase(), GamePhase::Playing);

    assert_eq!(session.attack(ALICE, c(0, 0)).await.unwrap(), AttackOutcome::Hit);
    assert_eq!(session.attack(ALICE, c(0, 1)).await.unwrap(), AttackOutcome::Sunk);
    assert!(session.status(ALICE).my_turn, "non-final sink keeps the turn");
}

#[tokio::test]
async fn repeat_attack_returns_already_attacked_and_keeps_turn() {
    let (mut session, _h1, _h2) = playing_session().await;
    session.attack(ALICE, c(0, 0)).await.unwrap();
    assert_eq!(
        session.attack(ALICE, c(0, 0)).await.unwrap(),
        AttackOutcome::AlreadyAttacked
    );
    assert!(session.status(ALICE).my_turn);
}

#[tokio::test]
async fn final_sink_finishes_the_session() {
    let (mut session, h1, h2) = playing_session().await;

    assert_eq!(session.attack(ALICE, c(0, 0)).await.unwrap(), AttackOutcome::Hit);
    assert_eq!(
        session.attack(ALICE, c(0, 1)).await.unwrap(),
        AttackOutcome::SunkAndGameOver
    );
    assert_eq!(session.phase(), GamePhase::Finished);

    // both players told, winner named after the attacker
    assert!(h1.notices().contains(&Notice::GameEnded {
        winner: "alice".to_string()
    }));
    assert!(h2.notices().contains(&Notice::GameEnded {
        winner: "alice".to_string()
    }));

    // terminal: no further attacks or placements
    assert_eq!(
        session.attack(BOB, c(5, 5)).await.unwrap_err(),
        GameError::NotYourTurn
    );
    assert!(!session.place_ship(BOB, c(7, 7), c(7, 8)).await);

    let status = session.status(BOB);
    assert_eq!(status.phase, GamePhase::Finished);
    assert_eq!(status.winner.as_deref(), Some("alice"));
}

#[tokio::test]
async fn attack_notifications_use_role_phrasing() {
    let (mut session, h1, h2) = playing_session().await;
    h1.drain();
    h2.drain();
    session.attack(ALICE, c(0, 0)).await.unwrap();

    assert_eq!(
        h1.notices(),
        vec![Notice::Event("You attacked (0,0): hit".to_string())]
    );
    assert_eq!(
        h2.notices(),
        vec![Notice::Event("alice attacked (0,0): hit".to_string())]
    );
}

#[tokio::test]
async fn status_is_safe_for_unseated_ids() {
    let session = GameSession::new(SessionId(7), FleetPolicy::default());
    let status = session.status(PlayerId(99));
    assert_eq!(status.phase, GamePhase::Waiting);
    assert_eq!(status.players_connected, 0);
    assert!(!status.my_turn);
}
