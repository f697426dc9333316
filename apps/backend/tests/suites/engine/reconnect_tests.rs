// Disconnects and token-based rejoin

use saladbowl::domain::state::{Phase, PlayerStatus};
use saladbowl::{ClientMsg, ErrorCode, ServerMsg};

use crate::support::engine::{is_status, start_engine, test_config, words, TestClient};

fn status_of(msg: &ServerMsg, id: usize) -> Option<PlayerStatus> {
    match msg {
        ServerMsg::PlayerList { players } => players.get(id).map(|p| p.status),
        _ => None,
    }
}

#[tokio::test(start_paused = true)]
async fn rejoin_with_token_keeps_identity() {
    let broker = start_engine(test_config());
    let mut ada = TestClient::connect(&broker);
    let mut bob = TestClient::connect(&broker);
    let (ada_id, ada_token) = ada.join("Ada", None).await;
    bob.join("Bob", None).await;

    drop(ada);
    bob.recv_until(|m| status_of(m, 0) == Some(PlayerStatus::Disconnected))
        .await;
    assert_eq!(broker.connection_count(), 1);

    let mut again = TestClient::connect(&broker);
    let (id, token) = again.join("Someone else", Some(ada_token.as_str())).await;
    assert_eq!((id, token.as_str()), (ada_id, ada_token.as_str()));

    let roster = bob
        .recv_until(|m| status_of(m, 0) == Some(PlayerStatus::Passive))
        .await;
    let ServerMsg::PlayerList { players } = roster else {
        unreachable!()
    };
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "Ada");
}

#[tokio::test(start_paused = true)]
async fn unknown_token_joins_as_a_new_player() {
    let broker = start_engine(test_config());
    let mut ada = TestClient::connect(&broker);
    ada.join("Ada", None).await;

    let mut cy = TestClient::connect(&broker);
    let (id, token) = cy.join("Cy", Some("forged")).await;
    assert_eq!(id, 1);
    assert_ne!(token, "forged");
}

#[tokio::test(start_paused = true)]
async fn second_hello_on_one_connection_is_rejected() {
    let broker = start_engine(test_config());
    let mut ada = TestClient::connect(&broker);
    ada.join("Ada", None).await;
    ada.send(ClientMsg::ClientHello {
        name: "Ada".into(),
        token: None,
    });
    let err = ada
        .recv_until(|m| matches!(m, ServerMsg::Error { .. }))
        .await;
    assert!(matches!(
        err,
        ServerMsg::Error {
            code: ErrorCode::AlreadyJoined,
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn returning_turn_holder_gets_the_same_word() {
    let broker = start_engine(test_config());
    let mut ada = TestClient::connect(&broker);
    let mut bob = TestClient::connect(&broker);
    let (_, ada_token) = ada.join("Ada", None).await;
    bob.join("Bob", None).await;
    ada.send(ClientMsg::StartGame);
    ada.recv_until(is_status(Phase::Suggestions)).await;
    ada.send(words(&["cat", "dog"]));
    bob.send(words(&["sun"]));

    let (word_token, word, _) = ada.next_word().await;
    drop(ada);
    bob.recv_until(|m| status_of(m, 0) == Some(PlayerStatus::Disconnected))
        .await;

    let mut ada = TestClient::connect(&broker);
    ada.join("Ada", Some(ada_token.as_str())).await;
    ada.recv_until(is_status(Phase::Playing)).await;
    let (again_token, again_word, time_left) = ada.next_word().await;
    assert_eq!((again_token.as_str(), again_word.as_str()), (word_token.as_str(), word.as_str()));
    assert!(time_left <= 60.0);

    bob.recv_until(|m| status_of(m, 0) == Some(PlayerStatus::Active))
        .await;
}
