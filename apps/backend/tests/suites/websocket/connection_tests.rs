// Connecting, joining and leaving over a real socket

use std::time::Duration;

use serde_json::json;

use crate::support::engine::test_config;
use crate::support::websocket::{start_test_server, wait_for_connections};
use crate::support::websocket_client::WebSocketClient;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn hello_over_websocket_returns_token_and_roster() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(test_config()).await?;
    let mut client = WebSocketClient::connect_retry(&server.ws_url(), TIMEOUT).await?;
    wait_for_connections(&server.broker, 1, TIMEOUT).await?;

    client
        .send_json(&json!({"type": "client_hello", "name": "Ada"}))
        .await?;

    let hello = client.recv_type("server_hello", TIMEOUT).await?;
    assert_eq!(hello["player_id"], 0);
    assert_eq!(hello["token"], "tok-0");

    let roster = client.recv_type("player_list", TIMEOUT).await?;
    assert_eq!(roster["players"][0]["name"], "Ada");
    assert_eq!(roster["players"][0]["team"], "red");
    assert_eq!(roster["players"][0]["status"], "passive");
    assert_eq!(roster["players"][0]["is_owner"], true);

    let status = client.recv_type("game_status", TIMEOUT).await?;
    assert_eq!(status["status"], "lobby");

    client.close().await?;
    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn closing_the_socket_marks_the_player_disconnected() -> Result<(), Box<dyn std::error::Error>>
{
    let server = start_test_server(test_config()).await?;
    let mut ada = WebSocketClient::connect_retry(&server.ws_url(), TIMEOUT).await?;
    let mut bob = WebSocketClient::connect_retry(&server.ws_url(), TIMEOUT).await?;
    wait_for_connections(&server.broker, 2, TIMEOUT).await?;

    ada.send_json(&json!({"type": "client_hello", "name": "Ada"}))
        .await?;
    ada.recv_type("server_hello", TIMEOUT).await?;
    bob.send_json(&json!({"type": "client_hello", "name": "Bob"}))
        .await?;
    bob.recv_type("server_hello", TIMEOUT).await?;

    ada.close().await?;
    wait_for_connections(&server.broker, 1, TIMEOUT).await?;

    loop {
        let roster = bob.recv_type("player_list", TIMEOUT).await?;
        if roster["players"][0]["status"] == "disconnected" {
            assert_eq!(roster["players"][1]["status"], "passive");
            break;
        }
    }

    server.stop().await;
    Ok(())
}
