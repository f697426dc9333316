// Protocol errors keep the socket open

use std::time::Duration;

use serde_json::json;

use crate::support::engine::test_config;
use crate::support::websocket::{start_test_server, wait_for_connections};
use crate::support::websocket_client::WebSocketClient;
use backend_test_support::frames::assert_error_frame;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn malformed_json_is_a_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(test_config()).await?;
    let mut client = WebSocketClient::connect_retry(&server.ws_url(), TIMEOUT).await?;
    wait_for_connections(&server.broker, 1, TIMEOUT).await?;

    client.send_text("{not json").await?;
    let frame = client.recv_type("error", TIMEOUT).await?;
    assert_error_frame(&frame, "BAD_REQUEST");

    // Still connected and usable.
    client
        .send_json(&json!({"type": "client_hello", "name": "Ada"}))
        .await?;
    client.recv_type("server_hello", TIMEOUT).await?;
    assert_eq!(server.broker.connection_count(), 1);

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn unknown_message_type_is_a_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(test_config()).await?;
    let mut client = WebSocketClient::connect_retry(&server.ws_url(), TIMEOUT).await?;

    client
        .send_json(&json!({"type": "steal_points", "amount": 10}))
        .await?;
    let frame = client.recv_type("error", TIMEOUT).await?;
    assert_error_frame(&frame, "BAD_REQUEST");

    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn rule_violations_carry_their_code() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(test_config()).await?;
    let mut client = WebSocketClient::connect_retry(&server.ws_url(), TIMEOUT).await?;

    client.send_json(&json!({"type": "start_game"})).await?;
    let frame = client.recv_type("error", TIMEOUT).await?;
    assert_error_frame(&frame, "NOT_JOINED");

    client
        .send_json(&json!({"type": "client_hello", "name": "Ada"}))
        .await?;
    client.recv_type("server_hello", TIMEOUT).await?;
    client.send_json(&json!({"type": "start_game"})).await?;
    let frame = client.recv_type("error", TIMEOUT).await?;
    assert_error_frame(&frame, "TEAMS_NOT_READY");

    server.stop().await;
    Ok(())
}
