//! Assertions over server frames
//!
//! The server speaks JSON objects tagged with a `"type"` field. These helpers
//! work on `serde_json::Value` so tests can check the wire contract without
//! depending on the backend's message types.

use serde_json::Value;

/// Return the `"type"` tag of a frame, or `""` when it has none.
pub fn frame_type(frame: &Value) -> &str {
    frame.get("type").and_then(Value::as_str).unwrap_or("")
}

/// Assert that a frame is an error frame carrying the expected code.
pub fn assert_error_frame(frame: &Value, expected_code: &str) {
    assert_eq!(
        frame_type(frame),
        "error",
        "expected an error frame, got {frame}"
    );
    assert_eq!(
        frame.get("code").and_then(Value::as_str),
        Some(expected_code),
        "unexpected error code in {frame}"
    );
    assert!(
        frame.get("message").and_then(Value::as_str).is_some(),
        "error frame without a message: {frame}"
    );
}

/// True if any string anywhere inside the frame equals `needle`.
///
/// Used to prove that secret words never leak to the wrong connection.
pub fn mentions(frame: &Value, needle: &str) -> bool {
    match frame {
        Value::String(s) => s == needle,
        Value::Array(items) => items.iter().any(|item| mentions(item, needle)),
        Value::Object(map) => map.values().any(|item| mentions(item, needle)),
        _ => false,
    }
}
