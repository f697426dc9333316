//! Backend test support utilities
//!
//! This crate provides utilities shared by the backend's integration tests:
//! unified logging initialization and assertions over the JSON frames the
//! game server sends to its clients.

pub mod frames;
pub mod test_logging;
