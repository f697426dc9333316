//! Logical message catalog exchanged between clients and the game engine.

pub mod messages;

pub use messages::{ClientMsg, ServerMsg, Suggestion};
