//! Connection plumbing: the broker and the actix WebSocket session.

pub mod broker;
pub mod session;

pub use broker::{Broker, BrokerError, Connection, EngineEvent, Inbox, Reply};
