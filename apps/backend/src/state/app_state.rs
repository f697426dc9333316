use std::sync::Arc;

use crate::ws::broker::Broker;

/// Shared resources handed to every HTTP worker.
#[derive(Clone)]
pub struct AppState {
    broker: Arc<Broker>,
}

impl AppState {
    pub fn new(broker: Arc<Broker>) -> Self {
        Self { broker }
    }

    pub fn broker(&self) -> Arc<Broker> {
        Arc::clone(&self.broker)
    }
}
