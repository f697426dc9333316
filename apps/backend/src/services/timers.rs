//! Delayed delivery of timer events into the engine inbox.

use std::time::Duration;

use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::time::sleep;
use tracing::debug;

use crate::domain::game::TimerEvent;
use crate::ws::broker::{EngineEvent, InboxSender};

/// Timer source. Fired timers are ordinary inbox events, so they never race
/// with command handling. Nothing is cancelled; the game ignores stale ones.
#[derive(Clone)]
pub struct Timers {
    inbox: WeakUnboundedSender<EngineEvent>,
}

impl Timers {
    /// Keeps a weak handle; a timer that fires after shutdown is dropped.
    pub fn new(inbox: &InboxSender) -> Self {
        Self {
            inbox: inbox.downgrade(),
        }
    }

    pub fn schedule(&self, after: Duration, timer: TimerEvent) {
        let inbox = self.inbox.clone();
        tokio::spawn(async move {
            sleep(after).await;
            let delivered = inbox
                .upgrade()
                .is_some_and(|tx| tx.send(EngineEvent::Timer(timer)).is_ok());
            if !delivered {
                debug!(?timer, "timer fired after engine stopped");
            }
        });
    }
}
