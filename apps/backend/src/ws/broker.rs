//! Connection registry and event funnel.
//!
//! Every live client gets a `ConnectionId` and a bounded outbound queue.
//! Inbound commands, disconnect notices and fired timers all land in one
//! unbounded inbox consumed by the game engine.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::game::TimerEvent;
use crate::domain::state::ConnectionId;
use crate::protocol::{ClientMsg, ServerMsg};

/// Everything the engine reacts to.
#[derive(Debug)]
pub enum EngineEvent {
    Message {
        from: ConnectionId,
        command: ClientMsg,
        reply: Reply,
    },
    Leave {
        connection: ConnectionId,
    },
    Timer(TimerEvent),
}

pub type Inbox = mpsc::UnboundedReceiver<EngineEvent>;
pub type InboxSender = mpsc::UnboundedSender<EngineEvent>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrokerError {
    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),
    #[error("outbound queue for {0} is closed")]
    Closed(ConnectionId),
    #[error("engine inbox is closed")]
    InboxClosed,
}

/// Private answer channel back to the connection that sent a command.
///
/// Delivery goes through the registry, so a reply to a connection that has
/// since been unregistered is dropped.
#[derive(Debug, Clone)]
pub struct Reply {
    connection: ConnectionId,
    broker: Weak<Broker>,
}

impl Reply {
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Deliver to the requester. Dropped silently if it has gone away.
    pub async fn send(&self, msg: ServerMsg) {
        let Some(broker) = self.broker.upgrade() else {
            debug!(connection = %self.connection, "reply dropped, broker gone");
            return;
        };
        if let Err(err) = broker.unicast(self.connection, msg).await {
            debug!(connection = %self.connection, error = %err, "reply dropped");
        }
    }
}

struct Clients {
    next_id: u64,
    outbound: HashMap<ConnectionId, mpsc::Sender<ServerMsg>>,
}

pub struct Broker {
    clients: Mutex<Clients>,
    inbox: InboxSender,
    capacity: usize,
}

impl Broker {
    /// Create a broker whose outbound queues hold `capacity` messages each.
    /// The returned receiver is the engine inbox.
    pub fn new(capacity: usize) -> (Arc<Self>, Inbox) {
        let (inbox, receiver) = mpsc::unbounded_channel();
        let broker = Arc::new(Self {
            clients: Mutex::new(Clients {
                next_id: 0,
                outbound: HashMap::new(),
            }),
            inbox,
            capacity: capacity.max(1),
        });
        (broker, receiver)
    }

    pub fn register(self: &Arc<Self>) -> Connection {
        let (tx, rx) = mpsc::channel(self.capacity);
        let id = {
            let mut clients = self.clients.lock();
            let id = ConnectionId(clients.next_id);
            clients.next_id += 1;
            clients.outbound.insert(id, tx);
            id
        };
        debug!(connection = %id, "connection registered");

        Connection {
            id,
            broker: Arc::clone(self),
            receiver: Some(rx),
        }
    }

    /// Forget a connection and tell the engine it left. Idempotent.
    pub fn unregister(&self, id: ConnectionId) {
        let removed = self.clients.lock().outbound.remove(&id).is_some();
        if !removed {
            return;
        }
        debug!(connection = %id, "connection unregistered");
        if self
            .inbox
            .send(EngineEvent::Leave { connection: id })
            .is_err()
        {
            debug!(connection = %id, "leave dropped, engine stopped");
        }
    }

    pub async fn unicast(&self, id: ConnectionId, msg: ServerMsg) -> Result<(), BrokerError> {
        let sender = self
            .clients
            .lock()
            .outbound
            .get(&id)
            .cloned()
            .ok_or(BrokerError::UnknownConnection(id))?;
        sender
            .send(msg)
            .await
            .map_err(|_| BrokerError::Closed(id))
    }

    /// Send to every registered connection. Returns how many queues took it.
    ///
    /// A full queue makes this wait; the registry lock is not held meanwhile.
    pub async fn broadcast(&self, msg: ServerMsg) -> usize {
        let targets: Vec<(ConnectionId, mpsc::Sender<ServerMsg>)> = {
            let clients = self.clients.lock();
            clients
                .outbound
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        let mut delivered = 0;
        for (id, tx) in targets {
            match tx.send(msg.clone()).await {
                Ok(()) => delivered += 1,
                Err(_) => warn!(connection = %id, kind = msg.kind(), "broadcast to closed queue"),
            }
        }
        delivered
    }

    pub fn inbox(&self) -> InboxSender {
        self.inbox.clone()
    }

    pub fn connection_count(&self) -> usize {
        self.clients.lock().outbound.len()
    }
}

/// Handle owned by a transport session. Dropping it unregisters.
pub struct Connection {
    id: ConnectionId,
    broker: Arc<Broker>,
    receiver: Option<mpsc::Receiver<ServerMsg>>,
}

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a decoded command for the engine.
    pub fn send(&self, command: ClientMsg) -> Result<(), BrokerError> {
        let reply = Reply {
            connection: self.id,
            broker: Arc::downgrade(&self.broker),
        };
        self.broker
            .inbox
            .send(EngineEvent::Message {
                from: self.id,
                command,
                reply,
            })
            .map_err(|_| BrokerError::InboxClosed)
    }

    /// The outbound stream for this connection. Only available once.
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<ServerMsg>> {
        self.receiver.take()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.broker.unregister(self.id);
    }
}
