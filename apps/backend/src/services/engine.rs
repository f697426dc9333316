//! The single task that owns the game.
//!
//! Drains the broker inbox one event at a time, feeds each event to the
//! state machine and carries out the returned effects.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::domain::game::{Effect, Effects, Game};
use crate::protocol::ServerMsg;
use crate::services::timers::Timers;
use crate::ws::broker::{Broker, EngineEvent, Inbox, Reply};

pub struct GameEngine {
    game: Game,
    broker: Arc<Broker>,
    inbox: Inbox,
    timers: Timers,
}

impl GameEngine {
    pub fn new(config: GameConfig, broker: Arc<Broker>, inbox: Inbox) -> Self {
        Self::with_game(Game::new(config), broker, inbox)
    }

    /// Drive an already constructed game, e.g. one with deterministic tokens.
    pub fn with_game(game: Game, broker: Arc<Broker>, inbox: Inbox) -> Self {
        let timers = Timers::new(&broker.inbox());
        Self {
            game,
            broker,
            inbox,
            timers,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until the inbox closes, which in practice is process shutdown.
    pub async fn run(self) {
        let GameEngine {
            mut game,
            broker,
            mut inbox,
            timers,
        } = self;

        info!(
            rounds = game.config().rounds,
            max_words = game.config().max_words,
            turn_secs = game.config().turn_time.as_secs(),
            "[ENGINE] started"
        );

        while let Some(event) = inbox.recv().await {
            let now = Instant::now().into_std();
            match event {
                EngineEvent::Message {
                    from,
                    command,
                    reply,
                } => {
                    let kind = command.kind();
                    debug!(connection = %from, command = kind, "[ENGINE] command");
                    match game.handle_command(from, command, now) {
                        Ok(effects) => apply(&broker, &timers, effects, Some(&reply)).await,
                        Err(err) => {
                            warn!(
                                connection = %from,
                                command = kind,
                                code = %err.code(),
                                error = %err,
                                "[ENGINE] command rejected"
                            );
                            reply.send(ServerMsg::error(&err)).await;
                        }
                    }
                }
                EngineEvent::Leave { connection } => {
                    debug!(connection = %connection, "[ENGINE] connection left");
                    let effects = game.handle_leave(connection);
                    apply(&broker, &timers, effects, None).await;
                }
                EngineEvent::Timer(timer) => {
                    debug!(?timer, phase = %game.phase(), "[ENGINE] timer fired");
                    let effects = game.handle_timer(timer, now);
                    apply(&broker, &timers, effects, None).await;
                }
            }
        }

        info!("[ENGINE] inbox closed, stopping");
    }
}

async fn apply(broker: &Broker, timers: &Timers, effects: Effects, reply: Option<&Reply>) {
    for effect in effects {
        match effect {
            Effect::Reply(msg) => match reply {
                Some(reply) => reply.send(msg).await,
                None => warn!(kind = msg.kind(), "[ENGINE] reply without a requester dropped"),
            },
            Effect::Unicast { to, msg } => {
                if let Err(err) = broker.unicast(to, msg).await {
                    warn!(connection = %to, error = %err, "[ENGINE] unicast failed");
                }
            }
            Effect::Broadcast(msg) => {
                broker.broadcast(msg).await;
            }
            Effect::Schedule { after, timer } => timers.schedule(after, timer),
        }
    }
}
