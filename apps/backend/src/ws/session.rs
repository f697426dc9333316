use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, warn};

use crate::protocol::{ClientMsg, ServerMsg};
use crate::state::app_state::AppState;
use crate::ws::broker::{Broker, Connection};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(app_state.broker());
    ws::start(session, &req, stream)
}

/// One WebSocket client. Decodes frames into commands for the broker and
/// writes the connection's outbound queue back to the socket.
pub struct WsSession {
    broker: Arc<Broker>,
    connection: Option<Connection>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(broker: Arc<Broker>) -> Self {
        Self {
            broker,
            connection: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    /// Decode one frame and hand it to the engine. Undecodable input is
    /// answered with an error frame; the socket stays open.
    fn forward(&mut self, payload: &[u8], ctx: &mut ws::WebsocketContext<Self>) {
        let command = match serde_json::from_slice::<ClientMsg>(payload) {
            Ok(command) => command,
            Err(err) => {
                debug!(error = %err, "[WS SESSION] undecodable frame");
                Self::send_json(ctx, &ServerMsg::bad_request(format!("Malformed message: {err}")));
                return;
            }
        };

        let Some(connection) = &self.connection else {
            return;
        };
        if let Err(err) = connection.send(command) {
            error!(connection = %connection.id(), error = %err, "[WS SESSION] engine unavailable");
            ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
            ctx.stop();
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    connection = ?actor.connection.as_ref().map(Connection::id),
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let mut connection = self.broker.register();
        if let Some(outbound) = connection.take_receiver() {
            ctx.add_stream(ReceiverStream::new(outbound));
        }
        info!(connection = %connection.id(), "[WS SESSION] started");
        self.connection = Some(connection);

        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        // Dropping the handle unregisters it and notifies the engine.
        if let Some(connection) = self.connection.take() {
            info!(connection = %connection.id(), "[WS SESSION] stopped");
        }
    }
}

/// Outbound messages queued for this connection.
impl StreamHandler<ServerMsg> for WsSession {
    fn handle(&mut self, msg: ServerMsg, ctx: &mut Self::Context) {
        Self::send_json(ctx, &msg);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                self.forward(text.as_bytes(), ctx);
            }
            Ok(ws::Message::Binary(bytes)) => {
                self.last_heartbeat = Instant::now();
                self.forward(&bytes, ctx);
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    connection = ?self.connection.as_ref().map(Connection::id),
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
