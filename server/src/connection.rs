use actix::{Actor, ActorContext, AsyncContext, Handler, Message, Running, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use actix_web_actors::ws::{CloseCode, CloseReason};

use system::{serde_json, ClientCommand, ConnectionId, ServerEvent};

use crate::connection_tx_storage::ConnectionTx;
use crate::server::{ServerCommand, ServerTx};

#[derive(Debug)]
pub enum ConnectionCommand {
    Connect {
        tx: ConnectionTx,
    },
    Disconnect {
        from: ConnectionId,
    },
    FromClient {
        from: ConnectionId,
        command: ClientCommand,
    },
}

#[derive(Debug)]
pub enum ConnectionEvent {
    Connected { connection_id: ConnectionId },
    Event(ServerEvent),
    Disconnected { connection_id: ConnectionId },
}

#[derive(Message)]
#[rtype(result = "()")]
struct ConnectionActorMessage(ConnectionEvent);

enum ConnectionState {
    Idle,
    Connected(ConnectionId),
}

struct ConnectionActor {
    state: ConnectionState,
    srv_tx: ServerTx,
}

impl ConnectionActor {
    fn forward(&mut self, command: ConnectionCommand) {
        if self
            .srv_tx
            .try_send(ServerCommand::Connection(command))
            .is_err()
        {
            // Fire and forget: a full queue drops the message, it never
            // stalls or kills the socket.
            log::warn!("Server command queue is full; dropping inbound message");
        }
    }

    fn emit(&self, event: &ServerEvent, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(event) {
            Ok(text) => ctx.text(text),
            Err(err) => log::error!("Failed to serialize outbound event: {}", err),
        }
    }
}

impl Actor for ConnectionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<ConnectionEvent>(32);

        if self
            .srv_tx
            .try_send(ServerCommand::Connection(ConnectionCommand::Connect { tx }))
            .is_err()
        {
            log::error!("Server loop is unavailable; refusing connection");
            ctx.stop();
            return;
        }

        let addr = ctx.address().recipient();

        tokio::spawn(async move {
            let addr = addr;
            log::debug!("connection green thread - started");
            while let Some(event) = rx.recv().await {
                if addr.do_send(ConnectionActorMessage(event)).is_err() {
                    break;
                }
            }
            log::debug!("connection green thread - terminated");
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        if let ConnectionState::Connected(id) = self.state {
            self.forward(ConnectionCommand::Disconnect { from: id });
        }

        Running::Stop
    }
}

/// Ingress. Frames are JSON text; anything that does not parse as a
/// ClientCommand closes the socket without touching room state.
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Text(text)) => {
                if let ConnectionState::Connected(from) = self.state {
                    match serde_json::from_str::<ClientCommand>(&text) {
                        Ok(command) => {
                            log::debug!("Ingress from {}: {:?}", from, command);
                            self.forward(ConnectionCommand::FromClient { from, command });
                        }
                        Err(_) => {
                            ctx.close(Some(CloseReason {
                                code: CloseCode::Invalid,
                                description: None,
                            }));
                        }
                    }
                }
            }
            Ok(ws::Message::Close(_)) => {
                if let ConnectionState::Connected(id) = self.state {
                    self.forward(ConnectionCommand::Disconnect { from: id });
                }
                ctx.stop();
            }
            _ => (),
        }
    }
}

/// Egress
impl Handler<ConnectionActorMessage> for ConnectionActor {
    type Result = ();

    fn handle(
        &mut self,
        msg: ConnectionActorMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Self::Result {
        match msg.0 {
            ConnectionEvent::Connected { connection_id } => {
                self.state = ConnectionState::Connected(connection_id);
                self.emit(&ServerEvent::Connected { connection_id }, ctx);
            }
            ConnectionEvent::Event(event) => {
                log::debug!("Egress {:?}", event);
                self.emit(&event, ctx);
            }
            ConnectionEvent::Disconnected { .. } => {
                ctx.close(None);
            }
        }
    }
}

pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    srv_tx: web::Data<ServerTx>,
) -> Result<HttpResponse, Error> {
    ws::start(
        ConnectionActor {
            srv_tx: srv_tx.get_ref().clone(),
            state: ConnectionState::Idle,
        },
        &req,
        stream,
    )
}
