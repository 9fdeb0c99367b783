use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::{channel, Sender};
use tokio::sync::oneshot;

use system::{
    ChatMessage, ClientCommand, ConnectionId, PresentationManifest, RoomId, ServerEvent,
};

use crate::connection::{ConnectionCommand, ConnectionEvent};
use crate::connection_tx_storage::ConnectionTxStorage;
use crate::room::Room;
use crate::server_state::ServerState;

pub type ServerTx = Sender<ServerCommand>;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub enum ServerCommand {
    Connection(ConnectionCommand),
    /// Finished conversion result from the upload endpoint. The conversion
    /// call itself runs in the HTTP handler; only the manifest enters the
    /// loop, so a slow upload never stalls drawing or chat.
    ApplyPresentation {
        room_id: RoomId,
        manifest: PresentationManifest,
    },
    DescribeRooms {
        tx: oneshot::Sender<Vec<RoomDescription>>,
    },
    SweepIdleRooms,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomDescription {
    pub room_id: RoomId,
    pub members: usize,
    pub drawing_events: usize,
    pub chat_messages: usize,
    pub sticky_notes: usize,
    pub has_presentation: bool,
}

struct Server {
    state: ServerState,
    connections: ConnectionTxStorage,
    room_ttl: Duration,
}

impl Server {
    fn new(room_ttl: Duration) -> Self {
        Self {
            state: ServerState::new(),
            connections: ConnectionTxStorage::new(),
            room_ttl,
        }
    }

    async fn handle_server_command(&mut self, command: ServerCommand) {
        match command {
            ServerCommand::Connection(command) => self.handle_connection_command(command).await,
            ServerCommand::ApplyPresentation { room_id, manifest } => {
                self.set_presentation(&room_id, manifest, None).await;
            }
            ServerCommand::DescribeRooms { tx } => {
                let _ = tx.send(self.describe_rooms());
            }
            ServerCommand::SweepIdleRooms => {
                self.state.sweep_idle(self.room_ttl);
            }
        }
    }

    async fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { tx } => {
                let connection_id = self.state.create_connection();
                self.connections.insert(connection_id, tx);
                self.connections
                    .send(&connection_id, ConnectionEvent::Connected { connection_id })
                    .await;
            }
            ConnectionCommand::Disconnect { from } => self.disconnect(&from).await,
            ConnectionCommand::FromClient { from, command } => {
                self.handle_client_command(&from, command).await
            }
        }
    }

    async fn handle_client_command(&mut self, from: &ConnectionId, command: ClientCommand) {
        match command {
            ClientCommand::JoinRoom { room_id } => self.join_room(from, &room_id).await,
            ClientCommand::RelayOffer {
                target,
                caller,
                signal,
            } => {
                self.send_event(&target, ServerEvent::PeerWantsToConnect { signal, caller })
                    .await;
            }
            ClientCommand::RelayAnswer { caller, signal } => {
                self.send_event(&caller, ServerEvent::PeerAnswered { signal, from: *from })
                    .await;
            }
            ClientCommand::ScreenShareSignal { room_id, signal } => {
                self.broadcast(
                    &room_id,
                    ServerEvent::ScreenShareSignal {
                        signal,
                        caller: *from,
                    },
                    Some(from),
                )
                .await;
            }
            ClientCommand::SendChat { room_id, body } => {
                let message = ChatMessage {
                    sender: *from,
                    body,
                };
                self.room_mut(&room_id).content.append_chat(message.clone());
                self.broadcast(&room_id, ServerEvent::ChatMessage { message }, None)
                    .await;
            }
            ClientCommand::Draw { room_id, event } => {
                self.room_mut(&room_id).content.append_drawing(event.clone());
                self.broadcast(&room_id, ServerEvent::Drawing { event }, Some(from))
                    .await;
            }
            ClientCommand::ClearBoard { room_id } => {
                self.room_mut(&room_id).content.clear_board();
                self.broadcast(&room_id, ServerEvent::BoardCleared, None).await;
            }
            ClientCommand::CreateNote { room_id, note }
            | ClientCommand::UpdateNote { room_id, note } => {
                self.room_mut(&room_id).content.upsert_note(note);
                self.broadcast_notes(&room_id).await;
            }
            ClientCommand::DeleteNote { room_id, note_id } => {
                self.room_mut(&room_id).content.remove_note(&note_id);
                self.broadcast_notes(&room_id).await;
            }
            ClientCommand::SlideChanged { room_id, index } => {
                self.room_mut(&room_id).content.set_slide_index(index);
                self.broadcast(&room_id, ServerEvent::SlideIndexChanged { index }, Some(from))
                    .await;
            }
            ClientCommand::SharePresentation { room_id, manifest } => {
                self.set_presentation(&room_id, manifest, Some(from)).await;
            }
        }
    }

    /// Replay order: member list for signaling bootstrap first, then the
    /// accumulated logs, all before any live event can reach the joiner.
    async fn join_room(&mut self, from: &ConnectionId, room_id: &str) {
        self.state.join_room(*from, room_id);
        let snapshot = match self.state.rooms.get(room_id) {
            Some(room) => room.snapshot(),
            None => return,
        };

        let others: Vec<ConnectionId> = snapshot
            .members
            .iter()
            .copied()
            .filter(|member| member != from)
            .collect();
        self.send_event(from, ServerEvent::AllOtherMembers { members: others })
            .await;
        self.send_event(
            from,
            ServerEvent::DrawingHistory {
                events: snapshot.drawing_log,
            },
        )
        .await;
        self.send_event(
            from,
            ServerEvent::NotesSnapshot {
                notes: snapshot.sticky_notes,
            },
        )
        .await;
        self.send_event(
            from,
            ServerEvent::ChatHistory {
                messages: snapshot.chat_log,
            },
        )
        .await;
        if let Some(state) = snapshot.presentation {
            self.send_event(from, ServerEvent::PresentationState { state })
                .await;
        }
    }

    async fn set_presentation(
        &mut self,
        room_id: &str,
        manifest: PresentationManifest,
        without: Option<&ConnectionId>,
    ) {
        self.room_mut(room_id).content.set_presentation(manifest);
        let state = self
            .state
            .rooms
            .get(room_id)
            .and_then(|room| room.content.presentation())
            .cloned();
        if let Some(state) = state {
            self.broadcast(room_id, ServerEvent::PresentationState { state }, without)
                .await;
        }
    }

    async fn disconnect(&mut self, from: &ConnectionId) {
        let affected = self.state.disconnect(from);
        for room_id in affected {
            self.broadcast(
                &room_id,
                ServerEvent::MemberLeft {
                    connection_id: *from,
                },
                None,
            )
            .await;
        }
        self.connections
            .send(
                from,
                ConnectionEvent::Disconnected {
                    connection_id: *from,
                },
            )
            .await;
        if self.connections.remove(from).is_some() {
            log::info!("Connection {} disconnected", from);
        }
    }

    async fn broadcast_notes(&mut self, room_id: &str) {
        let notes = match self.state.rooms.get(room_id) {
            Some(room) => room.content.sticky_notes().clone(),
            None => return,
        };
        self.broadcast(room_id, ServerEvent::NotesSnapshot { notes }, None)
            .await;
    }

    async fn broadcast(
        &mut self,
        room_id: &str,
        event: ServerEvent,
        without: Option<&ConnectionId>,
    ) {
        let members = self.state.members_of(room_id).to_vec();
        for connection_id in members {
            if without.map_or(false, |excluded| *excluded == connection_id) {
                continue;
            }
            self.connections
                .send(&connection_id, ConnectionEvent::Event(event.clone()))
                .await;
        }
    }

    async fn send_event(&mut self, to: &ConnectionId, event: ServerEvent) {
        self.connections.send(to, ConnectionEvent::Event(event)).await;
    }

    fn room_mut(&mut self, room_id: &str) -> &mut Room {
        self.state
            .rooms
            .entry(room_id.to_owned())
            .or_insert_with(Room::new)
    }

    fn describe_rooms(&self) -> Vec<RoomDescription> {
        self.state
            .rooms
            .iter()
            .map(|(room_id, room)| RoomDescription {
                room_id: room_id.clone(),
                members: room.members.len(),
                drawing_events: room.content.drawing_log().len(),
                chat_messages: room.content.chat_log().len(),
                sticky_notes: room.content.sticky_notes().len(),
                has_presentation: room.content.presentation().is_some(),
            })
            .collect()
    }
}

pub fn spawn_server(room_ttl: Duration) -> ServerTx {
    let (srv_tx, mut srv_rx) = channel::<ServerCommand>(16);

    let mut sweep_tx = srv_tx.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            if sweep_tx.send(ServerCommand::SweepIdleRooms).await.is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut server = Box::new(Server::new(room_ttl));

        while let Some(command) = srv_rx.recv().await {
            server.handle_server_command(command).await;
        }
    });

    srv_tx
}
