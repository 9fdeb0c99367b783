use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{
    ChatMessage, ConnectionId, DrawingEvent, Note, NoteId, PresentationManifest,
    PresentationState, RoomId, SignalPayload, SlideIndex,
};

/// Everything a client may send over its event channel. Decoded and
/// validated once, at the transport boundary; room logic only ever sees
/// well-formed variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientCommand {
    JoinRoom {
        room_id: RoomId,
    },
    RelayOffer {
        target: ConnectionId,
        caller: ConnectionId,
        signal: SignalPayload,
    },
    RelayAnswer {
        caller: ConnectionId,
        signal: SignalPayload,
    },
    ScreenShareSignal {
        room_id: RoomId,
        signal: SignalPayload,
    },
    SendChat {
        room_id: RoomId,
        body: String,
    },
    Draw {
        room_id: RoomId,
        event: DrawingEvent,
    },
    ClearBoard {
        room_id: RoomId,
    },
    CreateNote {
        room_id: RoomId,
        note: Note,
    },
    UpdateNote {
        room_id: RoomId,
        note: Note,
    },
    DeleteNote {
        room_id: RoomId,
        note_id: NoteId,
    },
    SlideChanged {
        room_id: RoomId,
        index: SlideIndex,
    },
    SharePresentation {
        room_id: RoomId,
        manifest: PresentationManifest,
    },
}

/// Everything the server may push to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerEvent {
    Connected {
        connection_id: ConnectionId,
    },
    AllOtherMembers {
        members: Vec<ConnectionId>,
    },
    PeerWantsToConnect {
        signal: SignalPayload,
        caller: ConnectionId,
    },
    PeerAnswered {
        signal: SignalPayload,
        from: ConnectionId,
    },
    ChatHistory {
        messages: Vec<ChatMessage>,
    },
    ChatMessage {
        message: ChatMessage,
    },
    DrawingHistory {
        events: Vec<DrawingEvent>,
    },
    Drawing {
        event: DrawingEvent,
    },
    BoardCleared,
    NotesSnapshot {
        notes: HashMap<NoteId, Note>,
    },
    PresentationState {
        state: PresentationState,
    },
    SlideIndexChanged {
        index: SlideIndex,
    },
    MemberLeft {
        connection_id: ConnectionId,
    },
    ScreenShareSignal {
        signal: SignalPayload,
        caller: ConnectionId,
    },
}
