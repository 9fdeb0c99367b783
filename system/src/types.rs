use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub type ConnectionId = u32;
pub type RoomId = String;
pub type NoteId = String;
pub type SlideIndex = usize;

/// WebRTC negotiation payload. Relayed verbatim, never inspected.
pub type SignalPayload = serde_json::Value;

/// Whiteboard payload (tool, geometry, color, stroke width). Its
/// interpretation belongs to the clients; the relay appends and replays it
/// as an immutable value.
pub type DrawingEvent = serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: ConnectionId,
    pub body: String,
}

/// Output of the external conversion service for one uploaded deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationManifest {
    pub slide_urls: Vec<String>,
    pub pdf_url: String,
}

/// Replaced wholesale when a new deck is uploaded; the slide index moves
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationState {
    pub manifest: PresentationManifest,
    pub current_slide: SlideIndex,
}

/// Everything a newly joined connection needs to catch up with a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub members: Vec<ConnectionId>,
    pub drawing_log: Vec<DrawingEvent>,
    pub sticky_notes: HashMap<NoteId, Note>,
    pub chat_log: Vec<ChatMessage>,
    pub presentation: Option<PresentationState>,
}
