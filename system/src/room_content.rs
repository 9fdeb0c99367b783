use std::collections::HashMap;

use crate::types::{
    ChatMessage, DrawingEvent, Note, NoteId, PresentationManifest, PresentationState, SlideIndex,
};

/// Shared content of one room. All fields are private so that the
/// append-only drawing/chat logs, the last-write-wins note collection and
/// the wholesale-replace presentation state can only be touched through the
/// methods below.
#[derive(Debug, Default)]
pub struct RoomContent {
    drawing_log: Vec<DrawingEvent>,
    sticky_notes: HashMap<NoteId, Note>,
    chat_log: Vec<ChatMessage>,
    presentation: Option<PresentationState>,
}

impl RoomContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_drawing(&mut self, event: DrawingEvent) {
        self.drawing_log.push(event);
    }

    pub fn drawing_log(&self) -> &[DrawingEvent] {
        &self.drawing_log
    }

    /// Truncates the drawing log only. Notes, chat and presentation survive.
    pub fn clear_board(&mut self) {
        self.drawing_log.clear();
    }

    /// Last write wins: an existing note with the same id is replaced.
    pub fn upsert_note(&mut self, note: Note) {
        self.sticky_notes.insert(note.id.clone(), note);
    }

    /// Removing an unknown note is a no-op.
    pub fn remove_note(&mut self, note_id: &str) -> Option<Note> {
        self.sticky_notes.remove(note_id)
    }

    pub fn sticky_notes(&self) -> &HashMap<NoteId, Note> {
        &self.sticky_notes
    }

    pub fn append_chat(&mut self, message: ChatMessage) {
        self.chat_log.push(message);
    }

    pub fn chat_log(&self) -> &[ChatMessage] {
        &self.chat_log
    }

    /// A new upload replaces the previous deck and rewinds to the first
    /// slide.
    pub fn set_presentation(&mut self, manifest: PresentationManifest) {
        self.presentation = Some(PresentationState {
            manifest,
            current_slide: 0,
        });
    }

    /// No-op until a presentation has been uploaded.
    pub fn set_slide_index(&mut self, index: SlideIndex) {
        if let Some(presentation) = self.presentation.as_mut() {
            presentation.current_slide = index;
        }
    }

    pub fn presentation(&self) -> Option<&PresentationState> {
        self.presentation.as_ref()
    }
}
