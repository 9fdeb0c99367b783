use std::time::Instant;

use system::{ConnectionId, RoomContent, RoomSnapshot};

pub struct Room {
    pub members: Vec<ConnectionId>,
    pub content: RoomContent,
    /// Set while the room has no members; cleared on join. Drives eviction.
    pub empty_since: Option<Instant>,
}

impl Room {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            content: RoomContent::new(),
            empty_since: None,
        }
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            members: self.members.clone(),
            drawing_log: self.content.drawing_log().to_vec(),
            sticky_notes: self.content.sticky_notes().clone(),
            chat_log: self.content.chat_log().to_vec(),
            presentation: self.content.presentation().cloned(),
        }
    }
}
