use std::collections::{HashMap, HashSet};
use std::num::Wrapping;
use std::time::{Duration, Instant};

use system::{ConnectionId, RoomId};

use crate::room::Room;

/// Connection registry and room store. Owned by the server loop; nothing
/// else holds a reference to room state.
pub struct ServerState {
    connection_id_source: Wrapping<ConnectionId>,
    connection_rooms: HashMap<ConnectionId, HashSet<RoomId>>,

    pub rooms: HashMap<RoomId, Room>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            connection_id_source: Wrapping(0),
            connection_rooms: HashMap::new(),
            rooms: HashMap::new(),
        }
    }

    pub fn create_connection(&mut self) -> ConnectionId {
        self.connection_id_source += Wrapping(1);
        let connection_id = self.connection_id_source.0;
        self.connection_rooms.insert(connection_id, HashSet::new());
        connection_id
    }

    pub fn rooms_of(&self, connection_id: &ConnectionId) -> HashSet<RoomId> {
        self.connection_rooms
            .get(connection_id)
            .cloned()
            .unwrap_or_default()
    }

    #[allow(dead_code)]
    pub fn room_exists(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Creates the room on first reference; joining twice is a no-op.
    pub fn join_room(&mut self, connection_id: ConnectionId, room_id: &str) {
        let room = self
            .rooms
            .entry(room_id.to_owned())
            .or_insert_with(Room::new);
        if !room.members.contains(&connection_id) {
            room.members.push(connection_id);
        }
        room.empty_since = None;
        self.connection_rooms
            .entry(connection_id)
            .or_default()
            .insert(room_id.to_owned());
        log::info!("Connection {} joined room {}", connection_id, room_id);
    }

    /// The room is kept when it empties; its logs stay around for future
    /// joiners until the idle sweep evicts it.
    #[allow(dead_code)]
    pub fn leave_room(&mut self, connection_id: &ConnectionId, room_id: &str) -> bool {
        let removed = self.remove_member(connection_id, room_id);
        if let Some(joined) = self.connection_rooms.get_mut(connection_id) {
            joined.remove(room_id);
        }
        if removed {
            log::info!("Connection {} left room {}", connection_id, room_id);
        }
        removed
    }

    /// Removes the connection from every room it joined and unregisters it.
    /// Returns the affected rooms so the caller can notify their members.
    /// Safe to call twice and for connections that never joined anything.
    pub fn disconnect(&mut self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let joined = self.rooms_of(connection_id);
        self.connection_rooms.remove(connection_id);
        let mut affected = Vec::new();
        for room_id in joined {
            if self.remove_member(connection_id, &room_id) {
                affected.push(room_id);
            }
        }
        affected
    }

    fn remove_member(&mut self, connection_id: &ConnectionId, room_id: &str) -> bool {
        if let Some(room) = self.rooms.get_mut(room_id) {
            let before = room.members.len();
            room.members.retain(|member| member != connection_id);
            if room.members.is_empty() {
                room.empty_since = Some(Instant::now());
            }
            return room.members.len() != before;
        }
        false
    }

    pub fn members_of(&self, room_id: &str) -> &[ConnectionId] {
        self.rooms
            .get(room_id)
            .map(|room| room.members.as_slice())
            .unwrap_or(&[])
    }

    /// Evicts rooms that have had no members for at least `ttl`.
    pub fn sweep_idle(&mut self, ttl: Duration) -> Vec<RoomId> {
        let now = Instant::now();
        let expired: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|(_, room)| {
                room.empty_since
                    .map_or(false, |since| now.duration_since(since) >= ttl)
            })
            .map(|(room_id, _)| room_id.clone())
            .collect();
        for room_id in &expired {
            self.rooms.remove(room_id);
            log::info!("Evicted idle room {}", room_id);
        }
        expired
    }
}
