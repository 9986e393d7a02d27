use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

use plutus_bus::{EventBus, Topic};
use plutus_core::{ChatMessage, PlatformEvent, Room, RoomEvent, RoomId};
use plutus_ports::Clock;

use crate::error::{Result, RoomError};

/// Room membership and chat-message history.
///
/// Rooms live for the whole process; participants are a set, so joining is
/// idempotent and leaving without membership is a no-op. Membership events
/// are published only when the set actually changed.
pub struct RoomService {
    rooms: DashMap<RoomId, Room>,
    messages: DashMap<RoomId, Vec<ChatMessage>>,
    next_room: std::sync::atomic::AtomicU64,
    bus: Arc<EventBus<PlatformEvent>>,
    clock: Arc<dyn Clock>,
}

impl RoomService {
    pub fn new(bus: Arc<EventBus<PlatformEvent>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: DashMap::new(),
            messages: DashMap::new(),
            next_room: std::sync::atomic::AtomicU64::new(1),
            bus,
            clock,
        }
    }

    /// Create a room with a generated id
    pub fn create_room(&self, name: &str) -> Room {
        // Skip ids already taken by seeded rooms
        let id = loop {
            let candidate = format!(
                "room-{}",
                self.next_room
                    .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            );
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let room = Room::new(&id, name, self.clock.now());
        info!(room_id = %id, name, "room created");
        self.rooms.insert(id.clone(), room.clone());
        self.messages.insert(id, Vec::new());
        room
    }

    /// Create a room under a caller-chosen id (seed data)
    pub fn create_room_with_id(&self, id: &str, name: &str) -> Result<Room> {
        if self.rooms.contains_key(id) {
            return Err(RoomError::RoomExists(id.to_string()));
        }
        let room = Room::new(id, name, self.clock.now());
        info!(room_id = id, name, "room created");
        self.rooms.insert(id.to_string(), room.clone());
        self.messages.insert(id.to_string(), Vec::new());
        Ok(room)
    }

    pub fn list_rooms(&self) -> Vec<Room> {
        let mut rooms: Vec<Room> = self.rooms.iter().map(|entry| entry.clone()).collect();
        rooms.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        rooms
    }

    pub fn room(&self, room_id: &str) -> Option<Room> {
        self.rooms.get(room_id).map(|entry| entry.clone())
    }

    /// Add a user to a room's participant set.
    ///
    /// Joining twice is a no-op and publishes nothing the second time.
    pub fn join(&self, room_id: &str, user_id: &str) -> Result<Room> {
        let mut entry = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))?;
        let added = entry.participants.insert(user_id.to_string());
        let room = entry.clone();
        drop(entry);

        if added {
            debug!(room_id, user_id, "participant joined");
            self.bus.publish(
                &Topic::room(room_id),
                &PlatformEvent::Room(RoomEvent::Joined {
                    room_id: room_id.to_string(),
                    user_id: user_id.to_string(),
                    timestamp: self.clock.now(),
                }),
            );
        }
        Ok(room)
    }

    /// Remove a user from a room's participant set.
    ///
    /// Leaving a room the user never joined is a no-op.
    pub fn leave(&self, room_id: &str, user_id: &str) -> Result<Room> {
        let mut entry = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))?;
        let removed = entry.participants.shift_remove(user_id);
        let room = entry.clone();
        drop(entry);

        if removed {
            debug!(room_id, user_id, "participant left");
            self.bus.publish(
                &Topic::room(room_id),
                &PlatformEvent::Room(RoomEvent::Left {
                    room_id: room_id.to_string(),
                    user_id: user_id.to_string(),
                    timestamp: self.clock.now(),
                }),
            );
        }
        Ok(room)
    }

    /// Append a message to a room's history and publish it
    pub fn post_message(&self, room_id: &str, author: &str, text: &str) -> Result<ChatMessage> {
        if text.trim().is_empty() {
            return Err(RoomError::EmptyMessage);
        }
        if !self.rooms.contains_key(room_id) {
            return Err(RoomError::RoomNotFound(room_id.to_string()));
        }

        let message = ChatMessage::new(room_id, author, text, self.clock.now());
        self.messages
            .entry(room_id.to_string())
            .or_default()
            .push(message.clone());

        debug!(room_id, author, "message posted");
        self.bus.publish(
            &Topic::room(room_id),
            &PlatformEvent::Room(RoomEvent::Message(message.clone())),
        );
        Ok(message)
    }

    /// Last `limit` messages in arrival order; empty for unknown rooms
    pub fn recent_messages(&self, room_id: &str, limit: usize) -> Vec<ChatMessage> {
        match self.messages.get(room_id) {
            Some(history) => {
                let start = history.len().saturating_sub(limit);
                history[start..].to_vec()
            }
            None => Vec::new(),
        }
    }
}
