use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::values::{Timestamp, UserId};

/// Room identifier (human-readable, e.g. "room-1")
pub type RoomId = String;

/// A shared discussion room with a membership set.
///
/// `participants` keeps set semantics with stable join order; joining twice
/// is a no-op, as is leaving without being a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub participants: IndexSet<UserId>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: impl Into<RoomId>, name: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            participants: IndexSet::new(),
            created_at: now,
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.participants.contains(user_id)
    }
}

/// A chat message, append-only once stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub room_id: RoomId,
    pub author: UserId,
    pub text: String,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    pub fn new(
        room_id: impl Into<RoomId>,
        author: impl Into<UserId>,
        text: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id: room_id.into(),
            author: author.into(),
            text: text.into(),
            sent_at: now,
        }
    }
}
