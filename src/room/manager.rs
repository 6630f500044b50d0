//! Registry of support rooms and their anonymous members.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::identity::AnonymousIdentity;
use crate::util::id::{new_invite_token, new_room_id};

const CHAT_BUFFER: usize = 64;

/// A chat message as seen by everyone in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLine {
    pub from: String,
    pub initials: String,
    pub color: &'static str,
    pub text: String,
}

impl ChatLine {
    pub fn new(sender: &AnonymousIdentity, text: String) -> Self {
        Self {
            from: sender.display_name.clone(),
            initials: sender.initials.clone(),
            color: sender.color,
            text,
        }
    }
}

#[derive(Debug)]
struct Room {
    topic: Option<String>,
    invite_token: String,
    // keyed by user id, which never leaves this struct
    members: HashMap<String, AnonymousIdentity>,
    chat: broadcast::Sender<ChatLine>,
    created_at: Instant,
}

impl Room {
    fn new(topic: Option<String>) -> Self {
        let (chat, _) = broadcast::channel(CHAT_BUFFER);
        Room {
            topic,
            invite_token: new_invite_token(),
            members: HashMap::new(),
            chat,
            created_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedRoom {
    pub id: String,
    pub topic: Option<String>,
    pub invite_token: String,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RoomError {
    #[error("room not found")]
    NotFound,
    #[error("invalid token")]
    InvalidToken,
    #[error("room full")]
    Full,
    #[error("not a member of this room")]
    NotMember,
}

pub struct RoomManager {
    rooms: DashMap<String, Room>,
    capacity: usize,
}

impl RoomManager {
    pub fn new(capacity: usize) -> Self {
        Self { rooms: DashMap::new(), capacity: capacity.max(1) }
    }

    pub fn create_room(&self, topic: Option<String>) -> CreatedRoom {
        let room = Room::new(topic);
        let id = new_room_id();
        let created = CreatedRoom {
            id: id.clone(),
            topic: room.topic.clone(),
            invite_token: room.invite_token.clone(),
        };
        self.rooms.insert(id, room);
        tracing::info!(room_id = %created.id, "room created");
        created
    }

    /// Adds `user_id` to the room and returns the identity it is shown under.
    ///
    /// Joining again returns the same identity and does not use up a seat.
    pub fn join_room(&self, id: &str, token: &str, user_id: &str) -> Result<AnonymousIdentity, RoomError> {
        let mut room = self.rooms.get_mut(id).ok_or(RoomError::NotFound)?;
        if room.invite_token != token {
            return Err(RoomError::InvalidToken);
        }
        if let Some(existing) = room.members.get(user_id) {
            return Ok(existing.clone());
        }
        if room.members.len() >= self.capacity {
            return Err(RoomError::Full);
        }
        let identity = AnonymousIdentity::derive(user_id, id);
        room.members.insert(user_id.to_owned(), identity.clone());
        tracing::debug!(room_id = %id, member = %identity.display_name, "member joined");
        Ok(identity)
    }

    /// Returns whether the user was a member.
    pub fn leave_room(&self, id: &str, user_id: &str) -> Result<bool, RoomError> {
        let mut room = self.rooms.get_mut(id).ok_or(RoomError::NotFound)?;
        Ok(room.members.remove(user_id).is_some())
    }

    /// Members by anonymous identity, sorted by display name.
    pub fn members(&self, id: &str) -> Result<Vec<AnonymousIdentity>, RoomError> {
        let room = self.rooms.get(id).ok_or(RoomError::NotFound)?;
        let mut members: Vec<_> = room.members.values().cloned().collect();
        members.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(members)
    }

    pub fn member(&self, id: &str, user_id: &str) -> Option<AnonymousIdentity> {
        self.rooms.get(id).and_then(|r| r.members.get(user_id).cloned())
    }

    pub fn subscribe(&self, id: &str) -> Result<broadcast::Receiver<ChatLine>, RoomError> {
        self.rooms.get(id).map(|r| r.chat.subscribe()).ok_or(RoomError::NotFound)
    }

    /// Sends a line from `user_id` to everyone listening in the room.
    /// Returns the number of receivers. Fails once the sender has left.
    pub fn publish(&self, id: &str, user_id: &str, line: ChatLine) -> Result<usize, RoomError> {
        let room = self.rooms.get(id).ok_or(RoomError::NotFound)?;
        if !room.members.contains_key(user_id) {
            return Err(RoomError::NotMember);
        }
        // no listeners is not an error
        Ok(room.chat.send(line).unwrap_or(0))
    }

    /// Drops rooms created more than `max_age` ago. Returns how many were removed.
    pub fn prune_old(&self, max_age: Duration) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|_, r| r.created_at.elapsed() < max_age);
        let removed = before.saturating_sub(self.rooms.len());
        if removed > 0 {
            tracing::info!(removed, "pruned old rooms");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
