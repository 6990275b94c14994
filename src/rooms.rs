// src/rooms.rs

//! Chat-room membership tracking.
//!
//! A room is the set of live connections currently interested in one chat's
//! events, used only to target notifications. A connection joins a room by
//! retrieving that chat's history or sending into it, may accumulate rooms
//! as its user switches conversation partners, and is reclaimed from all of
//! them at once on disconnect.

use std::collections::HashMap;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::ChatId;
use crate::state::ConnectionHandle;

#[derive(Default)]
pub struct RoomTracker {
    rooms: Mutex<HashMap<ChatId, HashMap<Uuid, ConnectionHandle>>>,
}

impl RoomTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent add; the room is created lazily on first join.
    pub async fn join(&self, chat_id: ChatId, conn: ConnectionHandle) {
        let mut rooms = self.rooms.lock().await;
        rooms.entry(chat_id).or_default().insert(conn.id, conn);
    }

    /// Removes the connection from every room it belongs to, dropping any
    /// room left empty. Called once, globally, on disconnect; the caller
    /// does not need to remember which chats it joined.
    pub async fn leave(&self, conn_id: Uuid) {
        let mut rooms = self.rooms.lock().await;
        rooms.retain(|_, members| {
            members.remove(&conn_id);
            !members.is_empty()
        });
    }

    /// Snapshot of the room's members for fan-out targeting.
    pub async fn members_of(&self, chat_id: ChatId) -> Vec<ConnectionHandle> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(&chat_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }
}
