// src/presence.rs

//! Process-wide online-user directory.
//!
//! Presence is exact and disconnect-driven: an entry exists while its
//! connection is alive, and `last_activity` is tracked but never used to
//! expire anyone. At most one entry exists per user; a reconnect overwrites
//! the previous connection's entry (last-connected-wins).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{PresenceState, ServerEvent, UserId};
use crate::state::ConnectionHandle;

pub struct PresenceEntry {
    pub conn: ConnectionHandle,
    pub last_activity: DateTime<Utc>,
}

#[derive(Default)]
pub struct PresenceDirectory {
    online: Mutex<HashMap<UserId, PresenceEntry>>,
}

impl PresenceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the user, replacing any entry left by an earlier connection,
    /// and announces them online to every live connection (the new one
    /// included).
    pub async fn register(&self, conn: ConnectionHandle) {
        let user_id = conn.user_id;
        let mut online = self.online.lock().await;
        online.insert(user_id, PresenceEntry { conn, last_activity: Utc::now() });
        broadcast(&online, user_id, PresenceState::Online);
    }

    /// Removes the entry owned by `conn_id` and announces the user offline.
    ///
    /// A stale handle (the user already re-registered on a newer
    /// connection) leaves the directory untouched, so a late disconnect
    /// cannot knock a reconnected user offline.
    pub async fn deregister(&self, user_id: UserId, conn_id: Uuid) {
        let mut online = self.online.lock().await;
        let owns_entry = online.get(&user_id).is_some_and(|entry| entry.conn.id == conn_id);
        if !owns_entry {
            return;
        }
        online.remove(&user_id);
        broadcast(&online, user_id, PresenceState::Offline);
    }

    /// Refreshes the user's activity timestamp; a no-op for anyone not
    /// currently online.
    pub async fn touch(&self, user_id: UserId) {
        if let Some(entry) = self.online.lock().await.get_mut(&user_id) {
            entry.last_activity = Utc::now();
        }
    }

    pub async fn is_online(&self, user_id: UserId) -> bool {
        self.online.lock().await.contains_key(&user_id)
    }

    /// Sorted snapshot of everyone currently online.
    pub async fn list_online(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.online.lock().await.keys().copied().collect();
        users.sort_unstable();
        users
    }
}

fn broadcast(online: &HashMap<UserId, PresenceEntry>, user_id: UserId, status: PresenceState) {
    let event = ServerEvent::UserStatus { user_id: user_id.to_string(), status };
    for entry in online.values() {
        entry.conn.push(event.clone());
    }
}
