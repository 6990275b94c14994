// src/state.rs

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::bus::MessageBus;
use crate::models::{ServerEvent, UserId};
use crate::presence::PresenceDirectory;
use crate::rooms::RoomTracker;
use crate::storage::ChatStore;

/// One live authenticated socket.
///
/// The user identity is stamped at authentication time and never changes
/// for the life of the connection. Cloning shares the outbound queue; the
/// writer task on the other end drains it into the socket.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: Uuid,
    pub user_id: UserId,
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    pub fn new(user_id: UserId, tx: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self { id: Uuid::new_v4(), user_id, tx }
    }

    /// Queues an event for the client. A handle whose connection is already
    /// gone swallows the push; notifying the dead is a silent no-op.
    pub fn push(&self, event: ServerEvent) {
        let _ = self.tx.send(event);
    }
}

/// The application's shared state, created once in `main` and cloned into
/// every connection handler via axum's state management.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ChatStore>,
    pub presence: Arc<PresenceDirectory>,
    pub rooms: Arc<RoomTracker>,
    pub bus: Arc<MessageBus>,
    /// Whether the `x-test-user` header is honored as a login source.
    pub test_login: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self {
            store,
            presence: Arc::new(PresenceDirectory::new()),
            rooms: Arc::new(RoomTracker::new()),
            bus: Arc::new(MessageBus::new()),
            test_login: false,
        }
    }
}
