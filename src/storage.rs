// src/storage.rs

//! Storage collaborator port.
//!
//! The core never touches chat records directly; everything goes through
//! [`ChatStore`]. The Postgres implementation lives in [`crate::database`];
//! [`MemoryStore`] backs tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{ChatId, Message, MessageId, UserId, UserProfile};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StorageError>;

/// Durable chat storage: a chat per unordered user pair, each holding an
/// ordered message sequence with per-reader read stamps.
///
/// Implementations serialize each chat's message mutations internally, so
/// concurrent sends and read stamps cannot lose updates.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Looks up a user by identity.
    async fn find_user(&self, id: UserId) -> StoreResult<Option<UserProfile>>;

    /// Finds the chat between two users; either ordering of the pair
    /// resolves to the same chat.
    async fn find_chat(&self, a: UserId, b: UserId) -> StoreResult<Option<ChatId>>;

    /// Appends a message from `author` to their chat with `receiver`,
    /// creating the chat on first contact.
    async fn append_message(
        &self,
        author: UserId,
        receiver: UserId,
        text: &str,
    ) -> StoreResult<(ChatId, Message)>;

    /// The chat's full message sequence, in stored order. A chat that does
    /// not exist has an empty sequence.
    async fn messages(&self, chat_id: ChatId) -> StoreResult<Vec<Message>>;

    /// Stamps `reader`'s read timestamp on one message. Already-read is a
    /// no-op, not an error. `None` collapses every rejection (chat
    /// missing, reader not a participant, message missing, or message
    /// authored by the reader) into a single signal.
    async fn stamp_read(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        reader: UserId,
    ) -> StoreResult<Option<Message>>;

    /// Stamps `reader`'s read timestamp on every message they have not read
    /// and did not author. Returns how many messages were newly stamped.
    async fn stamp_all_unread(&self, chat_id: ChatId, reader: UserId) -> StoreResult<usize>;
}

/// In-memory [`ChatStore`]. A single lock over the chat map serializes all
/// message mutations.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<UserId, UserProfile>>,
    chats: Mutex<HashMap<ChatId, Vec<Message>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, profile: UserProfile) {
        self.users.lock().await.insert(profile.id, profile);
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<UserProfile>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_chat(&self, a: UserId, b: UserId) -> StoreResult<Option<ChatId>> {
        let chat_id = ChatId::of(a, b);
        Ok(self.chats.lock().await.contains_key(&chat_id).then_some(chat_id))
    }

    async fn append_message(
        &self,
        author: UserId,
        receiver: UserId,
        text: &str,
    ) -> StoreResult<(ChatId, Message)> {
        let chat_id = ChatId::of(author, receiver);
        let message = Message {
            id: Uuid::new_v4(),
            author,
            text: text.to_string(),
            sent_at: Utc::now(),
            read_status: HashMap::new(),
        };
        self.chats.lock().await.entry(chat_id).or_default().push(message.clone());
        Ok((chat_id, message))
    }

    async fn messages(&self, chat_id: ChatId) -> StoreResult<Vec<Message>> {
        Ok(self.chats.lock().await.get(&chat_id).cloned().unwrap_or_default())
    }

    async fn stamp_read(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        reader: UserId,
    ) -> StoreResult<Option<Message>> {
        if !chat_id.includes(reader) {
            return Ok(None);
        }
        let mut chats = self.chats.lock().await;
        let Some(messages) = chats.get_mut(&chat_id) else {
            return Ok(None);
        };
        let Some(message) = messages.iter_mut().find(|m| m.id == message_id) else {
            return Ok(None);
        };
        if message.author == reader {
            return Ok(None);
        }
        message.read_status.entry(reader).or_insert_with(Utc::now);
        Ok(Some(message.clone()))
    }

    async fn stamp_all_unread(&self, chat_id: ChatId, reader: UserId) -> StoreResult<usize> {
        if !chat_id.includes(reader) {
            return Ok(0);
        }
        let mut chats = self.chats.lock().await;
        let Some(messages) = chats.get_mut(&chat_id) else {
            return Ok(0);
        };
        let now = Utc::now();
        let mut stamped = 0;
        for message in messages.iter_mut() {
            if message.author == reader || message.read_status.contains_key(&reader) {
                continue;
            }
            message.read_status.insert(reader, now);
            stamped += 1;
        }
        Ok(stamped)
    }
}
