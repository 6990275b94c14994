// src/models.rs

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

pub type UserId = Uuid;
pub type MessageId = Uuid;

/// Identity of the chat between two users.
///
/// The pair is normalized so either ordering resolves to the same chat,
/// which also makes concurrent first-contact sends from both directions
/// converge on a single chat instead of racing to create two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChatId {
    lo: UserId,
    hi: UserId,
}

impl ChatId {
    pub fn of(a: UserId, b: UserId) -> Self {
        if a <= b { Self { lo: a, hi: b } } else { Self { lo: b, hi: a } }
    }

    pub fn participants(&self) -> [UserId; 2] {
        [self.lo, self.hi]
    }

    pub fn includes(&self, user: UserId) -> bool {
        self.lo == user || self.hi == user
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lo, self.hi)
    }
}

#[derive(Debug, Error)]
#[error("malformed chat id")]
pub struct ParseChatIdError;

impl FromStr for ChatId {
    type Err = ParseChatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s.split_once(':').ok_or(ParseChatIdError)?;
        let a = a.parse().map_err(|_| ParseChatIdError)?;
        let b = b.parse().map_err(|_| ParseChatIdError)?;
        Ok(ChatId::of(a, b))
    }
}

impl Serialize for ChatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A user as the user collaborator exposes it: existence plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
}

/// One message in a chat's stored sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub author: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    /// Per-reader read timestamps. Invariant: the author never appears as a
    /// key in their own message's map.
    #[serde(default)]
    pub read_status: HashMap<UserId, DateTime<Utc>>,
}

impl Message {
    pub fn read_by(&self, user: UserId) -> Option<DateTime<Utc>> {
        self.read_status.get(&user).copied()
    }
}

/// Ephemeral "message stored" notification fanned out on the bus.
/// Published once per persisted message, consumed by live subscribers,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryEvent {
    pub chat_id: ChatId,
    pub message: Message,
    pub participants: [UserId; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceState {
    Online,
    Offline,
}

/// An event sent from a client to the server.
/// Deserialized from incoming JSON text; a `type` field selects the variant.
///
/// Id-carrying fields stay strings on the wire: a missing or empty field is
/// an input error, while a well-formed id that resolves to nothing is a
/// not-found, and the handlers tell those apart.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    GetHistory {
        #[serde(default)]
        receiver: String,
    },
    SendMessage {
        #[serde(default)]
        receiver: String,
        #[serde(default)]
        text: String,
    },
    MarkAsRead {
        #[serde(default)]
        chat_id: String,
        #[serde(default)]
        message_id: String,
    },
    GetUserStatus {
        #[serde(default)]
        user_id: String,
    },
}

/// An event sent from the server to a client.
/// Serialized into JSON text; the `type` tag carries the event name the
/// client listens on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    ChatHistory {
        status: Status,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Vec<Message>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    SendMessage {
        status: Status,
    },
    MarkAsRead {
        status: Status,
    },
    NewMessage {
        chat_id: ChatId,
        message: Message,
    },
    MessageRead {
        chat_id: ChatId,
        message_id: MessageId,
        read_at: DateTime<Utc>,
        reader_id: UserId,
    },
    /// Broadcast on connect/disconnect; also the targeted reply to a
    /// presence query, echoing the queried identity verbatim.
    UserStatus {
        user_id: String,
        status: PresenceState,
    },
    /// Sent once, immediately after successful authentication.
    OnlineUsers {
        users: Vec<UserId>,
    },
    Error {
        error: String,
        status: Status,
    },
}
