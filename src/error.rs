// src/error.rs

use thiserror::Error;

/// Failures an operation can surface to a client.
///
/// Every handler translates collaborator failures into one of these before
/// responding; nothing is allowed to escape to the transport layer, since
/// that would drop the connection for an otherwise recoverable error.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The connection carried no resolvable identity. Fatal: the socket is
    /// closed without registering anything.
    #[error("Authentication required")]
    Unauthenticated,

    /// A required field was missing or empty. The client may retry with
    /// corrected input.
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Recipient not found")]
    RecipientNotFound,

    /// Collapses "chat/message not found" and "not a participant" into one
    /// signal so non-participants cannot probe for chat existence.
    #[error("Message not found or you are not a participant")]
    NotFoundOrForbidden,

    /// Unexpected collaborator failure. The detail is logged server-side;
    /// the client only ever sees the generic message.
    #[error("Internal server error")]
    Internal(String),
}

impl ChatError {
    /// The server-side detail for internal failures, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ChatError::Internal(detail) => Some(detail),
            _ => None,
        }
    }
}

impl From<crate::storage::StorageError> for ChatError {
    fn from(err: crate::storage::StorageError) -> Self {
        ChatError::Internal(err.to_string())
    }
}
