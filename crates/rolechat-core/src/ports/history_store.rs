//! History store port definition.
//!
//! A history store is the ordered message log of a single conversation.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chat::{Message, SessionKey};

/// Errors that can occur in history and session storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionKey),

    #[error("Invalid message role: {0}")]
    InvalidRole(String),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Port for a single conversation's message log.
///
/// Implementations hold no cross-call transaction: a caller issuing
/// concurrent sends against one store must serialize them itself.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a message to the end of the log.
    async fn add_message(&self, message: Message) -> Result<(), StoreError>;

    /// Get the last `limit` messages (all when `None`), oldest first.
    async fn get_messages(&self, limit: Option<usize>) -> Result<Vec<Message>, StoreError>;

    /// Delete every message in the log.
    async fn clear_history(&self) -> Result<(), StoreError>;
}
