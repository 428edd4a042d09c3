//! Session repository port definition.
//!
//! This port defines the interface for persisting sessions and their
//! messages. Messages of both session kinds share one log, keyed by
//! `(kind, id)`.

use async_trait::async_trait;

use super::history_store::StoreError;
use crate::domain::chat::{NewMessage, NewSession, Session, SessionKey, SessionKind, StoredMessage};

/// Port for durable session persistence operations.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a new session; the record type follows [`NewSession::kind`].
    async fn create_session(&self, session: NewSession) -> Result<SessionKey, StoreError>;

    /// Get a specific session.
    async fn get_session(&self, key: SessionKey) -> Result<Option<Session>, StoreError>;

    /// List sessions of one kind, most recently updated first.
    async fn list_sessions(&self, kind: SessionKind) -> Result<Vec<Session>, StoreError>;

    /// Delete a session and all its messages.
    async fn delete_session(&self, key: SessionKey) -> Result<(), StoreError>;

    /// Append a message, touch the session's update timestamp and add the
    /// message's usage to the session's token totals, atomically.
    async fn append_message(&self, message: NewMessage) -> Result<i64, StoreError>;

    /// Get the last `limit` messages of a session (all when `None`),
    /// in ascending chronological order.
    async fn recent_messages(
        &self,
        key: SessionKey,
        limit: Option<usize>,
    ) -> Result<Vec<StoredMessage>, StoreError>;

    /// Delete all messages of a session. Returns the number deleted.
    async fn delete_messages(&self, key: SessionKey) -> Result<u64, StoreError>;

    /// Get message count for a session.
    async fn message_count(&self, key: SessionKey) -> Result<i64, StoreError>;
}
