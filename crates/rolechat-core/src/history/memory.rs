//! In-process history store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::chat::Message;
use crate::ports::{HistoryStore, StoreError};

/// Ephemeral history store backed by a `Vec`.
///
/// Contents live as long as the store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages currently held.
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn add_message(&self, message: Message) -> Result<(), StoreError> {
        self.messages.write().await.push(message);
        Ok(())
    }

    async fn get_messages(&self, limit: Option<usize>) -> Result<Vec<Message>, StoreError> {
        let messages = self.messages.read().await;
        let start = limit.map_or(0, |limit| messages.len().saturating_sub(limit));
        Ok(messages[start..].to_vec())
    }

    async fn clear_history(&self) -> Result<(), StoreError> {
        self.messages.write().await.clear();
        Ok(())
    }
}
