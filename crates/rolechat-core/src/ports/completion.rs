//! Completion client port definition.
//!
//! The chat service talks to the language model exclusively through this
//! port. Retries, timeouts and rate limiting belong to implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chat::{Message, MessageRole, StructuredReply, UsageInfo};

/// Errors reported by a completion client.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed completion response: {0}")]
    InvalidResponse(String),

    #[error("Model refused to answer: {0}")]
    Refused(String),

    #[error("Completion client misconfigured: {0}")]
    Configuration(String),
}

/// A message as sent to the completion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl CompletionMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Message> for CompletionMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role, message.content.clone())
    }
}

/// A structured chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Parsed result of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutput {
    pub reply: StructuredReply,
    pub usage: Option<UsageInfo>,
}

/// Port for the structured chat completion API.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a completion shaped as [`StructuredReply`].
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionOutput, CompletionError>;
}
