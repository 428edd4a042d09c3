//! Wire types for the chat completions endpoint.

use rolechat_core::{CompletionMessage, CompletionRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Name of the structured reply schema sent with every request.
pub const REPLY_SCHEMA_NAME: &str = "chat_reply";

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [CompletionMessage],
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: Value,
}

impl<'a> ChatCompletionBody<'a> {
    pub fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: reply_response_format(),
        }
    }
}

/// Strict JSON schema for `{text, suggested_phrases}`.
pub fn reply_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": REPLY_SCHEMA_NAME,
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The assistant's reply"
                    },
                    "suggested_phrases": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "3-5 phrases the user could say next"
                    }
                },
                "required": ["text", "suggested_phrases"],
                "additionalProperties": false
            }
        }
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}
