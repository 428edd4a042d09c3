//! Chat domain types.
//!
//! These types represent conversation messages, token usage and sessions in
//! the domain model, independent of any infrastructure concerns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::Difficulty;

/// Number of characters kept by [`StoredMessage::preview`].
const PREVIEW_CHARS: usize = 50;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    /// Convert role to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Token counts consumed by a single completion call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInfo {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl UsageInfo {
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Sum of input and output tokens.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        u64::from(self.input_tokens) + u64::from(self.output_tokens)
    }
}

impl std::fmt::Display for UsageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Input: {}, Output: {}, Total: {}",
            self.input_tokens,
            self.output_tokens,
            self.total_tokens()
        )
    }
}

/// A single conversation turn.
///
/// Messages are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub usage: Option<UsageInfo>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
            usage: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Assistant turn carrying the usage of the call that produced it.
    pub fn assistant(content: impl Into<String>, usage: Option<UsageInfo>) -> Self {
        Self {
            usage,
            ..Self::new(MessageRole::Assistant, content)
        }
    }
}

/// The structured payload requested from the completion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReply {
    /// The assistant's reply text.
    pub text: String,
    /// Follow-up phrases the user could say next (3-5 items).
    pub suggested_phrases: Vec<String>,
}

/// Result of a single `send()` call.
///
/// Serializes as `{text, suggested_phrases, usage}` with `usage` as `null`
/// when the API reported none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
    pub suggested_phrases: Vec<String>,
    #[serde(default)]
    pub usage: Option<UsageInfo>,
}

impl ChatResponse {
    pub fn from_reply(reply: StructuredReply, usage: Option<UsageInfo>) -> Self {
        Self {
            text: reply.text,
            suggested_phrases: reply.suggested_phrases,
            usage,
        }
    }

    /// Total tokens of the call, when usage was reported.
    pub fn total_tokens(&self) -> Option<u64> {
        self.usage.as_ref().map(UsageInfo::total_tokens)
    }

    /// Transport representation for presentation layers.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "text": self.text,
            "suggested_phrases": self.suggested_phrases,
            "usage": self.usage,
        })
    }
}

impl std::fmt::Display for ChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Discriminates the two session record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    General,
    RolePlay,
}

impl SessionKind {
    /// Parse a session kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(Self::General),
            "roleplay" => Some(Self::RolePlay),
            _ => None,
        }
    }

    /// Convert kind to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::RolePlay => "roleplay",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a session: its kind plus its row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub kind: SessionKind,
    pub id: i64,
}

impl SessionKey {
    pub const fn new(kind: SessionKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// Roleplay parameters recorded on a roleplay session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePlayProfile {
    /// Name of the built-in scenario the session was started from, if any.
    pub prompt_name: Option<String>,
    pub language: String,
    pub user_role: String,
    pub gpt_role: String,
    pub difficulty: Difficulty,
    /// Scenario template the prompt was rendered from.
    pub role_template: String,
}

/// A persisted conversation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub key: SessionKey,
    pub title: String,
    /// Resolved system prompt the session was created with.
    pub instruction: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Present only for roleplay sessions.
    pub roleplay: Option<RolePlayProfile>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Title for display, falling back to `Session #<id>`.
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("Session #{}", self.key.id)
        } else {
            self.title.clone()
        }
    }

    pub const fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Data for creating a new session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub title: String,
    pub instruction: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub roleplay: Option<RolePlayProfile>,
}

impl NewSession {
    /// Kind of record this session is stored as.
    pub const fn kind(&self) -> SessionKind {
        if self.roleplay.is_some() {
            SessionKind::RolePlay
        } else {
            SessionKind::General
        }
    }
}

/// Data for appending a message to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub session: SessionKey,
    pub role: MessageRole,
    pub content: String,
    pub usage: Option<UsageInfo>,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn from_message(session: SessionKey, message: Message) -> Self {
        Self {
            session,
            role: message.role,
            content: message.content,
            usage: message.usage,
            created_at: message.created_at,
        }
    }
}

/// A message as stored in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub session: SessionKey,
    pub role: MessageRole,
    pub content: String,
    pub usage: Option<UsageInfo>,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    /// Short `role: content` line, content cut at 50 characters.
    pub fn preview(&self) -> String {
        if self.content.chars().count() > PREVIEW_CHARS {
            let head: String = self.content.chars().take(PREVIEW_CHARS).collect();
            format!("{}: {head}...", self.role)
        } else {
            format!("{}: {}", self.role, self.content)
        }
    }
}

impl From<StoredMessage> for Message {
    fn from(stored: StoredMessage) -> Self {
        Self {
            role: stored.role,
            content: stored.content,
            created_at: stored.created_at,
            usage: stored.usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            assert_eq!(MessageRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(MessageRole::parse("tool"), None);
    }

    #[test]
    fn test_usage_total_and_display() {
        let usage = UsageInfo::new(120, 30);
        assert_eq!(usage.total_tokens(), 150);
        assert_eq!(usage.to_string(), "Input: 120, Output: 30, Total: 150");

        let max = UsageInfo::new(u32::MAX, u32::MAX);
        assert_eq!(max.total_tokens(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_response_json_shape() {
        let response = ChatResponse {
            text: "Hi there!".to_string(),
            suggested_phrases: vec!["How can I help?".to_string(), "What's up?".to_string()],
            usage: None,
        };
        let value = response.to_json();
        assert_eq!(value["text"], "Hi there!");
        assert_eq!(value["suggested_phrases"][1], "What's up?");
        assert!(value["usage"].is_null());
        assert_eq!(response.to_string(), "Hi there!");
        assert_eq!(response.total_tokens(), None);
    }

    #[test]
    fn test_response_json_round_trip_preserves_order_and_usage() {
        let response = ChatResponse {
            text: "Sure, a grande latte coming up.".to_string(),
            suggested_phrases: vec![
                "Can I get oat milk?".to_string(),
                "How much is it?".to_string(),
                "Make it iced, please.".to_string(),
            ],
            usage: Some(UsageInfo::new(210, 48)),
        };
        let encoded = serde_json::to_string(&response).unwrap();
        let decoded: ChatResponse = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, response);

        let without_usage: ChatResponse =
            serde_json::from_str(r#"{"text":"a","suggested_phrases":["b","c"],"usage":null}"#)
                .unwrap();
        assert_eq!(without_usage.usage, None);
        assert_eq!(without_usage.suggested_phrases, vec!["b", "c"]);
    }

    #[test]
    fn test_session_kind_parse() {
        assert_eq!(SessionKind::parse("general"), Some(SessionKind::General));
        assert_eq!(SessionKind::parse("roleplay"), Some(SessionKind::RolePlay));
        assert_eq!(SessionKind::parse("other"), None);
        assert_eq!(
            SessionKey::new(SessionKind::RolePlay, 7).to_string(),
            "roleplay#7"
        );
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let stored = StoredMessage {
            id: 1,
            session: SessionKey::new(SessionKind::General, 1),
            role: MessageRole::Assistant,
            content: "아".repeat(60),
            usage: None,
            created_at: Utc::now(),
        };
        assert_eq!(stored.preview(), format!("assistant: {}...", "아".repeat(50)));

        let short = StoredMessage {
            content: "short".to_string(),
            role: MessageRole::User,
            ..stored
        };
        assert_eq!(short.preview(), "user: short");
    }

    #[test]
    fn test_new_session_kind() {
        let mut session = NewSession {
            title: String::new(),
            instruction: "x".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 1.0,
            max_tokens: 1000,
            roleplay: None,
        };
        assert_eq!(session.kind(), SessionKind::General);
        session.roleplay = Some(RolePlayProfile {
            prompt_name: None,
            language: "English".to_string(),
            user_role: "guest".to_string(),
            gpt_role: "receptionist".to_string(),
            difficulty: Difficulty::Intermediate,
            role_template: "Greet the guest.".to_string(),
        });
        assert_eq!(session.kind(), SessionKind::RolePlay);
    }
}
