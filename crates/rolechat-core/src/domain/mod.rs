//! Domain types for rolechat.
//!
//! Pure data types with no infrastructure dependencies.

pub mod chat;
pub mod config;
pub mod scenarios;

pub use chat::{
    ChatResponse, Message, MessageRole, NewMessage, NewSession, RolePlayProfile, Session,
    SessionKey, SessionKind, StoredMessage, StructuredReply, UsageInfo,
};
pub use config::{ChatConfig, ConfigError, Difficulty, RolePlayConfig, SimpleConfig};
pub use scenarios::Scenario;
