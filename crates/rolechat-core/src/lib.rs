//! Core of rolechat: configuration, history ports and chat orchestration.
//!
//! A conversation is configured either as a plain instruction
//! ([`SimpleConfig`]) or as a language-practice roleplay
//! ([`RolePlayConfig`]). [`ChatService`] renders the system prompt,
//! assembles bounded context from a [`HistoryStore`], asks a
//! [`CompletionClient`] for a structured reply and records both turns.
//!
//! Infrastructure lives behind the traits in [`ports`]; the SQLite adapter
//! and the `OpenAI` client are separate crates.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod history;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ChatConfig, ChatResponse, ConfigError, Difficulty, Message, MessageRole, NewMessage,
    NewSession, RolePlayConfig, RolePlayProfile, Scenario, Session, SessionKey, SessionKind,
    SimpleConfig, StoredMessage, StructuredReply, UsageInfo,
};
pub use history::{InMemoryHistoryStore, PersistentHistoryStore, new_session_for};
pub use paths::{DATA_DIR_ENV, PathError, data_root, database_path};
pub use ports::{
    ChatError, CompletionClient, CompletionError, CompletionMessage, CompletionOutput,
    CompletionRequest, HistoryStore, SessionRepository, StoreError,
};
pub use services::ChatService;
pub use settings::{
    ChatSettings, DEFAULT_CONTEXT_WINDOW, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    SettingsError, SettingsUpdate, validate_settings,
};
