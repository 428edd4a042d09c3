//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the chat core expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `reqwest` types in any signature
//! - Repository traits are minimal and CRUD-focused

pub mod completion;
pub mod history_store;
pub mod session_repository;

use thiserror::Error;

pub use completion::{
    CompletionClient, CompletionError, CompletionMessage, CompletionOutput, CompletionRequest,
};
pub use history_store::{HistoryStore, StoreError};
pub use session_repository::SessionRepository;

use crate::domain::config::ConfigError;
use crate::settings::SettingsError;

/// Error returned by chat service operations.
///
/// Every variant is propagated unchanged from the layer that raised it;
/// the core performs no recovery.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration was incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Settings were out of range.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The completion API call failed.
    #[error(transparent)]
    ExternalApi(#[from] CompletionError),

    /// The history store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
