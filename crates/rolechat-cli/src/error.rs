//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from core errors to exit codes and user-facing messages.

use rolechat_core::{ChatError, CompletionError, StoreError};
use rolechat_openai::OpenAiError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core chat error without a more specific category.
    #[error("{0}")]
    Chat(String),

    /// Argument or input validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Completion API error.
    #[error("API error: {0}")]
    Api(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Chat(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Api(_) => 69,      // EX_UNAVAILABLE
            Self::Database(_) => 73, // EX_CANTCREAT (closest fit)
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<ChatError> for CliError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Config(e) => Self::Config(e.to_string()),
            ChatError::Settings(e) => Self::Arguments(e.to_string()),
            ChatError::ExternalApi(e) => e.into(),
            ChatError::Store(e) => e.into(),
        }
    }
}

impl From<CompletionError> for CliError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Configuration(msg) => Self::Config(msg),
            other => Self::Api(other.to_string()),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SessionNotFound(key) => Self::Arguments(format!("session {key} not found")),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<OpenAiError> for CliError {
    fn from(err: OpenAiError) -> Self {
        CompletionError::from(err).into()
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolechat_core::{SessionKey, SessionKind, SettingsError};

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
        assert_eq!(CliError::Database("x".into()).exit_code(), 73);
    }

    #[test]
    fn test_missing_session_is_argument_error() {
        let key = SessionKey::new(SessionKind::RolePlay, 12);
        let err = CliError::from(ChatError::Store(StoreError::SessionNotFound(key)));
        assert!(matches!(err, CliError::Arguments(ref m) if m.contains("roleplay#12")));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = CliError::from(OpenAiError::MissingApiKey);
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_api_failure_maps_to_api() {
        let err = CliError::from(ChatError::ExternalApi(CompletionError::Api {
            status: 500,
            message: "server error".into(),
        }));
        assert!(matches!(err, CliError::Api(ref m) if m.contains("500")));
    }

    #[test]
    fn test_settings_error_is_argument_error() {
        let err = CliError::from(ChatError::Settings(SettingsError::InvalidTemperature(9.0)));
        assert_eq!(err.exit_code(), 2);
    }
}
