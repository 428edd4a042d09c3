//! Chat settings and validation.
//!
//! Model parameters are passed to the chat service explicitly; there are no
//! process-wide defaults beyond the constants below.

use serde::{Deserialize, Serialize};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

/// Default completion token limit.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default number of history messages sent as context.
pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// Model and context parameters for a chat service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Model identifier sent to the completion API.
    pub model: String,

    /// Sampling temperature (0.0-2.0).
    pub temperature: f32,

    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,

    /// Number of most recent history messages included in each request.
    pub context_window: usize,

    /// Log the assembled prompt and request parameters on every send.
    pub verbose: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            context_window: DEFAULT_CONTEXT_WINDOW,
            verbose: false,
        }
    }
}

impl ChatSettings {
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub const fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Merge a partial update into these settings, only updating fields that are Some.
    pub fn merge(&mut self, update: &SettingsUpdate) {
        if let Some(ref model) = update.model {
            self.model.clone_from(model);
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(max_tokens) = update.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(context_window) = update.context_window {
            self.context_window = context_window;
        }
        if let Some(verbose) = update.verbose {
            self.verbose = verbose;
        }
    }
}

/// Partial settings update, e.g. from command-line overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub context_window: Option<usize>,
    pub verbose: Option<bool>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Model name cannot be empty")]
    EmptyModel,

    #[error("Temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("Max tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("Context window must hold at least one message")]
    InvalidContextWindow,
}

/// Validate settings values.
pub fn validate_settings(settings: &ChatSettings) -> Result<(), SettingsError> {
    if settings.model.trim().is_empty() {
        return Err(SettingsError::EmptyModel);
    }

    if !(0.0..=2.0).contains(&settings.temperature) {
        return Err(SettingsError::InvalidTemperature(settings.temperature));
    }

    if settings.max_tokens == 0 {
        return Err(SettingsError::InvalidMaxTokens);
    }

    if settings.context_window == 0 {
        return Err(SettingsError::InvalidContextWindow);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ChatSettings::default();
        assert_eq!(settings.model, "gpt-4o");
        assert!((settings.temperature - 1.0).abs() < f32::EPSILON);
        assert_eq!(settings.max_tokens, 1000);
        assert_eq!(settings.context_window, 10);
        assert!(!settings.verbose);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_temperature_out_of_range() {
        let settings = ChatSettings::default().with_temperature(2.5);
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::InvalidTemperature(2.5))
        );
    }

    #[test]
    fn test_validate_empty_model() {
        let settings = ChatSettings::default().with_model("  ");
        assert_eq!(validate_settings(&settings), Err(SettingsError::EmptyModel));
    }

    #[test]
    fn test_validate_zero_limits() {
        assert_eq!(
            validate_settings(&ChatSettings::default().with_max_tokens(0)),
            Err(SettingsError::InvalidMaxTokens)
        );
        assert_eq!(
            validate_settings(&ChatSettings::default().with_context_window(0)),
            Err(SettingsError::InvalidContextWindow)
        );
    }

    #[test]
    fn test_merge_settings() {
        let mut settings = ChatSettings::default();
        settings.merge(&SettingsUpdate {
            model: Some("gpt-4o-mini".to_string()),
            max_tokens: Some(500),
            ..Default::default()
        });

        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.max_tokens, 500);
        assert_eq!(settings.context_window, DEFAULT_CONTEXT_WINDOW); // Unchanged
    }
}
