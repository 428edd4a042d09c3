//! Internal error types for `OpenAI` operations.
//!
//! These errors are internal to `rolechat-openai` and are mapped to the
//! core [`CompletionError`] at the boundary.

use rolechat_core::CompletionError;
use thiserror::Error;

/// Result type alias for `OpenAI` operations.
pub type OpenAiResult<T> = Result<T, OpenAiError>;

/// Errors related to `OpenAI` API operations.
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// API request failed with an HTTP error status.
    #[error("OpenAI API request failed with status {status}: {message}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// Error message from the response body, or the status text
        message: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from OpenAI API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// The model declined to produce the structured reply.
    #[error("Model refused the request: {message}")]
    Refused {
        /// Refusal text returned by the model
        message: String,
    },

    /// No API key was configured.
    #[error("OpenAI API key is not set (expected {})", crate::config::API_KEY_ENV)]
    MissingApiKey,

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<OpenAiError> for CompletionError {
    fn from(err: OpenAiError) -> Self {
        match err {
            OpenAiError::ApiRequestFailed { status, message } => Self::Api { status, message },
            OpenAiError::InvalidResponse { message } => Self::InvalidResponse(message),
            OpenAiError::JsonParse(e) => Self::InvalidResponse(e.to_string()),
            OpenAiError::Refused { message } => Self::Refused(message),
            OpenAiError::Network(e) => Self::Network(e.to_string()),
            OpenAiError::MissingApiKey | OpenAiError::InvalidUrl(_) => {
                Self::Configuration(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_failed_maps_to_api() {
        let error = OpenAiError::ApiRequestFailed {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        };
        assert!(error.to_string().contains("401"));

        let mapped = CompletionError::from(error);
        assert!(matches!(
            mapped,
            CompletionError::Api { status: 401, ref message } if message.contains("Incorrect")
        ));
    }

    #[test]
    fn test_refusal_maps_to_refused() {
        let mapped = CompletionError::from(OpenAiError::Refused {
            message: "I can't help with that.".to_string(),
        });
        assert!(matches!(mapped, CompletionError::Refused(_)));
    }

    #[test]
    fn test_json_error_maps_to_invalid_response() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let mapped = CompletionError::from(OpenAiError::from(json_err));
        assert!(matches!(mapped, CompletionError::InvalidResponse(_)));
    }

    #[test]
    fn test_missing_key_maps_to_configuration() {
        let mapped = CompletionError::from(OpenAiError::MissingApiKey);
        assert!(
            matches!(mapped, CompletionError::Configuration(ref m) if m.contains("OPENAI_API_KEY"))
        );
    }
}
