//! `OpenAI` adapter for the rolechat completion port.
//!
//! [`DefaultOpenAiClient`] calls the chat completions endpoint with a strict
//! JSON schema response format and returns the parsed
//! `{text, suggested_phrases}` reply together with token usage.
//!
//! ```no_run
//! use rolechat_openai::{DefaultOpenAiClient, OpenAiConfig};
//!
//! # fn example() -> Result<(), rolechat_openai::OpenAiError> {
//! let client = DefaultOpenAiClient::new(&OpenAiConfig::from_env())?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod http;
mod models;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{DefaultOpenAiClient, OpenAiClient};

// Configuration
pub use config::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, OpenAiConfig};

// Errors
pub use error::{OpenAiError, OpenAiResult};

// Backend trait, for custom transports
pub use http::{HttpBackend, ReqwestBackend};
