//! HTTP backend abstraction for the `OpenAI` API.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest with automatic retry logic for transient errors.

use crate::config::OpenAiConfig;
use crate::error::{OpenAiError, OpenAiResult};
use crate::models::ApiErrorBody;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can POST JSON and decode a JSON reply.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST `body` as JSON to `url` and deserialize the response.
    async fn post_json<B, T>(&self, url: &Url, body: &B) -> OpenAiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Retries rate limiting (429), server errors (5xx) and network errors with
/// exponential backoff.
pub struct ReqwestBackend {
    client: reqwest::Client,
    api_key: String,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &OpenAiConfig) -> OpenAiResult<Self> {
        let api_key = config.api_key.clone().ok_or(OpenAiError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_key,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// POST with automatic retry for transient errors.
    async fn post_with_retry<B>(&self, url: &Url, body: &B) -> OpenAiResult<reqwest::Response>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut attempt: u8 = 0;

        loop {
            if attempt > 0 {
                tokio::time::sleep(backoff_delay(self.retry_base_delay, attempt)).await;
            }

            let result = self
                .client
                .post(url.as_str())
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await;

            let can_retry = attempt < self.max_retries;
            attempt = attempt.saturating_add(1);

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    if is_retryable(status) && can_retry {
                        warn!(status = status.as_u16(), attempt, "Retrying completion request");
                        continue;
                    }

                    return Err(error_from_response(response).await);
                }
                Err(e) => {
                    if can_retry {
                        warn!(error = %e, attempt, "Retrying completion request after network error");
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

/// Upper bound for a single retry wait.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Exponential backoff before retry `attempt` (1-based), capped.
fn backoff_delay(base: Duration, attempt: u8) -> Duration {
    let factor = 2u32
        .checked_pow(u32::from(attempt.saturating_sub(1)))
        .unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
}

/// Build an error from a non-success response, preferring the API message.
async fn error_from_response(response: reqwest::Response) -> OpenAiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    OpenAiError::ApiRequestFailed {
        status: status.as_u16(),
        message: api_error_message(&text)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string()),
    }
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|body| body.error.message)
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json<B, T>(&self, url: &Url, body: &B) -> OpenAiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let response = self.post_with_retry(url, body).await?;
        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "Received completion response");
        Ok(serde_json::from_slice(&bytes)?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
