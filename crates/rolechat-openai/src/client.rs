//! `OpenAI` completion client.

use async_trait::async_trait;
use rolechat_core::{
    CompletionClient, CompletionError, CompletionOutput, CompletionRequest, StructuredReply,
    UsageInfo,
};
use tracing::debug;
use url::Url;

use crate::config::OpenAiConfig;
use crate::error::{OpenAiError, OpenAiResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{ChatCompletionBody, ChatCompletionResponse};

/// Default `OpenAI` client using the reqwest HTTP backend.
pub type DefaultOpenAiClient = OpenAiClient<ReqwestBackend>;

/// Structured chat completion client.
///
/// Generic over the HTTP backend so tests can substitute a fake. Use
/// [`DefaultOpenAiClient`] in production code.
pub struct OpenAiClient<B: HttpBackend> {
    backend: B,
    endpoint: Url,
}

impl DefaultOpenAiClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails when no API key is configured or the base URL is invalid.
    pub fn new(config: &OpenAiConfig) -> OpenAiResult<Self> {
        let endpoint = completions_endpoint(&config.base_url)?;
        let backend = ReqwestBackend::new(config)?;
        Ok(Self { backend, endpoint })
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> OpenAiResult<Self> {
        Self::new(&OpenAiConfig::from_env())
    }
}

impl<B: HttpBackend> OpenAiClient<B> {
    /// Create a new client with a custom backend.
    pub fn with_backend(base_url: &str, backend: B) -> OpenAiResult<Self> {
        Ok(Self {
            backend,
            endpoint: completions_endpoint(base_url)?,
        })
    }

    async fn request(&self, request: &CompletionRequest) -> OpenAiResult<CompletionOutput> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            endpoint = %self.endpoint,
            "Requesting structured completion"
        );

        let body = ChatCompletionBody::from_request(request);
        let response: ChatCompletionResponse = self.backend.post_json(&self.endpoint, &body).await?;
        parse_completion(response)
    }
}

#[async_trait]
impl<B: HttpBackend> CompletionClient for OpenAiClient<B> {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionOutput, CompletionError> {
        self.request(&request).await.map_err(CompletionError::from)
    }
}

/// `{base}/chat/completions`, keeping any path prefix of the base URL.
fn completions_endpoint(base_url: &str) -> OpenAiResult<Url> {
    let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
    Ok(Url::parse(&endpoint)?)
}

/// Extract the structured reply and usage from a completion response.
pub(crate) fn parse_completion(response: ChatCompletionResponse) -> OpenAiResult<CompletionOutput> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| OpenAiError::InvalidResponse {
            message: "response contained no choices".to_string(),
        })?;

    if let Some(refusal) = choice.message.refusal {
        return Err(OpenAiError::Refused { message: refusal });
    }

    let content = choice
        .message
        .content
        .ok_or_else(|| OpenAiError::InvalidResponse {
            message: format!(
                "choice has no content (finish_reason: {})",
                choice.finish_reason.as_deref().unwrap_or("unknown")
            ),
        })?;

    let reply: StructuredReply =
        serde_json::from_str(&content).map_err(|e| OpenAiError::InvalidResponse {
            message: format!("reply does not match schema: {e}"),
        })?;

    Ok(CompletionOutput {
        reply,
        usage: response
            .usage
            .map(|u| UsageInfo::new(u.prompt_tokens, u.completion_tokens)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use rolechat_core::{CompletionMessage, MessageRole};
    use serde_json::json;

    fn completion_json(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content, "refusal": null},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 31, "completion_tokens": 12, "total_tokens": 43}
        })
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![
                CompletionMessage::new(MessageRole::System, "You are a helpful assistant."),
                CompletionMessage::new(MessageRole::User, "Hello"),
            ],
            temperature: 0.7,
            max_tokens: 256,
        }
    }

    #[test]
    fn test_completions_endpoint_keeps_prefix() {
        assert_eq!(
            completions_endpoint("https://api.openai.com/v1").unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_endpoint("http://localhost:8080/v1/").unwrap().as_str(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert!(completions_endpoint("not a url").is_err());
    }

    #[test]
    fn test_default_client_requires_api_key() {
        let result = DefaultOpenAiClient::new(&OpenAiConfig::new());
        assert!(matches!(result, Err(OpenAiError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_complete_parses_structured_reply_and_usage() {
        let backend = FakeBackend::new().with_json(completion_json(
            r#"{"text": "Hi there!", "suggested_phrases": ["How are you?", "Nice to meet you.", "What's new?"]}"#,
        ));
        let client = OpenAiClient::with_backend("https://api.openai.com/v1", backend).unwrap();

        let output = client.complete(request()).await.unwrap();
        assert_eq!(output.reply.text, "Hi there!");
        assert_eq!(output.reply.suggested_phrases.len(), 3);
        assert_eq!(output.usage, Some(UsageInfo::new(31, 12)));

        let requests = client.backend.requests();
        assert_eq!(requests.len(), 1);
        let (url, body) = &requests[0];
        assert_eq!(url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(body["messages"][1]["content"], "Hello");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["response_format"]["json_schema"]["name"], "chat_reply");
    }

    #[tokio::test]
    async fn test_http_error_surfaces_as_api_error() {
        let backend = FakeBackend::new().with_status(401, "Incorrect API key provided");
        let client = OpenAiClient::with_backend("https://api.openai.com/v1", backend).unwrap();

        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Api { status: 401, .. }));
    }

    #[test]
    fn test_parse_refusal() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": null, "refusal": "I can't help with that."}}]
        }))
        .unwrap();
        assert!(matches!(
            parse_completion(response),
            Err(OpenAiError::Refused { message }) if message == "I can't help with that."
        ));
    }

    #[test]
    fn test_parse_no_choices() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            parse_completion(response),
            Err(OpenAiError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_parse_content_not_matching_schema() {
        let response: ChatCompletionResponse =
            serde_json::from_value(completion_json(r#"{"answer": "hi"}"#)).unwrap();
        let err = parse_completion(response).unwrap_err();
        assert!(err.to_string().contains("does not match schema"));
    }

    #[test]
    fn test_parse_truncated_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": null}, "finish_reason": "length"}]
        }))
        .unwrap();
        let err = parse_completion(response).unwrap_err();
        assert!(err.to_string().contains("length"));
    }

    #[test]
    fn test_parse_without_usage() {
        let mut json = completion_json(r#"{"text": "ok", "suggested_phrases": []}"#);
        json.as_object_mut().unwrap().remove("usage");
        let response: ChatCompletionResponse = serde_json::from_value(json).unwrap();
        let output = parse_completion(response).unwrap();
        assert!(output.usage.is_none());
        assert!(output.reply.suggested_phrases.is_empty());
    }
}
