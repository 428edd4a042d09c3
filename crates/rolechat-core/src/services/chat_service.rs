//! Chat service - orchestrates a single conversation.
//!
//! The service builds the system prompt once, assembles the request from
//! the prompt and bounded history, calls the completion port and records
//! both turns in the attached history store.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::chat::{ChatResponse, Message, MessageRole};
use crate::domain::config::ChatConfig;
use crate::ports::{
    ChatError, CompletionClient, CompletionMessage, CompletionRequest, HistoryStore, StoreError,
};
use crate::settings::{ChatSettings, validate_settings};

/// Non-user message contents longer than this are shortened in verbose logs.
const VERBOSE_PREVIEW_CHARS: usize = 200;

/// Service driving one conversation against a completion client.
///
/// At most one `send` may be in flight per history store.
pub struct ChatService {
    config: ChatConfig,
    settings: ChatSettings,
    client: Arc<dyn CompletionClient>,
    history: Option<Arc<dyn HistoryStore>>,
    system_prompt: String,
}

impl ChatService {
    /// Create a chat service without history.
    ///
    /// Settings are validated and the system prompt is rendered here, once.
    pub fn new(
        config: ChatConfig,
        settings: ChatSettings,
        client: Arc<dyn CompletionClient>,
    ) -> Result<Self, ChatError> {
        validate_settings(&settings)?;
        let system_prompt = config.build_system_prompt();

        Ok(Self {
            config,
            settings,
            client,
            history: None,
            system_prompt,
        })
    }

    /// Attach a history store.
    #[must_use]
    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub const fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub const fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub const fn history(&self) -> Option<&Arc<dyn HistoryStore>> {
        self.history.as_ref()
    }

    /// Send a user message and return the structured reply.
    ///
    /// The user turn is stored before the API call, so it is kept even when
    /// the call fails. The message is not validated here.
    pub async fn send(&self, message: &str) -> Result<ChatResponse, ChatError> {
        let user_message = Message::user(message);

        if let Some(history) = &self.history {
            history.add_message(user_message.clone()).await?;
        }

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: self.build_messages(&user_message).await?,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        self.log_request(&request);

        let output = self.client.complete(request).await?;
        let response = ChatResponse::from_reply(output.reply, output.usage);

        debug!(
            phrases = response.suggested_phrases.len(),
            total_tokens = response.total_tokens(),
            "Received chat response"
        );

        if let Some(history) = &self.history {
            history
                .add_message(Message::assistant(response.text.clone(), response.usage))
                .await?;
        }

        Ok(response)
    }

    /// Assemble the request messages.
    ///
    /// With a store attached, the current user turn is already the tail of
    /// the stored history and is not appended again.
    async fn build_messages(
        &self,
        user_message: &Message,
    ) -> Result<Vec<CompletionMessage>, StoreError> {
        let mut messages = Vec::with_capacity(self.settings.context_window + 2);

        if !self.system_prompt.is_empty() {
            messages.push(CompletionMessage::new(
                MessageRole::System,
                self.system_prompt.clone(),
            ));
        }

        match &self.history {
            Some(history) => {
                let recent = history
                    .get_messages(Some(self.settings.context_window))
                    .await?;
                messages.extend(recent.iter().map(CompletionMessage::from));
            }
            None => messages.push(CompletionMessage::from(user_message)),
        }

        Ok(messages)
    }

    fn log_request(&self, request: &CompletionRequest) {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        if !self.settings.verbose {
            return;
        }

        info!(system_prompt = %self.system_prompt, "System prompt");
        for (index, message) in request.messages.iter().enumerate() {
            info!(
                index = index + 1,
                role = %message.role,
                content = %verbose_preview(message),
                "Request message"
            );
        }
        info!(
            model = %request.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "API configuration"
        );
    }
}

fn verbose_preview(message: &CompletionMessage) -> String {
    if message.role != MessageRole::User
        && message.content.chars().count() > VERBOSE_PREVIEW_CHARS
    {
        let head: String = message.content.chars().take(VERBOSE_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        message.content.clone()
    }
}
