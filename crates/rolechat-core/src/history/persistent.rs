//! Durable history store backed by a [`SessionRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::chat::{Message, NewMessage, NewSession, RolePlayProfile, Session, SessionKey};
use crate::domain::config::ChatConfig;
use crate::ports::{HistoryStore, SessionRepository, StoreError};
use crate::settings::ChatSettings;

/// Build the session record for a configuration.
///
/// Simple configurations become general sessions carrying the instruction;
/// roleplay configurations become roleplay sessions carrying their
/// parameters and the rendered prompt.
pub fn new_session_for(config: &ChatConfig, settings: &ChatSettings) -> NewSession {
    let (instruction, roleplay) = match config {
        ChatConfig::Simple(simple) => (simple.instruction().to_string(), None),
        ChatConfig::RolePlay(roleplay) => (
            roleplay.build_system_prompt(),
            Some(RolePlayProfile {
                prompt_name: None,
                language: roleplay.language().to_string(),
                user_role: roleplay.user_role().to_string(),
                gpt_role: roleplay.gpt_role().to_string(),
                difficulty: roleplay.difficulty(),
                role_template: roleplay.role_template().to_string(),
            }),
        ),
    };

    NewSession {
        title: String::new(),
        instruction,
        model: settings.model.clone(),
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
        roleplay,
    }
}

enum SessionSource {
    Existing(SessionKey),
    Create(NewSession),
}

/// History store persisted as a session plus its messages.
///
/// The session is resolved lazily on first access: an existing key is
/// checked for presence, a pending [`NewSession`] is inserted.
pub struct PersistentHistoryStore {
    repo: Arc<dyn SessionRepository>,
    source: SessionSource,
    key: OnceCell<SessionKey>,
}

impl PersistentHistoryStore {
    /// Store over an existing session.
    pub fn open(repo: Arc<dyn SessionRepository>, key: SessionKey) -> Self {
        Self {
            repo,
            source: SessionSource::Existing(key),
            key: OnceCell::new(),
        }
    }

    /// Store that creates `session` on first access.
    pub fn create(repo: Arc<dyn SessionRepository>, session: NewSession) -> Self {
        Self {
            repo,
            source: SessionSource::Create(session),
            key: OnceCell::new(),
        }
    }

    /// Store for a configuration.
    ///
    /// The session kind is chosen from the configuration variant. With a
    /// `session_id` the existing session of that kind is reopened,
    /// otherwise a new one is created from the configuration and settings.
    pub fn for_config(
        repo: Arc<dyn SessionRepository>,
        config: &ChatConfig,
        settings: &ChatSettings,
        session_id: Option<i64>,
    ) -> Self {
        match session_id {
            Some(id) => Self::open(repo, SessionKey::new(config.session_kind(), id)),
            None => Self::create(repo, new_session_for(config, settings)),
        }
    }

    /// Key of the backing session, creating the session if needed.
    pub async fn session_key(&self) -> Result<SessionKey, StoreError> {
        self.key
            .get_or_try_init(|| self.resolve_session())
            .await
            .copied()
    }

    /// Current state of the backing session record.
    pub async fn session(&self) -> Result<Session, StoreError> {
        let key = self.session_key().await?;
        self.repo
            .get_session(key)
            .await?
            .ok_or(StoreError::SessionNotFound(key))
    }

    /// Total number of messages stored for the session.
    pub async fn message_count(&self) -> Result<i64, StoreError> {
        let key = self.session_key().await?;
        self.repo.message_count(key).await
    }

    async fn resolve_session(&self) -> Result<SessionKey, StoreError> {
        match &self.source {
            SessionSource::Existing(key) => {
                if self.repo.get_session(*key).await?.is_none() {
                    return Err(StoreError::SessionNotFound(*key));
                }
                debug!(session = %key, "Opened existing session");
                Ok(*key)
            }
            SessionSource::Create(session) => {
                let key = self.repo.create_session(session.clone()).await?;
                debug!(session = %key, model = %session.model, "Created session");
                Ok(key)
            }
        }
    }
}

#[async_trait]
impl HistoryStore for PersistentHistoryStore {
    async fn add_message(&self, message: Message) -> Result<(), StoreError> {
        let key = self.session_key().await?;
        self.repo
            .append_message(NewMessage::from_message(key, message))
            .await?;
        Ok(())
    }

    async fn get_messages(&self, limit: Option<usize>) -> Result<Vec<Message>, StoreError> {
        let key = self.session_key().await?;
        let stored = self.repo.recent_messages(key, limit).await?;
        Ok(stored.into_iter().map(Message::from).collect())
    }

    async fn clear_history(&self) -> Result<(), StoreError> {
        let key = self.session_key().await?;
        let deleted = self.repo.delete_messages(key).await?;
        debug!(session = %key, deleted, "Cleared session history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{Difficulty, RolePlayConfig, SimpleConfig};

    #[test]
    fn test_simple_config_maps_to_general_session() {
        let config = ChatConfig::from(SimpleConfig::new("You are terse."));
        let settings = ChatSettings::default().with_model("gpt-4o-mini");
        let session = new_session_for(&config, &settings);

        assert_eq!(session.instruction, "You are terse.");
        assert_eq!(session.model, "gpt-4o-mini");
        assert!(session.roleplay.is_none());
    }

    #[test]
    fn test_roleplay_config_maps_to_roleplay_session() {
        let roleplay = RolePlayConfig::new(
            "Korean",
            "customer",
            "waiter",
            Difficulty::Intermediate,
            "You are a waiter.",
        )
        .unwrap();
        let prompt = roleplay.build_system_prompt();
        let config = ChatConfig::from(roleplay);
        let session = new_session_for(&config, &ChatSettings::default().with_max_tokens(300));

        assert_eq!(session.instruction, prompt);
        assert_eq!(session.max_tokens, 300);
        let profile = session.roleplay.unwrap();
        assert_eq!(profile.language, "Korean");
        assert_eq!(profile.difficulty, Difficulty::Intermediate);
        assert_eq!(profile.role_template, "You are a waiter.");
    }
}
