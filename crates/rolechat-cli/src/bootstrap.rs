//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Database pool and session repository (via rolechat-db)
//! - Completion client (via rolechat-openai)
//! - Chat services and history stores (via rolechat-core)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use rolechat_core::paths::database_path;
use rolechat_core::{
    ChatConfig, ChatService, ChatSettings, CompletionClient, HistoryStore, InMemoryHistoryStore,
    PersistentHistoryStore, SessionKey, SessionRepository, new_session_for, validate_settings,
};
use rolechat_db::{StoreFactory, setup_database};
use rolechat_openai::{DefaultOpenAiClient, OpenAiConfig};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Path to the `SQLite` session database.
    pub database_path: PathBuf,
    /// Chat settings after command-line overrides.
    pub settings: ChatSettings,
}

impl CliConfig {
    /// Resolve configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let database_path = match &cli.database {
            Some(path) => path.clone(),
            None => database_path()?,
        };

        let mut settings = ChatSettings::default();
        settings.merge(&cli.settings_update());
        validate_settings(&settings).map_err(|e| CliError::Arguments(e.to_string()))?;

        Ok(Self {
            database_path,
            settings,
        })
    }
}

/// Where a conversation's history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// In memory only, discarded on exit.
    Memory,
    /// A new durable session.
    NewSession,
    /// An existing durable session.
    Resume(i64),
}

impl HistoryMode {
    pub const fn from_args(memory: bool, session: Option<i64>) -> Self {
        match (memory, session) {
            (true, _) => Self::Memory,
            (false, Some(id)) => Self::Resume(id),
            (false, None) => Self::NewSession,
        }
    }
}

/// A ready-to-use conversation.
pub struct Conversation {
    pub service: ChatService,
    /// Backing durable store, absent in memory mode.
    pub persistent: Option<Arc<PersistentHistoryStore>>,
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Session repository for listing and maintenance commands.
    pub sessions: Arc<dyn SessionRepository>,
    /// Effective chat settings.
    pub settings: ChatSettings,
}

impl CliContext {
    /// Access the session repository.
    pub fn sessions(&self) -> &Arc<dyn SessionRepository> {
        &self.sessions
    }

    /// Configuration a stored session was created with.
    pub async fn stored_config(&self, key: SessionKey) -> Result<ChatConfig> {
        let session = self
            .sessions
            .get_session(key)
            .await
            .map_err(CliError::from)?
            .ok_or_else(|| CliError::Arguments(format!("session {key} not found")))?;

        let config = ChatConfig::try_from(&session)
            .map_err(|e| CliError::Config(format!("session {key}: {e}")))?;
        Ok(config)
    }

    /// Build a conversation for `config`.
    ///
    /// The completion client is only created here, so commands that never
    /// call the API work without an API key. `prompt_name` labels a new
    /// roleplay session with the scenario it was started from.
    pub fn conversation(
        &self,
        config: ChatConfig,
        mode: HistoryMode,
        prompt_name: Option<&str>,
    ) -> Result<Conversation> {
        let client: Arc<dyn CompletionClient> = Arc::new(
            DefaultOpenAiClient::new(&OpenAiConfig::from_env()).map_err(CliError::from)?,
        );
        self.conversation_with_client(config, mode, prompt_name, client)
    }

    /// Build a conversation over a given completion client.
    pub fn conversation_with_client(
        &self,
        config: ChatConfig,
        mode: HistoryMode,
        prompt_name: Option<&str>,
        client: Arc<dyn CompletionClient>,
    ) -> Result<Conversation> {
        let persistent = match mode {
            HistoryMode::Memory => None,
            HistoryMode::Resume(id) => Some(PersistentHistoryStore::open(
                self.sessions.clone(),
                SessionKey::new(config.session_kind(), id),
            )),
            HistoryMode::NewSession => {
                let mut session = new_session_for(&config, &self.settings);
                if let Some(profile) = session.roleplay.as_mut() {
                    profile.prompt_name = prompt_name.map(str::to_string);
                }
                Some(PersistentHistoryStore::create(self.sessions.clone(), session))
            }
        }
        .map(Arc::new);

        let history: Arc<dyn HistoryStore> = match &persistent {
            Some(store) => store.clone(),
            None => Arc::new(InMemoryHistoryStore::new()),
        };

        let service = ChatService::new(config, self.settings.clone(), client)
            .map_err(CliError::from)?
            .with_history(history);

        Ok(Conversation {
            service,
            persistent,
        })
    }
}

/// Bootstrap the CLI application.
///
/// Opens (creating if needed) the session database and wires the
/// repository into a [`CliContext`].
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    debug!(path = %config.database_path.display(), "Opening session database");
    let pool = setup_database(&config.database_path).await?;

    Ok(CliContext {
        sessions: StoreFactory::session_repository(pool),
        settings: config.settings,
    })
}

/// Bootstrap with a custom repository (for testing).
pub fn bootstrap_with(sessions: Arc<dyn SessionRepository>, settings: ChatSettings) -> CliContext {
    CliContext { sessions, settings }
}
