//! Composition utilities for building history stores with `SQLite` backends.
//!
//! This module provides factory functions for wiring up sessions and
//! history stores with the `SQLite` repository. It is focused purely on
//! construction and should not contain any domain logic.

use sqlx::SqlitePool;
use std::sync::Arc;

use rolechat_core::{ChatConfig, ChatSettings, PersistentHistoryStore, SessionRepository};

use crate::repositories::SqliteSessionRepository;

/// Factory for creating repository and store instances with `SQLite` backends.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a session repository from a pool.
    pub fn session_repository(pool: SqlitePool) -> Arc<SqliteSessionRepository> {
        Arc::new(SqliteSessionRepository::new(pool))
    }

    /// Build the durable history store for a configuration.
    ///
    /// The session table follows the configuration variant. With
    /// `session_id` an existing session is resumed; otherwise a new session
    /// is created on first use.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use rolechat_db::{StoreFactory, setup_database};
    ///
    /// let pool = setup_database(&db_path).await?;
    /// let store = StoreFactory::history_store(pool, &config, &settings, None);
    /// let service = ChatService::new(config, settings, client)?.with_history(Arc::new(store));
    /// ```
    pub fn history_store(
        pool: SqlitePool,
        config: &ChatConfig,
        settings: &ChatSettings,
        session_id: Option<i64>,
    ) -> PersistentHistoryStore {
        let repo: Arc<dyn SessionRepository> = Self::session_repository(pool);
        PersistentHistoryStore::for_config(repo, config, settings, session_id)
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory `SQLite` database with the production schema.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    /// Get the connection pool.
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Session repository over this database.
    pub fn session_repository(&self) -> Arc<SqliteSessionRepository> {
        StoreFactory::session_repository(self.pool.clone())
    }

    /// History store over this database.
    pub fn history_store(
        &self,
        config: &ChatConfig,
        settings: &ChatSettings,
        session_id: Option<i64>,
    ) -> PersistentHistoryStore {
        StoreFactory::history_store(self.pool.clone(), config, settings, session_id)
    }
}
