//! `SQLite` implementation of the `SessionRepository` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use rolechat_core::{
    NewMessage, NewSession, Session, SessionKey, SessionKind, StoreError, StoredMessage,
    ports::SessionRepository,
};

use super::row_mappers::{
    MESSAGE_COLUMNS, format_datetime, row_to_message, row_to_session, session_columns,
    session_table, to_db_int,
};

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

/// `SQLite` implementation of the `SessionRepository` trait.
///
/// General and roleplay sessions live in separate tables; messages of both
/// share `chat_messages` and are ordered by row id.
pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    /// Create a new `SQLite` session repository.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    async fn create_session(&self, session: NewSession) -> Result<SessionKey, StoreError> {
        let now = format_datetime(Utc::now());
        let max_tokens = i64::from(session.max_tokens);
        let temperature = f64::from(session.temperature);

        let result = match &session.roleplay {
            None => {
                sqlx::query(
                    "INSERT INTO chat_sessions (title, instruction, model, temperature, max_tokens, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(&session.title)
                .bind(&session.instruction)
                .bind(&session.model)
                .bind(temperature)
                .bind(max_tokens)
                .bind(&now)
                .bind(&now)
                .execute(&self.pool)
                .await
            }
            Some(profile) => {
                sqlx::query(
                    "INSERT INTO roleplay_sessions (title, prompt_name, language, user_role, gpt_role, difficulty, role_template, instruction, model, temperature, max_tokens, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(&session.title)
                .bind(&profile.prompt_name)
                .bind(&profile.language)
                .bind(&profile.user_role)
                .bind(&profile.gpt_role)
                .bind(profile.difficulty.as_str())
                .bind(&profile.role_template)
                .bind(&session.instruction)
                .bind(&session.model)
                .bind(temperature)
                .bind(max_tokens)
                .bind(&now)
                .bind(&now)
                .execute(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        Ok(SessionKey::new(session.kind(), result.last_insert_rowid()))
    }

    async fn get_session(&self, key: SessionKey) -> Result<Option<Session>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            session_columns(key.kind),
            session_table(key.kind)
        );
        let row = sqlx::query(&sql)
            .bind(key.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(|r| row_to_session(&r, key.kind)).transpose()
    }

    async fn list_sessions(&self, kind: SessionKind) -> Result<Vec<Session>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY updated_at DESC, id DESC",
            session_columns(kind),
            session_table(kind)
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(|row| row_to_session(row, kind)).collect()
    }

    async fn delete_session(&self, key: SessionKey) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM chat_messages WHERE session_kind = ? AND session_id = ?")
            .bind(key.kind.as_str())
            .bind(key.id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let sql = format!("DELETE FROM {} WHERE id = ?", session_table(key.kind));
        let result = sqlx::query(&sql)
            .bind(key.id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            // dropping the transaction rolls it back
            return Err(StoreError::SessionNotFound(key));
        }

        tx.commit().await.map_err(db_err)
    }

    async fn append_message(&self, message: NewMessage) -> Result<i64, StoreError> {
        let key = message.session;
        let (input_tokens, output_tokens) = match message.usage {
            Some(usage) => (
                Some(i64::from(usage.input_tokens)),
                Some(i64::from(usage.output_tokens)),
            ),
            None => (None, None),
        };

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Touch the session and roll up usage first so a missing session
        // aborts the insert
        let sql = format!(
            "UPDATE {} SET updated_at = ?, input_tokens = input_tokens + ?, output_tokens = output_tokens + ? WHERE id = ?",
            session_table(key.kind)
        );
        let touched = sqlx::query(&sql)
            .bind(format_datetime(Utc::now()))
            .bind(input_tokens.unwrap_or(0))
            .bind(output_tokens.unwrap_or(0))
            .bind(key.id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        if touched.rows_affected() == 0 {
            return Err(StoreError::SessionNotFound(key));
        }

        let result = sqlx::query(
            "INSERT INTO chat_messages (session_kind, session_id, role, content, input_tokens, output_tokens, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(key.kind.as_str())
        .bind(key.id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(input_tokens)
        .bind(output_tokens)
        .bind(format_datetime(message.created_at))
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn recent_messages(
        &self,
        key: SessionKey,
        limit: Option<usize>,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        // LIMIT -1 means no limit in SQLite
        let limit = match limit {
            Some(limit) => to_db_int(limit)?,
            None => -1,
        };

        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM (
                SELECT {MESSAGE_COLUMNS} FROM chat_messages
                WHERE session_kind = ? AND session_id = ?
                ORDER BY id DESC
                LIMIT ?
             ) ORDER BY id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(key.kind.as_str())
            .bind(key.id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(row_to_message).collect()
    }

    async fn delete_messages(&self, key: SessionKey) -> Result<u64, StoreError> {
        let result =
            sqlx::query("DELETE FROM chat_messages WHERE session_kind = ? AND session_id = ?")
                .bind(key.kind.as_str())
                .bind(key.id)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(result.rows_affected())
    }

    async fn message_count(&self, key: SessionKey) -> Result<i64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM chat_messages WHERE session_kind = ? AND session_id = ?",
        )
        .bind(key.kind.as_str())
        .bind(key.id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_get("count").map_err(db_err)
    }
}
