//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, NaiveDateTime, Utc};
use rolechat_core::{
    Difficulty, MessageRole, RolePlayProfile, Session, SessionKey, SessionKind, StoreError,
    StoredMessage, UsageInfo,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Storage format of every timestamp column.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Shared SELECT column list for general session queries.
pub const GENERAL_SESSION_COLUMNS: &str = "id, title, instruction, model, temperature, max_tokens, input_tokens, output_tokens, is_active, created_at, updated_at";

/// Shared SELECT column list for roleplay session queries.
pub const ROLEPLAY_SESSION_COLUMNS: &str = "id, title, prompt_name, language, user_role, gpt_role, difficulty, role_template, instruction, model, temperature, max_tokens, input_tokens, output_tokens, is_active, created_at, updated_at";

/// Shared SELECT column list for message queries.
pub const MESSAGE_COLUMNS: &str =
    "id, session_kind, session_id, role, content, input_tokens, output_tokens, created_at";

/// Session table backing a session kind.
pub const fn session_table(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::General => "chat_sessions",
        SessionKind::RolePlay => "roleplay_sessions",
    }
}

/// Column list matching [`session_table`].
pub const fn session_columns(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::General => GENERAL_SESSION_COLUMNS,
        SessionKind::RolePlay => ROLEPLAY_SESSION_COLUMNS,
    }
}

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse a stored timestamp, tolerating a trailing " UTC".
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    let trimmed = s.trim_end_matches(" UTC");
    NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT)
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        .map_err(|e| StoreError::InvalidValue(format!("timestamp '{s}': {e}")))
}

/// Convert an unsigned count to its column representation.
pub fn to_db_int<T>(value: T) -> Result<i64, StoreError>
where
    T: TryInto<i64> + Copy + std::fmt::Display,
{
    value
        .try_into()
        .map_err(|_| StoreError::InvalidValue(format!("{value} out of range")))
}

fn from_db_int<T>(value: i64, column: &str) -> Result<T, StoreError>
where
    T: TryFrom<i64>,
{
    T::try_from(value)
        .map_err(|_| StoreError::InvalidValue(format!("{column} out of range: {value}")))
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Database(e.to_string()))
}

/// Parse a session row of either kind.
pub fn row_to_session(row: &SqliteRow, kind: SessionKind) -> Result<Session, StoreError> {
    let roleplay = match kind {
        SessionKind::General => None,
        SessionKind::RolePlay => {
            let difficulty: String = get(row, "difficulty")?;
            Some(RolePlayProfile {
                prompt_name: get(row, "prompt_name")?,
                language: get(row, "language")?,
                user_role: get(row, "user_role")?,
                gpt_role: get(row, "gpt_role")?,
                difficulty: Difficulty::parse(&difficulty).ok_or_else(|| {
                    StoreError::InvalidValue(format!("difficulty '{difficulty}'"))
                })?,
                role_template: get(row, "role_template")?,
            })
        }
    };

    let temperature: f64 = get(row, "temperature")?;
    #[allow(clippy::cast_possible_truncation)]
    let temperature = temperature as f32;
    let created_at: String = get(row, "created_at")?;
    let updated_at: String = get(row, "updated_at")?;

    Ok(Session {
        key: SessionKey::new(kind, get(row, "id")?),
        title: get(row, "title")?,
        instruction: get(row, "instruction")?,
        model: get(row, "model")?,
        temperature,
        max_tokens: from_db_int(get(row, "max_tokens")?, "max_tokens")?,
        roleplay,
        input_tokens: from_db_int(get(row, "input_tokens")?, "input_tokens")?,
        output_tokens: from_db_int(get(row, "output_tokens")?, "output_tokens")?,
        is_active: get(row, "is_active")?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Parse a message row.
pub fn row_to_message(row: &SqliteRow) -> Result<StoredMessage, StoreError> {
    let kind: String = get(row, "session_kind")?;
    let kind = SessionKind::parse(&kind)
        .ok_or_else(|| StoreError::InvalidValue(format!("session kind '{kind}'")))?;

    let role: String = get(row, "role")?;
    let role = MessageRole::parse(&role).ok_or(StoreError::InvalidRole(role))?;

    let input_tokens: Option<i64> = get(row, "input_tokens")?;
    let output_tokens: Option<i64> = get(row, "output_tokens")?;
    let usage = match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => Some(UsageInfo::new(
            from_db_int(input, "input_tokens")?,
            from_db_int(output, "output_tokens")?,
        )),
        _ => None,
    };

    let created_at: String = get(row, "created_at")?;

    Ok(StoredMessage {
        id: get(row, "id")?,
        session: SessionKey::new(kind, get(row, "session_id")?),
        role,
        content: get(row, "content")?,
        usage,
        created_at: parse_datetime(&created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn test_datetime_round_trip_keeps_fraction() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
            + chrono::Duration::microseconds(123_456);
        let parsed = parse_datetime(&format_datetime(dt)).unwrap();
        assert_eq!(parsed, dt);
    }

    #[test]
    fn test_parse_datetime_accepts_sqlite_default_and_utc_suffix() {
        let parsed = parse_datetime("2024-01-02 03:04:05").unwrap();
        assert_eq!(parsed.day(), 2);
        assert!(parse_datetime("2024-01-02 03:04:05 UTC").is_ok());
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(StoreError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_session_table_per_kind() {
        assert_eq!(session_table(SessionKind::General), "chat_sessions");
        assert_eq!(session_table(SessionKind::RolePlay), "roleplay_sessions");
        assert!(session_columns(SessionKind::RolePlay).contains("difficulty"));
        assert!(!session_columns(SessionKind::General).contains("difficulty"));
    }

    #[test]
    fn test_to_db_int_rejects_overflow() {
        assert_eq!(to_db_int(42_u64).unwrap(), 42);
        assert!(to_db_int(u64::MAX).is_err());
    }
}
