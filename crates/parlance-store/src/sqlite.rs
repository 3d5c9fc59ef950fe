//! SQLite-backed event log and session store

use crate::{EventLog, SessionStore, StoreError};
use chrono::{DateTime, Utc};
use parlance_core::{EventRecord, EventType, Role, SessionId, SessionPatch, SessionRecord, SessionStatus};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a database file and run migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Connection(format!("create directory: {}", e)))?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .map_err(|e| StoreError::Connection(format!("invalid path: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let store = Self::connect(options).await?;
        info!("database ready: {}", path.display());
        Ok(store)
    }

    /// An in-memory database, for tests.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Connection(format!("invalid path: {}", e)))?
            .foreign_keys(true);
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sessions (
                session_id       TEXT PRIMARY KEY,
                user_id          TEXT NOT NULL,
                status           TEXT NOT NULL,
                start_time       TEXT NOT NULL,
                end_time         TEXT,
                duration_seconds INTEGER,
                summary          TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS events (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id   TEXT NOT NULL,
                event_type   TEXT NOT NULL,
                sequence_num INTEGER NOT NULL,
                timestamp    TEXT NOT NULL,
                role         TEXT,
                content      TEXT,
                tool_call_id TEXT,
                tool_name    TEXT,
                tool_result  TEXT,
                UNIQUE(session_id, sequence_num)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_events_session
             ON events(session_id, sequence_num)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch one session row. Not part of the SessionStore contract — the
    /// core only needs create/update — but useful for tests and inspection.
    pub async fn fetch_session(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT session_id, user_id, status, start_time, end_time, duration_seconds, summary
             FROM sessions WHERE session_id = ?1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(SessionRecord {
                session_id: SessionId::new(r.get::<String, _>("session_id")),
                user_id: r.get("user_id"),
                status: parse_status(&r.get::<String, _>("status"))?,
                start_time: parse_timestamp(&r.get::<String, _>("start_time"))?,
                end_time: r
                    .get::<Option<String>, _>("end_time")
                    .map(|t| parse_timestamp(&t))
                    .transpose()?,
                duration_seconds: r.get("duration_seconds"),
                summary: r.get("summary"),
            })
        })
        .transpose()
    }
}

#[async_trait::async_trait]
impl EventLog for SqliteStore {
    async fn append(&self, event: &EventRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO events
             (session_id, event_type, sequence_num, timestamp, role, content, tool_call_id, tool_name, tool_result)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(event.session_id.as_str())
        .bind(event.event_type.as_str())
        .bind(event.sequence_num)
        .bind(event.timestamp.to_rfc3339())
        .bind(event.role.map(|r| r.as_str()))
        .bind(event.content.as_deref())
        .bind(event.tool_call_id.as_deref())
        .bind(event.tool_name.as_deref())
        .bind(event.tool_result.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<EventRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT session_id, event_type, sequence_num, timestamp, role, content, tool_call_id, tool_name, tool_result
             FROM events WHERE session_id = ?1 ORDER BY sequence_num",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(EventRecord {
                    session_id: SessionId::new(r.get::<String, _>("session_id")),
                    event_type: parse_event_type(&r.get::<String, _>("event_type"))?,
                    sequence_num: r.get("sequence_num"),
                    timestamp: parse_timestamp(&r.get::<String, _>("timestamp"))?,
                    role: r
                        .get::<Option<String>, _>("role")
                        .map(|s| parse_role(&s))
                        .transpose()?,
                    content: r.get("content"),
                    tool_call_id: r.get("tool_call_id"),
                    tool_name: r.get("tool_name"),
                    tool_result: r.get("tool_result"),
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl SessionStore for SqliteStore {
    async fn create(&self, session: &SessionRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO sessions (session_id, user_id, status, start_time)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(session.session_id.as_str())
        .bind(&session.user_id)
        .bind(session.status.as_str())
        .bind(session.start_time.to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(session.session_id.to_string()));
        }
        Ok(())
    }

    async fn update(&self, session_id: &str, patch: SessionPatch) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE sessions
             SET end_time = ?1, duration_seconds = ?2, summary = ?3, status = ?4
             WHERE session_id = ?5",
        )
        .bind(patch.end_time.to_rfc3339())
        .bind(patch.duration_seconds)
        .bind(&patch.summary)
        .bind(patch.status.as_str())
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(session_id.to_string()));
        }
        Ok(())
    }
}

fn parse_event_type(s: &str) -> Result<EventType, StoreError> {
    s.parse()
        .map_err(|_| StoreError::Corrupt(format!("event_type: {}", s)))
}

fn parse_role(s: &str) -> Result<Role, StoreError> {
    s.parse()
        .map_err(|_| StoreError::Corrupt(format!("role: {}", s)))
}

fn parse_status(s: &str) -> Result<SessionStatus, StoreError> {
    s.parse()
        .map_err(|_| StoreError::Corrupt(format!("status: {}", s)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("timestamp: {}", e)))
}
