//! Parlance Store - persistence adapters for events and sessions
//!
//! Two narrow contracts back the whole system: an append-only event log
//! (`append` / `list_by_session`) and a mutable session row (`create` /
//! `update`). `SqliteStore` implements both against SQLite; `MemoryStore`
//! is the in-process fake used by tests.

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use parlance_core::{EventRecord, SessionPatch, SessionRecord};

/// Append-only, sequence-numbered record of session activity.
#[async_trait::async_trait]
pub trait EventLog: Send + Sync {
    /// Append one immutable event. Callers treat this as a fallible side
    /// effect whose error may be logged and swallowed.
    async fn append(&self, event: &EventRecord) -> Result<(), StoreError>;

    /// Read back all events for a session, ordered by sequence number.
    async fn list_by_session(&self, session_id: &str) -> Result<Vec<EventRecord>, StoreError>;
}

/// Mutable session summary row.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a freshly-opened session row.
    async fn create(&self, session: &SessionRecord) -> Result<(), StoreError>;

    /// Apply the single close-time mutation to a session row.
    async fn update(&self, session_id: &str, patch: SessionPatch) -> Result<(), StoreError>;
}
