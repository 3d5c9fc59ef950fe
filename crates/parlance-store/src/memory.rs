//! In-memory store, used by tests and as a no-database fallback

use crate::{EventLog, SessionStore, StoreError};
use parlance_core::{EventRecord, SessionPatch, SessionRecord};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<HashMap<String, Vec<EventRecord>>>,
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch one session row, for test assertions.
    pub fn fetch_session(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(session_id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl EventLog for MemoryStore {
    async fn append(&self, event: &EventRecord) -> Result<(), StoreError> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(event.session_id.to_string())
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<EventRecord>, StoreError> {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(session_id)
            .cloned()
            .unwrap_or_default();
        events.sort_by_key(|e| e.sequence_num);
        Ok(events)
    }
}

#[async_trait::async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, session: &SessionRecord) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let key = session.session_id.to_string();
        if sessions.contains_key(&key) {
            return Err(StoreError::Conflict(key));
        }
        sessions.insert(key, session.clone());
        Ok(())
    }

    async fn update(&self, session_id: &str, patch: SessionPatch) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))?;
        session.end_time = Some(patch.end_time);
        session.duration_seconds = Some(patch.duration_seconds);
        session.summary = Some(patch.summary);
        session.status = patch.status;
        Ok(())
    }
}
