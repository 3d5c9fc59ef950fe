//! Tests for parlance-store: both backends against the EventLog and
//! SessionStore contracts.

use chrono::Utc;
use parlance_core::{
    EventRecord, EventType, Role, SessionId, SessionPatch, SessionRecord, SessionStatus,
};
use parlance_store::{EventLog, MemoryStore, SessionStore, SqliteStore, StoreError};

fn event(session: &str, event_type: EventType, seq: i64) -> EventRecord {
    EventRecord::new(SessionId::new(session), event_type, seq)
}

fn open_session(session: &str) -> SessionRecord {
    SessionRecord::open(SessionId::new(session), "user_deadbeef", Utc::now())
}

fn close_patch() -> SessionPatch {
    SessionPatch {
        end_time: Utc::now(),
        duration_seconds: 42,
        summary: "- talked about rust".to_string(),
        status: SessionStatus::Completed,
    }
}

// ===========================================================================
// MemoryStore
// ===========================================================================

#[tokio::test]
async fn memory_append_and_list_ordered() {
    let store = MemoryStore::new();
    store
        .append(&event("s1", EventType::SessionStart, 1))
        .await
        .unwrap();
    store
        .append(&event("s1", EventType::UserMessage, 2))
        .await
        .unwrap();
    store
        .append(&event("s2", EventType::SessionStart, 1))
        .await
        .unwrap();

    let events = store.list_by_session("s1").await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].sequence_num, 1);
    assert_eq!(events[1].sequence_num, 2);

    let other = store.list_by_session("s2").await.unwrap();
    assert_eq!(other.len(), 1);
}

#[tokio::test]
async fn memory_list_unknown_session_is_empty() {
    let store = MemoryStore::new();
    assert!(store.list_by_session("nope").await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_create_and_update_session() {
    let store = MemoryStore::new();
    store.create(&open_session("s1")).await.unwrap();

    let row = store.fetch_session("s1").unwrap();
    assert_eq!(row.status, SessionStatus::Active);

    store.update("s1", close_patch()).await.unwrap();
    let row = store.fetch_session("s1").unwrap();
    assert_eq!(row.status, SessionStatus::Completed);
    assert_eq!(row.duration_seconds, Some(42));
    assert_eq!(row.summary.as_deref(), Some("- talked about rust"));
    assert!(row.end_time.is_some());
}

#[tokio::test]
async fn memory_duplicate_create_conflicts() {
    let store = MemoryStore::new();
    store.create(&open_session("s1")).await.unwrap();
    let result = store.create(&open_session("s1")).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));
}

#[tokio::test]
async fn memory_update_missing_session_not_found() {
    let store = MemoryStore::new();
    let result = store.update("ghost", close_patch()).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

// ===========================================================================
// SqliteStore
// ===========================================================================

#[tokio::test]
async fn sqlite_event_round_trip_preserves_all_fields() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let full = event("s1", EventType::ToolCall, 1)
        .with_role(Role::Assistant)
        .with_content(r#"{"query":"X"}"#)
        .with_tool_call("call_1", "search_knowledge_base")
        .with_tool_result(r#"{"results":[]}"#);
    store.append(&full).await.unwrap();

    let events = store.list_by_session("s1").await.unwrap();
    assert_eq!(events.len(), 1);
    let read = &events[0];
    assert_eq!(read.session_id.as_str(), "s1");
    assert_eq!(read.event_type, EventType::ToolCall);
    assert_eq!(read.sequence_num, 1);
    assert_eq!(read.role, Some(Role::Assistant));
    assert_eq!(read.content.as_deref(), Some(r#"{"query":"X"}"#));
    assert_eq!(read.tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(read.tool_name.as_deref(), Some("search_knowledge_base"));
    assert_eq!(read.tool_result.as_deref(), Some(r#"{"results":[]}"#));
}

#[tokio::test]
async fn sqlite_list_orders_by_sequence() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    // Insert out of order; the read must come back ordered.
    store
        .append(&event("s1", EventType::UserMessage, 2))
        .await
        .unwrap();
    store
        .append(&event("s1", EventType::SessionStart, 1))
        .await
        .unwrap();
    store
        .append(&event("s1", EventType::SessionEnd, 3))
        .await
        .unwrap();

    let events = store.list_by_session("s1").await.unwrap();
    let seqs: Vec<i64> = events.iter().map(|e| e.sequence_num).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
}

#[tokio::test]
async fn sqlite_duplicate_sequence_rejected() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
        .append(&event("s1", EventType::SessionStart, 1))
        .await
        .unwrap();
    let result = store.append(&event("s1", EventType::UserMessage, 1)).await;
    assert!(result.is_err(), "UNIQUE(session_id, sequence_num) must hold");
}

#[tokio::test]
async fn sqlite_same_sequence_different_sessions_ok() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
        .append(&event("s1", EventType::SessionStart, 1))
        .await
        .unwrap();
    store
        .append(&event("s2", EventType::SessionStart, 1))
        .await
        .unwrap();
}

#[tokio::test]
async fn sqlite_create_and_update_session() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.create(&open_session("s1")).await.unwrap();

    let row = store.fetch_session("s1").await.unwrap().unwrap();
    assert_eq!(row.status, SessionStatus::Active);
    assert_eq!(row.user_id, "user_deadbeef");
    assert!(row.end_time.is_none());

    store.update("s1", close_patch()).await.unwrap();
    let row = store.fetch_session("s1").await.unwrap().unwrap();
    assert_eq!(row.status, SessionStatus::Completed);
    assert_eq!(row.duration_seconds, Some(42));
    assert_eq!(row.summary.as_deref(), Some("- talked about rust"));
    assert!(row.end_time.is_some());
}

#[tokio::test]
async fn sqlite_duplicate_create_conflicts() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.create(&open_session("s1")).await.unwrap();
    let result = store.create(&open_session("s1")).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));
}

#[tokio::test]
async fn sqlite_update_missing_session_not_found() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let result = store.update("ghost", close_patch()).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn sqlite_fetch_missing_session_is_none() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    assert!(store.fetch_session("ghost").await.unwrap().is_none());
}
