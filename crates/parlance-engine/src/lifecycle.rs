//! Session lifecycle - open on connect, finalize on disconnect

use crate::engine::ConversationEngine;
use chrono::Utc;
use parlance_core::{
    generate_user_id, EventRecord, EventType, SessionId, SessionPatch, SessionRecord,
    SessionStatus,
};
use parlance_llm::CompletionClient;
use parlance_store::{EventLog, SessionStore};
use parlance_tools::ToolRegistry;
use std::sync::Arc;
use tracing::{info, warn};

/// Instruction template for the post-session summary.
const SUMMARY_TEMPLATE: &str = "\
Summarize this conversation in bullet points.
Keep it under 150 words. Include key topics, user intent, and assistant actions.

Conversation:
";

/// Creates sessions on connect and finalizes them on disconnect. Acts as
/// the per-connection engine factory so every engine gets its adapters
/// dependency-injected rather than reaching for process-wide handles.
pub struct SessionLifecycle {
    events: Arc<dyn EventLog>,
    sessions: Arc<dyn SessionStore>,
    client: Arc<dyn CompletionClient>,
    tools: Arc<ToolRegistry>,
}

impl SessionLifecycle {
    pub fn new(
        events: Arc<dyn EventLog>,
        sessions: Arc<dyn SessionStore>,
        client: Arc<dyn CompletionClient>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            events,
            sessions,
            client,
            tools,
        }
    }

    /// Open a session: generate a user id, insert the session row, record
    /// the session_start event, and hand back the engine that owns this
    /// connection's conversation.
    pub async fn connect(&self, session_id: SessionId) -> ConversationEngine {
        let user_id = generate_user_id();
        let mut engine = ConversationEngine::new(
            session_id.clone(),
            &user_id,
            self.events.clone(),
            self.client.clone(),
            self.tools.clone(),
        );

        let row = SessionRecord::open(session_id.clone(), &user_id, engine.started_at());
        if let Err(e) = self.sessions.create(&row).await {
            warn!(session = %session_id, "failed to create session row: {}", e);
        }

        let event = engine
            .next_event(EventType::SessionStart)
            .with_content(session_id.as_str());
        engine.record(event).await;

        info!(session = %session_id, user = %user_id, "session started");
        engine
    }

    /// Finalize a session: compute duration, rebuild the narrative from the
    /// event log, summarize it, record session_end, and close the row.
    ///
    /// Runs at most once per engine — a late receive-loop error and the
    /// transport close path both converge here safely.
    pub async fn disconnect(&self, engine: &mut ConversationEngine) {
        if engine.mark_finished() {
            return;
        }

        let ended_at = Utc::now();
        let duration = (ended_at - engine.started_at()).num_seconds();

        let events = match self
            .events
            .list_by_session(engine.session_id().as_str())
            .await
        {
            Ok(events) => events,
            Err(e) => {
                warn!(session = %engine.session_id(), "failed to read back events: {}", e);
                Vec::new()
            }
        };

        let narrative = render_narrative(&events);
        let summary = self
            .client
            .summarize(&format!("{}{}", SUMMARY_TEMPLATE, narrative))
            .await;

        let event = engine
            .next_event(EventType::SessionEnd)
            .with_content(&summary);
        engine.record(event).await;

        let patch = SessionPatch {
            end_time: ended_at,
            duration_seconds: duration,
            summary: summary.clone(),
            status: SessionStatus::Completed,
        };
        if let Err(e) = self
            .sessions
            .update(engine.session_id().as_str(), patch)
            .await
        {
            warn!(session = %engine.session_id(), "failed to update session row: {}", e);
        }

        info!(
            session = %engine.session_id(),
            duration,
            "session completed: {}",
            summary.chars().take(100).collect::<String>()
        );
    }
}

/// Render the labeled, ordered narrative used as summarization input.
/// Only conversational events appear; bookkeeping events are skipped.
fn render_narrative(events: &[EventRecord]) -> String {
    let mut lines = Vec::new();
    for event in events {
        let content = event.content.as_deref().unwrap_or_default();
        match event.event_type {
            EventType::UserMessage => lines.push(format!("User: {}", content)),
            EventType::AssistantMessage => lines.push(format!("Assistant: {}", content)),
            EventType::ToolCall => lines.push(format!(
                "[Tool Call] {}: {}",
                event.tool_name.as_deref().unwrap_or_default(),
                content
            )),
            _ => {}
        }
    }
    lines.join("\n")
}
