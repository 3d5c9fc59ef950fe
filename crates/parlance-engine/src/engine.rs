//! Conversation engine - the bounded tool-calling loop

use chrono::{DateTime, Utc};
use parlance_core::{EventRecord, EventType, Role, ServerFrame, SessionId};
use parlance_llm::{ChatTurn, CompletionClient};
use parlance_store::EventLog;
use parlance_tools::ToolRegistry;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Hard cap on completion round trips per user turn. Prevents runaway
/// tool-call chains from an uncooperative or looping model.
const MAX_COMPLETION_ROUNDS: usize = 3;

/// Fixed instruction prepended to the first completion round of each turn.
/// It travels in the request only and is never persisted to history.
const SYSTEM_INSTRUCTION: &str = "\
You are a helpful assistant. When users ask about user data or knowledge base searches:
- Use fetch_user_data tool for user information
- Use search_knowledge_base tool for knowledge lookups
Answer based on tool results.";

/// Per-session conversation state and the loop that drives it.
///
/// One engine is owned exclusively by one connection task; nothing here is
/// shared or locked. The injected adapters are the only shared resources.
pub struct ConversationEngine {
    session_id: SessionId,
    user_id: String,
    history: Vec<ChatTurn>,
    sequence: i64,
    started_at: DateTime<Utc>,
    finished: bool,
    events: Arc<dyn EventLog>,
    client: Arc<dyn CompletionClient>,
    tools: Arc<ToolRegistry>,
}

impl ConversationEngine {
    pub fn new(
        session_id: SessionId,
        user_id: impl Into<String>,
        events: Arc<dyn EventLog>,
        client: Arc<dyn CompletionClient>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            session_id,
            user_id: user_id.into(),
            history: Vec::new(),
            sequence: 0,
            started_at: Utc::now(),
            finished: false,
            events,
            client,
            tools,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    /// Next event for this session, with the sequence counter advanced.
    /// Sequence numbers are gapless and start at 1.
    pub(crate) fn next_event(&mut self, event_type: EventType) -> EventRecord {
        self.sequence += 1;
        EventRecord::new(self.session_id.clone(), event_type, self.sequence)
    }

    /// Append an event to the log. Best-effort: a write failure is logged
    /// and swallowed — persistence must never abort the conversation.
    pub(crate) async fn record(&self, event: EventRecord) {
        if let Err(e) = self.events.append(&event).await {
            warn!(
                session = %self.session_id,
                "failed to record {} event: {}", event.event_type, e
            );
        }
    }

    /// Flip the finished flag, returning whether it was already set.
    pub(crate) fn mark_finished(&mut self) -> bool {
        std::mem::replace(&mut self.finished, true)
    }

    /// Run one user turn: record it, then interleave completion calls and
    /// tool executions until the model stops requesting tools or the round
    /// budget is spent. Emits exactly one Done frame, always last.
    pub async fn run_turn(&mut self, user_message: &str, frames: &mpsc::Sender<ServerFrame>) {
        let event = self
            .next_event(EventType::UserMessage)
            .with_role(Role::User)
            .with_content(user_message);
        self.record(event).await;
        self.history.push(ChatTurn::user(user_message));

        for round in 1..=MAX_COMPLETION_ROUNDS {
            let mut request = Vec::with_capacity(self.history.len() + 1);
            if round == 1 {
                request.push(ChatTurn::user(SYSTEM_INSTRUCTION));
            }
            request.extend(self.history.iter().cloned());

            let definitions = self.tools.definitions();
            let completion = match self.client.complete(request, &definitions).await {
                Ok(c) => c,
                Err(e) => {
                    // Fatal to this turn only. No retry: surfacing the
                    // failure immediately beats a silent latency spike.
                    error!(session = %self.session_id, "completion failed: {}", e);
                    let _ = frames.send(ServerFrame::error(e.to_string())).await;
                    break;
                }
            };

            let text = completion
                .text
                .as_deref()
                .map(str::trim)
                .unwrap_or_default();
            if !text.is_empty() {
                let event = self
                    .next_event(EventType::AssistantMessage)
                    .with_role(Role::Assistant)
                    .with_content(text);
                self.record(event).await;
                let _ = frames.send(ServerFrame::text(text)).await;
                self.history.push(ChatTurn::assistant(text));
            }

            if completion.tool_calls.is_empty() {
                break;
            }

            let mut results = Vec::with_capacity(completion.tool_calls.len());
            for call in &completion.tool_calls {
                let name = &call.function.name;

                let args = call.function.parse_arguments();
                if args.is_fallback() {
                    warn!(
                        session = %self.session_id,
                        "malformed arguments for {}: {}", name, call.function.arguments
                    );
                }
                let args = args.into_value();

                let event = self
                    .next_event(EventType::ToolCall)
                    .with_tool_call(&call.id, name)
                    .with_content(args.to_string());
                self.record(event).await;

                let result = match self.tools.invoke(name, args).await {
                    Ok(value) => value,
                    Err(e) => {
                        warn!(session = %self.session_id, "tool {} failed: {}", name, e);
                        json!({ "error": e.to_string() })
                    }
                };
                let serialized = result.to_string();

                let event = self
                    .next_event(EventType::ToolResult)
                    .with_tool_call(&call.id, name)
                    .with_tool_result(&serialized);
                self.record(event).await;

                let _ = frames.send(ServerFrame::tool_use(name, result)).await;

                results.push((call.id.clone(), serialized));
            }

            // The provider's turn-taking contract: one assistant turn
            // carrying the full set of calls verbatim, then one tool turn
            // per result, in request order.
            self.history
                .push(ChatTurn::assistant_tool_calls(completion.tool_calls));
            for (id, content) in results {
                self.history.push(ChatTurn::tool(id, content));
            }

            debug!(session = %self.session_id, round, "tool round complete");
        }

        let _ = frames.send(ServerFrame::Done).await;
        info!(
            session = %self.session_id,
            turns = self.history.len(),
            "turn complete"
        );
    }
}
