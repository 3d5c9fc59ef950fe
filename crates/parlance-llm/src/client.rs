//! CompletionClient trait

use crate::types::{ChatTurn, Completion};
use parlance_core::ToolDefinition;

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Completion provider error types
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Completion provider trait.
///
/// `complete` is a single round trip from the caller's perspective — the
/// streaming visible to clients is per-message-boundary, not per-token.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    fn name(&self) -> &str;

    /// Run one completion over the given turns with the tool-calling
    /// contract attached. Provider failures surface as a distinguishable
    /// `CompletionError`, never as a generic panic path.
    async fn complete(
        &self,
        messages: Vec<ChatTurn>,
        tools: &[ToolDefinition],
    ) -> CompletionResult<Completion>;

    /// Generate a session summary for the given prompt. Never fails: any
    /// provider error yields a fixed fallback string instead.
    async fn summarize(&self, prompt: &str) -> String;
}
