//! WebSocket wire protocol
//!
//! Wire format:
//!
//! Client → Server:
//!   { "type": "message", "content": "search for rust" }
//!
//! Any other `type` value, or a frame that fails to parse, is silently
//! ignored by the gateway — no error frame is sent back for malformed input.
//!
//! Server → Client, one of:
//!   { "type": "text", "content": "...", "chunk": true }
//!   { "type": "tool_use", "tool": "search_knowledge_base", "result": {...} }
//!   { "type": "error", "content": "..." }
//!   { "type": "done" }

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Inbound frame from the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// A user message for the conversation.
    Message { content: String },
    /// Any unrecognized frame type. Ignored by the receive loop.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Outbound frame to the client. These four shapes are the only thing a
/// client ever sees; internal failures below the provider tier stay invisible.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Text {
        content: String,
        chunk: bool,
    },
    ToolUse {
        tool: String,
        result: serde_json::Value,
    },
    Error {
        content: String,
    },
    Done,
}

impl ServerFrame {
    /// A streamed assistant text chunk.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            chunk: true,
        }
    }

    /// A tool execution result.
    pub fn tool_use(tool: impl Into<String>, result: serde_json::Value) -> Self {
        Self::ToolUse {
            tool: tool.into(),
            result,
        }
    }

    /// A turn-fatal provider error.
    pub fn error(content: impl Into<String>) -> Self {
        Self::Error {
            content: content.into(),
        }
    }
}
