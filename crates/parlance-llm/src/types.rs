//! Chat turn and completion types
//!
//! `ChatTurn` is the in-memory history representation — a tagged variant per
//! role with role-specific required fields, serializing directly to the
//! OpenAI-compatible message shape the provider consumes. History lives only
//! for the duration of one connection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One message in the model-facing history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatTurn {
    User {
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCallRequest>>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    /// An assistant turn carrying the full set of tool-call requests,
    /// verbatim as the provider returned them.
    pub fn assistant_tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self::Assistant {
            content: None,
            tool_calls: Some(calls),
        }
    }

    /// A tool-result turn, linked to its request by call id.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }
}

/// A model-requested tool invocation, in provider wire shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// The function half of a tool-call request. `arguments` is the raw JSON
/// string exactly as the provider produced it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

impl FunctionCall {
    /// Parse the raw argument payload. Never fails: malformed JSON yields
    /// the explicit empty fallback rather than an error.
    pub fn parse_arguments(&self) -> ToolArguments {
        match serde_json::from_str(&self.arguments) {
            Ok(value) => ToolArguments::Parsed(value),
            Err(_) => ToolArguments::Empty,
        }
    }
}

/// Outcome of parsing tool-call arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolArguments {
    /// Arguments parsed as structured data.
    Parsed(Value),
    /// Fallback for a malformed payload — an empty argument set.
    Empty,
}

impl ToolArguments {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ToolArguments::Empty)
    }

    pub fn into_value(self) -> Value {
        match self {
            ToolArguments::Parsed(value) => value,
            ToolArguments::Empty => serde_json::json!({}),
        }
    }
}

/// One completion response: plain text, requested tool invocations, or both.
#[derive(Clone, Debug, Default)]
pub struct Completion {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl Completion {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            text: None,
            tool_calls: calls,
        }
    }
}
