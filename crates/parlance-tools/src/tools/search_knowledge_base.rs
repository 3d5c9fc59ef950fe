//! Knowledge-base search tool

use crate::registry::{Tool, ToolError};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Simulated search-backend latency.
const SEARCH_LATENCY: Duration = Duration::from_millis(300);

pub struct SearchKnowledgeBaseTool;

impl SearchKnowledgeBaseTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SearchKnowledgeBaseTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Tool for SearchKnowledgeBaseTool {
    fn name(&self) -> &str {
        "search_knowledge_base"
    }

    fn description(&self) -> &str {
        "Search internal knowledge base for information about a topic"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query or topic to look up"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("query".into()))?;

        tokio::time::sleep(SEARCH_LATENCY).await;

        debug!("search_knowledge_base: '{}'", query);

        Ok(json!({
            "results": [
                format!("Result for '{}' #1", query),
                format!("Result for '{}' #2", query),
            ]
        }))
    }
}
