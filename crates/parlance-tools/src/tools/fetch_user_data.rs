//! User-profile lookup tool

use crate::registry::{Tool, ToolError};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Simulated profile-service latency.
const LOOKUP_LATENCY: Duration = Duration::from_millis(500);

pub struct FetchUserDataTool;

impl FetchUserDataTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FetchUserDataTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Tool for FetchUserDataTool {
    fn name(&self) -> &str {
        "fetch_user_data"
    }

    fn description(&self) -> &str {
        "Fetch detailed user profile and subscription information"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "The user ID to fetch data for"
                }
            },
            "required": ["user_id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let user_id = args["user_id"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("user_id".into()))?;

        tokio::time::sleep(LOOKUP_LATENCY).await;

        debug!("fetch_user_data: {}", user_id);

        let short: String = user_id.chars().take(8).collect();
        Ok(json!({
            "user_id": user_id,
            "name": format!("User_{}", short),
            "tier": "premium",
            "created_at": "2024-01-15",
        }))
    }
}
