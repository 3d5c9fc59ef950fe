//! Groq chat-completions provider (OpenAI-compatible wire format)

use crate::client::{CompletionClient, CompletionError, CompletionResult};
use crate::types::{ChatTurn, Completion, ToolCallRequest};
use parlance_core::ToolDefinition;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const COMPLETION_MAX_TOKENS: u32 = 1024;
const SUMMARY_MAX_TOKENS: u32 = 512;

/// Fixed fallback returned when summary generation fails.
pub const SUMMARY_FALLBACK: &str = "Summary generation failed";

pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GROQ_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn send(&self, body: &ChatRequest) -> CompletionResult<ResponseMessage> {
        debug!("Groq request: model={} messages={}", body.model, body.messages.len());

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Groq error {}: {}", status, error_text);

            return Err(match status.as_u16() {
                401 => CompletionError::AuthFailed(error_text),
                429 => CompletionError::RateLimited {
                    retry_after_ms: 60000,
                },
                _ => CompletionError::RequestFailed(format!("{}: {}", status, error_text)),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| CompletionError::InvalidResponse("no choices in response".into()))
    }
}

#[async_trait::async_trait]
impl CompletionClient for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(
        &self,
        messages: Vec<ChatTurn>,
        tools: &[ToolDefinition],
    ) -> CompletionResult<Completion> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: COMPLETION_MAX_TOKENS,
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.iter().map(FunctionSchema::from).collect())
            },
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
        };

        let message = self.send(&body).await?;

        Ok(Completion {
            text: message.content,
            tool_calls: message.tool_calls.unwrap_or_default(),
        })
    }

    async fn summarize(&self, prompt: &str) -> String {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatTurn::user(prompt)],
            max_tokens: SUMMARY_MAX_TOKENS,
            tools: None,
            tool_choice: None,
        };

        match self.send(&body).await {
            Ok(message) => message
                .content
                .unwrap_or_else(|| SUMMARY_FALLBACK.to_string()),
            Err(e) => {
                warn!("summary generation failed: {}", e);
                SUMMARY_FALLBACK.to_string()
            }
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatTurn>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<FunctionSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

/// Tool definition wrapped in the provider's `function` envelope.
#[derive(Serialize)]
struct FunctionSchema {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionSpec,
}

#[derive(Serialize)]
struct FunctionSpec {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

impl From<&ToolDefinition> for FunctionSchema {
    fn from(def: &ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: FunctionSpec {
                name: def.name.clone(),
                description: def.description.clone(),
                parameters: def.parameters.clone(),
            },
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallRequest>>,
}
