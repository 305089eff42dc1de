//! Provider-neutral LLM interface used by the assistant runtime.
//!
//! A generation request carries the whole tool catalogue. Providers run the
//! tool-calling loop themselves and call back into a [`ToolDispatcher`] for
//! every function call the model emits, so the runtime only sees the final
//! text of the turn.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

use snapactivate_core::config::{AppConfig, LlmProvider};

use crate::gemini::GeminiClient;
use crate::ollama::OllamaClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: TurnRole::User, content: content.into() }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self { role: TurnRole::Model, content: content.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolSpec {
    /// True when the parameter schema declares no properties at all.
    pub fn takes_no_arguments(&self) -> bool {
        self.parameters
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| properties.is_empty())
            .unwrap_or(true)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Value,
}

#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub system_instructions: String,
    pub history: Vec<ConversationTurn>,
    pub tools: Vec<ToolSpec>,
    pub output_schema: Option<Value>,
}

impl GenerationRequest {
    /// System instructions with the expected JSON output schema appended.
    pub fn instructions_with_schema(&self) -> String {
        match &self.output_schema {
            Some(schema) => format!(
                "{}\n\nReply with a single JSON object that matches this JSON schema and nothing else:\n{}",
                self.system_instructions.trim_end(),
                schema
            ),
            None => self.system_instructions.clone(),
        }
    }
}

#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Executes one model-requested call. Failures come back as an
    /// `{"error": {...}}` value so the model can react to them.
    async fn dispatch(&self, call: ToolCall) -> Value;
}

/// Dispatcher for requests that expose no tools.
pub struct NoTools;

#[async_trait]
impl ToolDispatcher for NoTools {
    async fn dispatch(&self, call: ToolCall) -> Value {
        json!({
            "error": {
                "kind": "unknown_tool",
                "message": format!("tool `{}` is not available", call.name),
            }
        })
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm configuration error: {0}")]
    Configuration(String),
    #[error("llm transport error: {0}")]
    Transport(String),
    #[error("llm api returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("llm response could not be decoded: {0}")]
    Decode(String),
    #[error("model exceeded {0} tool rounds in one turn")]
    ToolLoopExceeded(u32),
    #[error("model returned an empty response")]
    EmptyResponse,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn generate(
        &self,
        request: &GenerationRequest,
        tools: &dyn ToolDispatcher,
    ) -> Result<String, LlmError>;
}

/// Builds the client for the configured provider.
pub fn client_from_config(config: &AppConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.llm.timeout_secs))
        .build()
        .map_err(|error| LlmError::Configuration(error.to_string()))?;
    let transport = HttpTransport { http, max_retries: config.llm.max_retries };

    let client: Arc<dyn LlmClient> = match config.llm.provider {
        LlmProvider::Gemini => {
            let api_key = config.llm.api_key.clone().ok_or_else(|| {
                LlmError::Configuration("llm.api_key is required for gemini".to_string())
            })?;
            Arc::new(GeminiClient::new(
                transport,
                config.llm_base_url(),
                config.llm.model.clone(),
                api_key,
                config.llm.max_tool_rounds,
            ))
        }
        LlmProvider::Ollama => Arc::new(OllamaClient::new(
            transport,
            config.llm_base_url(),
            config.llm.model.clone(),
            config.llm.max_tool_rounds,
        )),
    };
    Ok(client)
}

/// JSON POST with retries on transport failures and 429/5xx responses.
#[derive(Clone, Debug)]
pub(crate) struct HttpTransport {
    pub(crate) http: reqwest::Client,
    pub(crate) max_retries: u32,
}

impl HttpTransport {
    const BACKOFF_MS: u64 = 250;

    pub(crate) async fn post_json<B, R>(
        &self,
        url: &str,
        headers: &[(&'static str, &str)],
        body: &B,
    ) -> Result<R, LlmError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            match self.post_once(url, headers, body).await {
                Ok(response) => return Ok(response),
                Err(error) if attempt < self.max_retries && is_retryable(&error) => {
                    attempt += 1;
                    warn!(
                        event_name = "agent.llm.retry",
                        attempt,
                        max_retries = self.max_retries,
                        error = %error,
                        "retrying llm request"
                    );
                    tokio::time::sleep(Duration::from_millis(Self::BACKOFF_MS * u64::from(attempt)))
                        .await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn post_once<B, R>(
        &self,
        url: &str,
        headers: &[(&'static str, &str)],
        body: &B,
    ) -> Result<R, LlmError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self.http.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response =
            request.send().await.map_err(|error| LlmError::Transport(error.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|error| LlmError::Transport(error.to_string()))?;

        if !status.is_success() {
            return Err(LlmError::Api { status: status.as_u16(), message: api_error_message(&text) });
        }
        serde_json::from_str(&text).map_err(|error| LlmError::Decode(error.to_string()))
    }
}

fn is_retryable(error: &LlmError) -> bool {
    match error {
        LlmError::Transport(_) => true,
        LlmError::Api { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{api_error_message, is_retryable, GenerationRequest, LlmError, ToolSpec};

    #[test]
    fn output_schema_is_appended_to_instructions() {
        let request = GenerationRequest {
            system_instructions: "You are Zola.\n".to_string(),
            history: Vec::new(),
            tools: Vec::new(),
            output_schema: Some(json!({"type": "object"})),
        };

        let instructions = request.instructions_with_schema();
        assert!(instructions.starts_with("You are Zola.\n\nReply with a single JSON object"));
        assert!(instructions.ends_with(r#"{"type":"object"}"#));
    }

    #[test]
    fn empty_property_schemas_take_no_arguments() {
        let spec = ToolSpec {
            name: "getLiveCampaigns".to_string(),
            description: String::new(),
            parameters: json!({"type": "object", "properties": {}}),
        };
        assert!(spec.takes_no_arguments());
    }

    #[test]
    fn only_transport_and_server_side_failures_are_retried() {
        assert!(is_retryable(&LlmError::Transport("reset".to_string())));
        assert!(is_retryable(&LlmError::Api { status: 503, message: String::new() }));
        assert!(is_retryable(&LlmError::Api { status: 429, message: String::new() }));
        assert!(!is_retryable(&LlmError::Api { status: 400, message: String::new() }));
        assert!(!is_retryable(&LlmError::Decode("bad".to_string())));
    }

    #[test]
    fn api_error_message_prefers_structured_error_body() {
        assert_eq!(
            api_error_message(r#"{"error": {"code": 400, "message": "API key not valid"}}"#),
            "API key not valid"
        );
        assert_eq!(api_error_message(r#"{"error": "model not found"}"#), "model not found");
        assert_eq!(api_error_message("gateway timeout"), "gateway timeout");
    }
}
