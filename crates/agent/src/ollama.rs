//! Ollama `/api/chat` client for local models with tool support.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::llm::{
    ConversationTurn, GenerationRequest, HttpTransport, LlmClient, LlmError, ToolCall,
    ToolDispatcher, ToolSpec, TurnRole,
};

pub struct OllamaClient {
    transport: HttpTransport,
    base_url: String,
    model: String,
    max_tool_rounds: u32,
}

impl OllamaClient {
    pub(crate) fn new(
        transport: HttpTransport,
        base_url: String,
        model: String,
        max_tool_rounds: u32,
    ) -> Self {
        Self { transport, base_url, model, max_tool_rounds }
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [OllamaMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [OllamaTool],
    stream: bool,
}

fn no_tools(tools: &&[OllamaTool]) -> bool {
    tools.is_empty()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OllamaToolCall>,
}

impl OllamaMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self { role: role.to_string(), content: content.into(), tool_calls: Vec::new() }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OllamaToolCall {
    function: OllamaFunctionCall,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OllamaFunctionCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Serialize)]
struct OllamaTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: OllamaFunction,
}

#[derive(Debug, Serialize)]
struct OllamaFunction {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ToolSpec> for OllamaTool {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            kind: "function",
            function: OllamaFunction {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    done_reason: Option<String>,
}

fn to_messages(instructions: String, history: &[ConversationTurn]) -> Vec<OllamaMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(OllamaMessage::new("system", instructions));
    messages.extend(history.iter().map(|turn| {
        let role = match turn.role {
            TurnRole::User => "user",
            TurnRole::Model => "assistant",
        };
        OllamaMessage::new(role, turn.content.clone())
    }));
    messages
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn provider(&self) -> &'static str {
        "ollama"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        tools: &dyn ToolDispatcher,
    ) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        let catalogue = request.tools.iter().map(OllamaTool::from).collect::<Vec<_>>();
        let mut messages = to_messages(request.instructions_with_schema(), &request.history);
        let mut rounds = 0u32;

        loop {
            let body = OllamaChatRequest {
                model: &self.model,
                messages: &messages,
                tools: &catalogue,
                stream: false,
            };
            let response: OllamaChatResponse = self.transport.post_json(&url, &[], &body).await?;
            let message = response.message.ok_or(LlmError::EmptyResponse)?;

            if message.tool_calls.is_empty() {
                debug!(
                    event_name = "agent.llm.completed",
                    provider = "ollama",
                    rounds,
                    finish_reason = response.done_reason.as_deref().unwrap_or("unknown"),
                    "ollama generation finished"
                );
                if message.content.trim().is_empty() {
                    return Err(LlmError::EmptyResponse);
                }
                return Ok(message.content);
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                return Err(LlmError::ToolLoopExceeded(self.max_tool_rounds));
            }

            let calls = message.tool_calls.clone();
            messages.push(message);
            for call in calls {
                let result = tools
                    .dispatch(ToolCall {
                        name: call.function.name,
                        arguments: call.function.arguments,
                    })
                    .await;
                messages.push(OllamaMessage::new("tool", result.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{to_messages, OllamaChatResponse, OllamaTool};
    use crate::llm::{ConversationTurn, ToolSpec};

    #[test]
    fn system_instructions_lead_the_message_list() {
        let messages = to_messages(
            "You are Zola.".to_string(),
            &[ConversationTurn::user("Hi"), ConversationTurn::model("Hello!")],
        );

        let roles = messages.iter().map(|message| message.role.as_str()).collect::<Vec<_>>();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
        assert_eq!(messages[0].content, "You are Zola.");
    }

    #[test]
    fn tools_serialize_as_function_entries() {
        let tool = OllamaTool::from(&ToolSpec {
            name: "reportIssue".to_string(),
            description: "Creates a support ticket".to_string(),
            parameters: json!({"type": "object", "properties": {"priority": {"type": "string"}}}),
        });

        let value = serde_json::to_value(&tool).expect("serialize");
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "reportIssue");
    }

    #[test]
    fn tool_calls_decode_from_chat_response() {
        let response: OllamaChatResponse = serde_json::from_value(json!({
            "model": "llama3.1",
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{"function": {"name": "getLiveCampaigns", "arguments": {}}}]
            },
            "done": true,
            "done_reason": "stop"
        }))
        .expect("decode");

        let message = response.message.expect("message");
        assert_eq!(message.tool_calls.len(), 1);
        assert_eq!(message.tool_calls[0].function.name, "getLiveCampaigns");
    }
}
