//! Gemini `generateContent` client with function calling.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::llm::{
    ConversationTurn, GenerationRequest, HttpTransport, LlmClient, LlmError, ToolCall,
    ToolDispatcher, ToolSpec, TurnRole,
};

pub struct GeminiClient {
    transport: HttpTransport,
    base_url: String,
    model: String,
    api_key: SecretString,
    max_tool_rounds: u32,
}

impl GeminiClient {
    pub(crate) fn new(
        transport: HttpTransport,
        base_url: String,
        model: String,
        api_key: SecretString,
        max_tool_rounds: u32,
    ) -> Self {
        Self { transport, base_url, model, api_key, max_tool_rounds }
    }

    fn endpoint(&self) -> String {
        let model = self.model.strip_prefix("googleai/").unwrap_or(&self.model);
        format!("{}/models/{model}:generateContent", self.base_url)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent,
    contents: &'a [GeminiContent],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [GeminiTool],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(role: &str, text: &str) -> Self {
        Self { role: Some(role.to_string()), parts: vec![GeminiPart::text(text)] }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<GeminiFunctionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought_signature: Option<String>,
}

impl GeminiPart {
    fn text(text: &str) -> Self {
        Self { text: Some(text.to_string()), ..Self::default() }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
}

impl From<&ToolSpec> for GeminiFunctionDeclaration {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: (!spec.takes_no_arguments()).then(|| spec.parameters.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

fn no_tools(tools: &&[GeminiTool]) -> bool {
    tools.is_empty()
}

fn to_contents(history: &[ConversationTurn]) -> Vec<GeminiContent> {
    history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Model => "model",
            };
            GeminiContent::text(role, &turn.content)
        })
        .collect()
}

/// Function responses must be JSON objects; arrays and scalars are wrapped.
fn function_response_payload(value: Value) -> Value {
    if value.is_object() {
        value
    } else {
        json!({ "result": value })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        tools: &dyn ToolDispatcher,
    ) -> Result<String, LlmError> {
        let url = self.endpoint();
        let system_instruction = GeminiContent {
            role: None,
            parts: vec![GeminiPart::text(&request.instructions_with_schema())],
        };
        let declarations = request.tools.iter().map(GeminiFunctionDeclaration::from).collect::<Vec<_>>();
        let tool_catalogue = if declarations.is_empty() {
            Vec::new()
        } else {
            vec![GeminiTool { function_declarations: declarations }]
        };
        let mut contents = to_contents(&request.history);
        let mut rounds = 0u32;

        loop {
            let body = GeminiRequest {
                system_instruction: system_instruction.clone(),
                contents: &contents,
                tools: &tool_catalogue,
            };
            let response: GeminiResponse = self
                .transport
                .post_json(&url, &[("x-goog-api-key", self.api_key.expose_secret())], &body)
                .await?;

            let candidate = response.candidates.into_iter().next().ok_or(LlmError::EmptyResponse)?;
            let content = candidate.content.ok_or(LlmError::EmptyResponse)?;
            let calls = content
                .parts
                .iter()
                .filter_map(|part| part.function_call.clone())
                .collect::<Vec<_>>();

            if calls.is_empty() {
                debug!(
                    event_name = "agent.llm.completed",
                    provider = "gemini",
                    rounds,
                    finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
                    "gemini generation finished"
                );
                let text = content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>();
                if text.trim().is_empty() {
                    return Err(LlmError::EmptyResponse);
                }
                return Ok(text);
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                return Err(LlmError::ToolLoopExceeded(self.max_tool_rounds));
            }

            contents.push(GeminiContent { role: Some("model".to_string()), parts: content.parts });
            let mut responses = Vec::with_capacity(calls.len());
            for call in calls {
                let result = tools
                    .dispatch(ToolCall { name: call.name.clone(), arguments: call.args })
                    .await;
                responses.push(GeminiPart {
                    function_response: Some(GeminiFunctionResponse {
                        name: call.name,
                        response: function_response_payload(result),
                    }),
                    ..GeminiPart::default()
                });
            }
            contents.push(GeminiContent { role: Some("user".to_string()), parts: responses });
        }
    }
}
