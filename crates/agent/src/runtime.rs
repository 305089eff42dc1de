use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use snapactivate_core::domain::brand::BrandId;
use snapactivate_core::errors::{ApplicationError, DomainError};

use crate::guardrails::{self, ToolLedger, ToolOutcome};
use crate::llm::{
    ConversationTurn, GenerationRequest, LlmClient, LlmError, ToolCall, ToolDispatcher, TurnRole,
};
use crate::prompt::SYSTEM_INSTRUCTIONS;
use crate::response::{self, AssistantResponse, ResponseError};
use crate::tools::{ToolContext, ToolError, ToolErrorKind, ToolRegistry};

/// Input of one assistant turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub history: Vec<ConversationTurn>,
    #[serde(default, alias = "brandId")]
    pub caller_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("conversation history must end with a user turn")]
    NoUserTurn,
    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),
    #[error("generation failed: {0}")]
    InvalidOutput(#[from] ResponseError),
}

impl From<AgentError> for ApplicationError {
    fn from(error: AgentError) -> Self {
        match error {
            AgentError::NoUserTurn => Self::Domain(DomainError::InvariantViolation(
                "conversation history must end with a user turn".to_string(),
            )),
            AgentError::Generation(LlmError::Configuration(message)) => Self::Configuration(message),
            other => Self::Integration(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct AgentRuntime {
    llm: Arc<dyn LlmClient>,
    registry: Arc<ToolRegistry>,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, registry: Arc<ToolRegistry>) -> Self {
        Self { llm, registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn provider(&self) -> &'static str {
        self.llm.provider()
    }

    /// Runs one turn: the model sees the history and the full tool catalogue,
    /// tool calls are dispatched with the bound caller identity, and the final
    /// output is parsed and passed through the guardrails.
    pub async fn respond(&self, request: &ChatRequest) -> Result<AssistantResponse, AgentError> {
        if request.history.last().map(|turn| turn.role) != Some(TurnRole::User) {
            return Err(AgentError::NoUserTurn);
        }

        let correlation_id = Uuid::new_v4().to_string();
        let caller = request.caller_id.as_deref().and_then(BrandId::parse);
        info!(
            event_name = "agent.turn.started",
            correlation_id = %correlation_id,
            provider = self.llm.provider(),
            history_len = request.history.len(),
            caller_bound = caller.is_some(),
            "assistant turn started"
        );

        let tools = BoundTools {
            registry: self.registry.clone(),
            context: ToolContext { caller, correlation_id: correlation_id.clone() },
            ledger: Mutex::new(ToolLedger::default()),
        };
        let generation = GenerationRequest {
            system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
            history: request.history.clone(),
            tools: self.registry.specs(),
            output_schema: Some(response::output_schema()),
        };

        let raw = self.llm.generate(&generation, &tools).await;
        let ledger = tools.ledger.into_inner();
        let raw = raw.map_err(|error| {
            warn!(
                event_name = "agent.turn.failed",
                correlation_id = %correlation_id,
                error = %error,
                "model generation failed"
            );
            error
        })?;

        let reply = match AssistantResponse::parse_model_output(&raw) {
            Ok(parsed) => guardrails::apply(parsed, &ledger),
            Err(error) => match guardrails::fallback_for(&ledger) {
                Some(fallback) => fallback,
                None => {
                    warn!(
                        event_name = "agent.turn.invalid_output",
                        correlation_id = %correlation_id,
                        error = %error,
                        "model output rejected"
                    );
                    return Err(error.into());
                }
            },
        };

        info!(
            event_name = "agent.turn.completed",
            correlation_id = %correlation_id,
            structured = reply.is_structured(),
            tool_calls = !ledger.is_empty(),
            "assistant turn completed"
        );
        Ok(reply)
    }
}

/// Registry view for a single turn: caller identity bound, outcomes recorded.
struct BoundTools {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
    ledger: Mutex<ToolLedger>,
}

#[async_trait]
impl ToolDispatcher for BoundTools {
    async fn dispatch(&self, call: ToolCall) -> Value {
        let identity_rejected = self
            .ledger
            .lock()
            .await
            .has_failure(ToolErrorKind::Authentication);

        let result = if identity_rejected && self.registry.requires_identity(&call.name) {
            Err(ToolError::Authentication(
                "caller identity was already rejected in this turn".to_string(),
            ))
        } else {
            self.registry.invoke(&call.name, call.arguments, &self.context).await
        };

        let mut ledger = self.ledger.lock().await;
        match result {
            Ok(value) => {
                ledger.record(&call.name, ToolOutcome::Succeeded);
                info!(
                    event_name = "agent.tool.succeeded",
                    correlation_id = %self.context.correlation_id,
                    tool = %call.name,
                    "tool call succeeded"
                );
                value
            }
            Err(error) => {
                ledger.record(&call.name, ToolOutcome::Failed(error.kind()));
                warn!(
                    event_name = "agent.tool.failed",
                    correlation_id = %self.context.correlation_id,
                    tool = %call.name,
                    kind = error.kind().as_str(),
                    error = %error,
                    "tool call failed"
                );
                error.to_llm_payload()
            }
        }
    }
}
