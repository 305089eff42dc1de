//! Zola, the SnapActivate assistant.
//!
//! One assistant turn sends the conversation history, the system policy and
//! the tool catalogue to the configured model. Tool calls are dispatched
//! against the backend operations with the caller identity bound by the
//! runtime, and the final output is parsed into an [`AssistantResponse`] and
//! checked by the guardrails before it reaches the user.
//!
//! The model never decides who the caller is or what was persisted. Those
//! come from the runtime and the tool ledger.

pub mod conversation;
pub mod gemini;
pub mod guardrails;
pub mod llm;
pub mod ollama;
pub mod prompt;
pub mod report;
pub mod response;
pub mod runtime;
pub mod tools;

pub use conversation::{Conversation, ConversationState};
pub use llm::{client_from_config, ConversationTurn, LlmClient, LlmError, TurnRole};
pub use report::{CampaignReportGenerator, ReportError};
pub use response::{AssistantResponse, ResponsePayload};
pub use runtime::{AgentError, AgentRuntime, ChatRequest};
pub use tools::ToolRegistry;
