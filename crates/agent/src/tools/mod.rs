//! Tools the model may call mid-generation, and the registry that owns them.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;

use snapactivate_core::domain::brand::BrandId;
use snapactivate_db::{BackendOperations, OperationError};

use crate::llm::ToolSpec;

pub mod live_campaigns;
pub mod performance_summary;
pub mod report_issue;
pub mod setup_campaign;

pub use live_campaigns::LiveCampaignsTool;
pub use performance_summary::PerformanceSummaryTool;
pub use report_issue::ReportIssueTool;
pub use setup_campaign::SetupCampaignTool;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolErrorKind {
    Validation,
    Authentication,
    Persistence,
    UnknownTool,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::Persistence => "persistence",
            Self::UnknownTool => "unknown_tool",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Persistence(String),
    #[error("tool `{0}` is not registered")]
    UnknownTool(String),
}

impl ToolError {
    pub fn kind(&self) -> ToolErrorKind {
        match self {
            Self::Validation(_) => ToolErrorKind::Validation,
            Self::Authentication(_) => ToolErrorKind::Authentication,
            Self::Persistence(_) => ToolErrorKind::Persistence,
            Self::UnknownTool(_) => ToolErrorKind::UnknownTool,
        }
    }

    /// Shape fed back to the model in place of a tool result.
    pub fn to_llm_payload(&self) -> Value {
        json!({ "error": { "kind": self.kind().as_str(), "message": self.to_string() } })
    }
}

impl From<OperationError> for ToolError {
    fn from(error: OperationError) -> Self {
        match error {
            OperationError::BrandNotFound(_) => {
                Self::Authentication("the signed-in account is not a registered brand".to_string())
            }
            OperationError::CampaignNotFound(name) => {
                Self::Validation(format!("no campaign named `{name}` was found"))
            }
            OperationError::PackageNotFound(id) => {
                Self::Validation(format!("no package with id `{id}` was found"))
            }
            OperationError::Domain(error) => Self::Validation(error.to_string()),
            error @ (OperationError::MissingIdentifier(_) | OperationError::Repository(_)) => {
                Self::Persistence(error.to_string())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub output_schema: Value,
    pub requires_identity: bool,
    pub side_effects: bool,
}

impl ToolDefinition {
    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.to_string(),
            description: self.description.to_string(),
            parameters: self.input_schema.clone(),
        }
    }
}

/// Per-turn context; the caller identity is bound by the runtime, never by the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolContext {
    pub caller: Option<BrandId>,
    pub correlation_id: String,
}

impl ToolContext {
    pub fn caller(&self) -> Result<&BrandId, ToolError> {
        self.caller.as_ref().ok_or_else(|| {
            ToolError::Authentication("no authenticated caller is bound to this conversation".to_string())
        })
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError>;
}

#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// The four assistant tools backed by `operations`.
    pub fn snapactivate(operations: &BackendOperations) -> Self {
        let mut registry = Self::default();
        registry.register(LiveCampaignsTool::new(operations.campaigns.clone()));
        registry.register(SetupCampaignTool::new(operations.campaigns.clone()));
        registry.register(PerformanceSummaryTool::new(operations.performance.clone()));
        registry.register(ReportIssueTool::new(operations.support.clone()));
        registry
    }

    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.definition().name, Arc::new(tool));
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name).map(|tool| tool.definition())
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.definition().spec()).collect()
    }

    pub fn requires_identity(&self, name: &str) -> bool {
        self.definition(name).map(|definition| definition.requires_identity).unwrap_or(false)
    }

    /// Runs one tool. Identity-bound tools fail before their handler runs
    /// when no caller is bound.
    pub async fn invoke(
        &self,
        name: &str,
        input: Value,
        context: &ToolContext,
    ) -> Result<Value, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        if tool.definition().requires_identity {
            context.caller()?;
        }
        tool.execute(input, context).await
    }
}

/// Null arguments count as an empty object.
pub(crate) fn arguments_object(input: Value) -> Value {
    match input {
        Value::Null => json!({}),
        other => other,
    }
}

pub(crate) fn parse_arguments<T>(tool: &str, input: Value) -> Result<T, ToolError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(arguments_object(input))
        .map_err(|error| ToolError::Validation(format!("invalid arguments for {tool}: {error}")))
}

pub(crate) fn to_output<T>(value: &T) -> Result<Value, ToolError>
where
    T: serde::Serialize,
{
    serde_json::to_value(value).map_err(|error| ToolError::Persistence(error.to_string()))
}
