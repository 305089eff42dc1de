use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use snapactivate_db::operations::PerformanceOperations;

use super::{parse_arguments, to_output, Tool, ToolContext, ToolDefinition, ToolError};

pub const NAME: &str = "getPerformanceSummary";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryArguments {
    campaign_name: String,
}

pub struct PerformanceSummaryTool {
    performance: PerformanceOperations,
    definition: ToolDefinition,
}

impl PerformanceSummaryTool {
    pub fn new(performance: PerformanceOperations) -> Self {
        Self {
            performance,
            definition: ToolDefinition {
                name: NAME,
                description: "Generates a performance summary for a specific campaign. Use this when the user asks for a summary, report, or performance details.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "campaignName": {"type": "string", "description": "The name of the campaign to summarize."}
                    },
                    "required": ["campaignName"]
                }),
                output_schema: json!({
                    "type": "object",
                    "properties": {
                        "campaignName": {"type": "string"},
                        "summary": {"type": "object"},
                        "actionButtons": {"type": "array", "items": {"type": "string"}}
                    }
                }),
                requires_identity: false,
                side_effects: false,
            },
        }
    }
}

#[async_trait]
impl Tool for PerformanceSummaryTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let arguments: SummaryArguments = parse_arguments(NAME, input)?;
        if arguments.campaign_name.trim().is_empty() {
            return Err(ToolError::Validation("campaignName is required".to_string()));
        }

        let summary = self
            .performance
            .summarize_performance(&arguments.campaign_name, context.caller.as_ref())
            .await?;
        to_output(&summary)
    }
}
