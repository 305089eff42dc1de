use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use snapactivate_core::domain::support::{SupportTicketRequest, TicketPriority};
use snapactivate_db::operations::SupportOperations;

use super::{parse_arguments, to_output, Tool, ToolContext, ToolDefinition, ToolError};

pub const NAME: &str = "reportIssue";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueArguments {
    #[serde(default)]
    campaign_name: String,
    #[serde(default)]
    issue_description: String,
    #[serde(default)]
    priority: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueOutput<'a> {
    ticket_id: &'a str,
}

pub struct ReportIssueTool {
    support: SupportOperations,
    definition: ToolDefinition,
}

impl ReportIssueTool {
    pub fn new(support: SupportOperations) -> Self {
        let priorities = TicketPriority::ALL.iter().map(TicketPriority::as_str).collect::<Vec<_>>();
        Self {
            support,
            definition: ToolDefinition {
                name: NAME,
                description: "Creates a support ticket when the user wants to report a problem, flag an issue, or needs support. Confirm the priority with the user first.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "campaignName": {"type": "string", "description": "The name of the campaign the issue relates to."},
                        "issueDescription": {"type": "string", "description": "A clear and concise description of the issue."},
                        "priority": {"type": "string", "enum": priorities, "description": "The priority chosen by the user."}
                    },
                    "required": ["campaignName", "issueDescription", "priority"]
                }),
                output_schema: json!({
                    "type": "object",
                    "properties": {"ticketId": {"type": "string"}},
                    "required": ["ticketId"]
                }),
                requires_identity: true,
                side_effects: true,
            },
        }
    }
}

#[async_trait]
impl Tool for ReportIssueTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let brand_id = context.caller()?;
        let arguments: IssueArguments = parse_arguments(NAME, input)?;

        for (field, value) in [
            ("campaignName", &arguments.campaign_name),
            ("issueDescription", &arguments.issue_description),
            ("priority", &arguments.priority),
        ] {
            if value.trim().is_empty() {
                return Err(ToolError::Validation(format!(
                    "missing required field `{field}`; ask the user for it"
                )));
            }
        }
        let priority = TicketPriority::parse(&arguments.priority)
            .map_err(|error| ToolError::Validation(error.to_string()))?;

        let reference = self
            .support
            .create_support_ticket(
                SupportTicketRequest {
                    campaign_name: arguments.campaign_name,
                    issue_description: arguments.issue_description,
                    priority,
                },
                brand_id,
            )
            .await?;
        info!(
            event_name = "agent.tool.ticket_created",
            correlation_id = %context.correlation_id,
            ticket = reference.as_str(),
            priority = priority.as_str(),
            "support ticket created from conversation"
        );
        to_output(&IssueOutput { ticket_id: reference.as_str() })
    }
}
