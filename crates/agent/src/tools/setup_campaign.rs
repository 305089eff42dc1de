use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use snapactivate_core::domain::campaign::CampaignSetupDraft;
use snapactivate_core::errors::DomainError;
use snapactivate_db::operations::CampaignOperations;

use super::{arguments_object, to_output, Tool, ToolContext, ToolDefinition, ToolError};

pub const NAME: &str = "setupCampaign";

pub struct SetupCampaignTool {
    campaigns: CampaignOperations,
    definition: ToolDefinition,
}

impl SetupCampaignTool {
    pub fn new(campaigns: CampaignOperations) -> Self {
        Self {
            campaigns,
            definition: ToolDefinition {
                name: NAME,
                description: "Creates a new campaign for the signed-in brand. Collect title, locationZone, date, packageTier and promoters from the user before calling.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "title": {"type": "string", "description": "The title of the new campaign."},
                        "locationZone": {"type": "string", "description": "The general location zone for the campaign (e.g. Downtown, Suburbs)."},
                        "date": {"type": "string", "description": "The start date of the campaign in YYYY-MM-DD format."},
                        "packageTier": {"type": "string", "description": "The package tier (e.g. Bronze, Silver, Gold)."},
                        "promoters": {"type": "integer", "description": "The number of promoters required."},
                        "description": {"type": "string", "description": "A brief description of the campaign."}
                    },
                    "required": ["title", "locationZone", "date", "packageTier", "promoters"]
                }),
                output_schema: json!({
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "status": {"type": "string"},
                        "title": {"type": "string"}
                    },
                    "required": ["id", "status", "title"]
                }),
                requires_identity: true,
                side_effects: true,
            },
        }
    }
}

#[async_trait]
impl Tool for SetupCampaignTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let brand_id = context.caller()?;

        let draft = CampaignSetupDraft::from_arguments(&arguments_object(input));
        if let Some(field) = draft.next_missing_field() {
            return Err(ToolError::Validation(format!(
                "missing required field `{field}`; ask the user for it before calling {NAME} again"
            )));
        }

        let request = draft.into_request().map_err(|error| match error {
            DomainError::InvalidSetupField { field, reason } => ToolError::Validation(format!(
                "invalid value for `{field}`: {reason}; ask the user to correct it"
            )),
            other => ToolError::Validation(other.to_string()),
        })?;

        let booked = self.campaigns.book_campaign(request, brand_id).await?;
        info!(
            event_name = "agent.tool.campaign_booked",
            correlation_id = %context.correlation_id,
            campaign_id = %booked.id.0,
            status = booked.status.as_str(),
            "campaign booked from conversation"
        );
        to_output(&booked)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use snapactivate_core::domain::brand::{BrandId, BrandProfile, PaymentPlan, UserRole};
    use snapactivate_db::repositories::{BrandRepository, CampaignRepository};
    use snapactivate_db::{BackendOperations, Stores};

    use super::SetupCampaignTool;
    use crate::tools::{Tool, ToolContext, ToolErrorKind};

    fn context(caller: Option<&str>) -> ToolContext {
        ToolContext {
            caller: caller.map(|id| BrandId(id.to_string())),
            correlation_id: "req-setup".to_string(),
        }
    }

    async fn stores_with_elite_brand() -> Stores {
        let stores = Stores::in_memory();
        stores
            .brands
            .save(BrandProfile {
                id: BrandId("brand-lumen".to_string()),
                name: "Sipho Dlamini".to_string(),
                company_name: Some("Lumen Beverages".to_string()),
                payment_plan: PaymentPlan::Elite,
                role: UserRole::Brand,
                created_at: Utc::now(),
            })
            .await
            .expect("save brand");
        stores
    }

    fn complete_arguments() -> serde_json::Value {
        json!({
            "title": "Festive Pop-up",
            "locationZone": "Sandton City",
            "date": "2026-12-12",
            "packageTier": "Gold",
            "promoters": 4
        })
    }

    #[tokio::test]
    async fn complete_arguments_book_a_campaign() {
        let stores = stores_with_elite_brand().await;
        let tool = SetupCampaignTool::new(BackendOperations::new(&stores).campaigns);

        let output =
            tool.execute(complete_arguments(), &context(Some("brand-lumen"))).await.expect("booked");

        assert_eq!(output["status"], "Pending PO");
        assert_eq!(output["title"], "Festive Pop-up");
        assert!(!output["id"].as_str().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_are_named_in_canonical_order() {
        let stores = stores_with_elite_brand().await;
        let tool = SetupCampaignTool::new(BackendOperations::new(&stores).campaigns);

        let error = tool
            .execute(json!({"title": "Festive Pop-up", "packageTier": "Gold"}), &context(Some("brand-lumen")))
            .await
            .expect_err("incomplete");

        assert_eq!(error.kind(), ToolErrorKind::Validation);
        assert!(error.to_string().contains("`locationZone`"));
        assert!(stores.campaigns.list(&Default::default()).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn identity_is_checked_before_arguments() {
        let stores = stores_with_elite_brand().await;
        let tool = SetupCampaignTool::new(BackendOperations::new(&stores).campaigns);

        let error = tool.execute(json!({}), &context(None)).await.expect_err("anonymous");
        assert_eq!(error.kind(), ToolErrorKind::Authentication);
    }

    #[tokio::test]
    async fn unknown_brand_is_an_authentication_failure() {
        let stores = stores_with_elite_brand().await;
        let tool = SetupCampaignTool::new(BackendOperations::new(&stores).campaigns);

        let error =
            tool.execute(complete_arguments(), &context(Some("brand-ghost"))).await.expect_err("ghost");

        assert_eq!(error.kind(), ToolErrorKind::Authentication);
        assert!(stores.campaigns.list(&Default::default()).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn invalid_dates_are_validation_errors() {
        let stores = stores_with_elite_brand().await;
        let tool = SetupCampaignTool::new(BackendOperations::new(&stores).campaigns);
        let mut arguments = complete_arguments();
        arguments["date"] = json!("next friday");

        let error = tool.execute(arguments, &context(Some("brand-lumen"))).await.expect_err("bad date");
        assert_eq!(error.kind(), ToolErrorKind::Validation);
        assert!(error.to_string().contains("`date`"));
    }
}
