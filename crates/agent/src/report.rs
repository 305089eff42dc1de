//! Post-campaign report generation.
//!
//! Campaign data is rendered into the analyst prompt with tera, and the model
//! answers with a JSON object matching [`CampaignReport`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tera::{Context, Tera};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use snapactivate_core::domain::performance::{format_rand, CampaignReport, ReportInputs};
use snapactivate_core::errors::ApplicationError;

use crate::llm::{ConversationTurn, GenerationRequest, LlmClient, LlmError, NoTools};
use crate::prompt::REPORT_TEMPLATE;
use crate::response::strip_code_fence;

const TEMPLATE_NAME: &str = "campaign_report.txt";
const REPORT_INSTRUCTIONS: &str =
    "You write post-campaign reports for brand managers. Reply with the JSON report object only.";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report template error: {0}")]
    Template(#[from] tera::Error),
    #[error("report generation failed: {0}")]
    Generation(#[from] LlmError),
    #[error("report output is not a valid report object: {0}")]
    Malformed(String),
}

impl From<ReportError> for ApplicationError {
    fn from(error: ReportError) -> Self {
        match error {
            ReportError::Generation(LlmError::Configuration(message)) => Self::Configuration(message),
            other => Self::Integration(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct VariantRow<'a> {
    name: &'a str,
    units: u32,
    unit_price: String,
}

#[derive(Serialize)]
struct FeedbackRow<'a> {
    engaged_customers: u32,
    male_customers: u32,
    female_customers: u32,
    age_group: &'a str,
    sentiment: &'a str,
    rating: u8,
    comments: &'a str,
}

#[derive(Clone)]
pub struct CampaignReportGenerator {
    llm: Arc<dyn LlmClient>,
    tera: Arc<Tera>,
}

impl CampaignReportGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Result<Self, ReportError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, REPORT_TEMPLATE)?;
        Ok(Self { llm, tera: Arc::new(tera) })
    }

    pub fn render_prompt(&self, inputs: &ReportInputs) -> Result<String, ReportError> {
        let variants = inputs
            .variants
            .iter()
            .map(|variant| VariantRow {
                name: &variant.name,
                units: variant.units,
                unit_price: format_rand(variant.unit_price),
            })
            .collect::<Vec<_>>();
        let feedback = inputs
            .feedback
            .iter()
            .map(|report| FeedbackRow {
                engaged_customers: report.engaged_customers,
                male_customers: report.male_customers,
                female_customers: report.female_customers,
                age_group: &report.age_group,
                sentiment: &report.sentiment,
                rating: report.rating,
                comments: &report.comments,
            })
            .collect::<Vec<_>>();

        let mut context = Context::new();
        context.insert("campaign_name", &inputs.campaign_name);
        context.insert("total_revenue", &format_rand(inputs.total_revenue));
        context.insert("units_sold", &inputs.units_sold);
        context.insert("variants", &variants);
        context.insert("feedback", &feedback);
        context.insert("competitor_notes", &inputs.competitor_notes);

        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }

    pub async fn generate(&self, inputs: &ReportInputs) -> Result<CampaignReport, ReportError> {
        let correlation_id = Uuid::new_v4().to_string();
        let prompt = self.render_prompt(inputs)?;
        info!(
            event_name = "agent.report.started",
            correlation_id = %correlation_id,
            campaign = %inputs.campaign_name,
            provider = self.llm.provider(),
            "campaign report generation started"
        );

        let request = GenerationRequest {
            system_instructions: REPORT_INSTRUCTIONS.to_string(),
            history: vec![ConversationTurn::user(prompt)],
            tools: Vec::new(),
            output_schema: Some(report_schema()),
        };
        let raw = self.llm.generate(&request, &NoTools).await?;

        let report = serde_json::from_str::<CampaignReport>(strip_code_fence(&raw)).map_err(|error| {
            warn!(
                event_name = "agent.report.invalid_output",
                correlation_id = %correlation_id,
                error = %error,
                "report output rejected"
            );
            ReportError::Malformed(error.to_string())
        })?;

        info!(
            event_name = "agent.report.completed",
            correlation_id = %correlation_id,
            recommendations = report.recommendations.len(),
            "campaign report generated"
        );
        Ok(report)
    }
}

pub fn report_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "executiveSummary": {"type": "string"},
            "salesPerformance": {
                "type": "object",
                "properties": {
                    "totalRevenue": {"type": "string"},
                    "unitsSold": {"type": "string"},
                    "bestSellingVariant": {"type": "string"}
                },
                "required": ["totalRevenue", "unitsSold", "bestSellingVariant"]
            },
            "customerInsights": {
                "type": "object",
                "properties": {
                    "sentiment": {"type": "string"},
                    "demographics": {"type": "string"}
                },
                "required": ["sentiment", "demographics"]
            },
            "promoterFeedback": {"type": "string"},
            "competitorActivity": {"type": "string"},
            "recommendations": {"type": "array", "items": {"type": "string"}}
        },
        "required": [
            "executiveSummary",
            "salesPerformance",
            "customerInsights",
            "promoterFeedback",
            "competitorActivity",
            "recommendations"
        ]
    })
}
