//! The structured reply of one assistant turn and the parser for model output.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use snapactivate_core::domain::performance::PerformanceSummary;
use snapactivate_core::domain::promoter::CampaignLiveStatus;

pub const GREETING: &str = "Hi there! I'm Zola, your AI assistant. How can I help you streamline your campaign management today?";
pub const GREETING_BUTTONS: [&str; 3] = ["Live Campaigns", "Setup a Campaign", "Performance Summary"];

/// Exactly one of the three reply shapes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponsePayload {
    Text(String),
    LiveStatus(Vec<CampaignLiveStatus>),
    PerformanceSummary(PerformanceSummary),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantResponse {
    #[serde(flatten)]
    pub payload: ResponsePayload,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("model output was empty")]
    Empty,
    #[error("model output is not a valid response object: {0}")]
    Malformed(String),
    #[error("model output populated both liveStatus and performanceSummary")]
    ConflictingPayloads,
}

/// `liveStatus` as a bare list, or wrapped as `{"campaigns": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LiveStatusField {
    List(Vec<CampaignLiveStatus>),
    Wrapped { campaigns: Vec<CampaignLiveStatus> },
}

impl LiveStatusField {
    fn into_list(self) -> Vec<CampaignLiveStatus> {
        match self {
            Self::List(campaigns) | Self::Wrapped { campaigns } => campaigns,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssistantOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "campaignLiveStatus")]
    live_status: Option<LiveStatusField>,
    #[serde(default)]
    performance_summary: Option<PerformanceSummary>,
    #[serde(default)]
    buttons: Option<Vec<String>>,
}

impl AssistantResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self { payload: ResponsePayload::Text(text.into()), buttons: Vec::new() }
    }

    pub fn with_buttons<I, S>(mut self, buttons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buttons = buttons.into_iter().map(Into::into).collect();
        self
    }

    pub fn greeting() -> Self {
        Self::text(GREETING).with_buttons(GREETING_BUTTONS)
    }

    pub fn is_structured(&self) -> bool {
        !matches!(self.payload, ResponsePayload::Text(_))
    }

    /// Parses the final model output. A Markdown code fence around the JSON
    /// object is tolerated; structured payloads take precedence over prose.
    pub fn parse_model_output(raw: &str) -> Result<Self, ResponseError> {
        let body = strip_code_fence(raw);
        if body.is_empty() {
            return Err(ResponseError::Empty);
        }

        let output = serde_json::from_str::<RawAssistantOutput>(body)
            .map_err(|error| ResponseError::Malformed(error.to_string()))?;
        let buttons = output
            .buttons
            .unwrap_or_default()
            .into_iter()
            .map(|button| button.trim().to_string())
            .filter(|button| !button.is_empty())
            .collect();

        let payload = match (output.live_status, output.performance_summary) {
            (Some(_), Some(_)) => return Err(ResponseError::ConflictingPayloads),
            (Some(live), None) => ResponsePayload::LiveStatus(live.into_list()),
            (None, Some(summary)) => ResponsePayload::PerformanceSummary(summary),
            (None, None) => match output.text.map(|text| text.trim().to_string()) {
                Some(text) if !text.is_empty() => ResponsePayload::Text(text),
                _ => {
                    return Err(ResponseError::Malformed(
                        "no text, liveStatus or performanceSummary".to_string(),
                    ))
                }
            },
        };

        Ok(Self { payload, buttons })
    }

    /// Text kept in the conversation history for this reply.
    pub fn history_text(&self) -> String {
        match &self.payload {
            ResponsePayload::Text(text) => text.clone(),
            ResponsePayload::LiveStatus(campaigns) => {
                let titles = campaigns
                    .iter()
                    .map(|campaign| campaign.campaign_title.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Shared the live status of {} active campaign(s): {titles}.", campaigns.len())
            }
            ResponsePayload::PerformanceSummary(summary) => {
                format!("Shared the performance summary for {}.", summary.campaign_name)
            }
        }
    }
}

pub(crate) fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// JSON schema of the reply object, sent with every generation request.
pub fn output_schema() -> Value {
    let string_list = json!({"type": "array", "items": {"type": "string"}});
    json!({
        "type": "object",
        "properties": {
            "text": {"type": "string", "description": "Zola's text reply to the user."},
            "liveStatus": {
                "type": "array",
                "description": "Live status of active campaigns, only after getLiveCampaigns.",
                "items": {
                    "type": "object",
                    "properties": {
                        "campaignTitle": {"type": "string"},
                        "promoters": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "name": {"type": "string"},
                                    "status": {"type": "string", "enum": ["Checked-In", "Awaiting Check-In", "Delayed"]},
                                    "location": {"type": "string"},
                                    "checkedInTime": {"type": "string"}
                                },
                                "required": ["name", "status", "location"]
                            }
                        },
                        "suggestedActions": string_list
                    },
                    "required": ["campaignTitle", "promoters", "suggestedActions"]
                }
            },
            "performanceSummary": {
                "type": "object",
                "description": "Performance summary, only after getPerformanceSummary.",
                "properties": {
                    "campaignName": {"type": "string"},
                    "summary": {
                        "type": "object",
                        "properties": {
                            "attendanceRate": {"type": "string"},
                            "totalSales": {"type": "string"},
                            "customerEngagements": {"type": "string"},
                            "feedbackHighlights": {"type": "string"}
                        },
                        "required": ["attendanceRate", "totalSales", "customerEngagements", "feedbackHighlights"]
                    },
                    "actionButtons": string_list
                },
                "required": ["campaignName", "summary", "actionButtons"]
            },
            "buttons": {"type": "array", "description": "Suggested follow-up buttons.", "items": {"type": "string"}}
        }
    })
}
