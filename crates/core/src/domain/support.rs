use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::brand::BrandId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketPriority {
    Urgent,
    High,
    #[serde(rename = "General Query")]
    GeneralQuery,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 3] = [Self::Urgent, Self::High, Self::GeneralQuery];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::GeneralQuery => "General Query",
        }
    }

    /// Exact match against the three accepted labels; nothing is defaulted here.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == raw.trim())
            .ok_or_else(|| DomainError::InvalidPriority(raw.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "New" => Some(Self::New),
            "In Progress" => Some(Self::InProgress),
            "Resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicketRequest {
    pub campaign_name: String,
    pub issue_description: String,
    pub priority: TicketPriority,
}

impl SupportTicketRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.campaign_name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("campaignName is required".to_string()));
        }
        if self.issue_description.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "issueDescription is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupportTicket {
    pub campaign_name: String,
    pub issue_description: String,
    pub priority: TicketPriority,
    pub brand_id: BrandId,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl NewSupportTicket {
    pub fn from_request(request: SupportTicketRequest, brand_id: BrandId) -> Self {
        Self {
            campaign_name: request.campaign_name.trim().to_string(),
            issue_description: request.issue_description.trim().to_string(),
            priority: request.priority,
            brand_id,
            status: TicketStatus::New,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: TicketId,
    pub campaign_name: String,
    pub issue_description: String,
    pub priority: TicketPriority,
    pub brand_id: BrandId,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// User-facing ticket number, e.g. `TICKET-3F9A1C`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketReference(pub String);

impl TicketReference {
    pub const PREFIX: &'static str = "TICKET-";
    const ID_CHARS: usize = 6;

    pub fn from_ticket_id(id: &TicketId) -> Self {
        let short = id.0.chars().take(Self::ID_CHARS).collect::<String>().to_uppercase();
        Self(format!("{}{short}", Self::PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{TicketId, TicketPriority, TicketReference};
    use crate::errors::DomainError;

    #[test]
    fn ticket_reference_uses_uppercase_six_char_prefix() {
        let reference = TicketReference::from_ticket_id(&TicketId("3f9a1c7be2d0".to_string()));
        assert_eq!(reference.as_str(), "TICKET-3F9A1C");
    }

    #[test]
    fn ticket_reference_handles_short_ids() {
        let reference = TicketReference::from_ticket_id(&TicketId("ab1".to_string()));
        assert_eq!(reference.as_str(), "TICKET-AB1");
    }

    #[test]
    fn priority_accepts_only_the_three_labels() {
        assert_eq!(TicketPriority::parse("Urgent"), Ok(TicketPriority::Urgent));
        assert_eq!(TicketPriority::parse("General Query"), Ok(TicketPriority::GeneralQuery));
        assert!(matches!(TicketPriority::parse("Critical"), Err(DomainError::InvalidPriority(_))));
        assert!(matches!(TicketPriority::parse("urgent"), Err(DomainError::InvalidPriority(_))));
    }

    #[test]
    fn priority_serializes_with_display_label() {
        let value = serde_json::to_value(TicketPriority::GeneralQuery).expect("serialize");
        assert_eq!(value, serde_json::json!("General Query"));
    }
}
