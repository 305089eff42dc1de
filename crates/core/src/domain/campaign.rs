use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::brand::{BrandId, PaymentPlan};
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    #[serde(rename = "Pending Payment")]
    PendingPayment,
    #[serde(rename = "Pending PO")]
    PendingPo,
    #[serde(rename = "Pending Review")]
    PendingReview,
    Active,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    /// Initial status of a freshly booked campaign for the given plan.
    pub fn for_plan(plan: &PaymentPlan) -> Self {
        match plan {
            PaymentPlan::Standard => Self::PendingPayment,
            PaymentPlan::Elite => Self::PendingPo,
            PaymentPlan::Unspecified => Self::PendingReview,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "Pending Payment",
            Self::PendingPo => "Pending PO",
            Self::PendingReview => "Pending Review",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending payment" => Some(Self::PendingPayment),
            "pending po" => Some(Self::PendingPo),
            "pending review" => Some(Self::PendingReview),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Argument names of the setup tool in the order the assistant asks for them.
pub const REQUIRED_SETUP_FIELDS: [&str; 5] =
    ["title", "locationZone", "date", "packageTier", "promoters"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSetupRequest {
    pub title: String,
    pub location_zone: String,
    pub date: NaiveDate,
    pub package_tier: String,
    #[serde(alias = "promoters")]
    pub promoter_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CampaignSetupRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("title", &self.title),
            ("locationZone", &self.location_zone),
            ("packageTier", &self.package_tier),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::MissingSetupField(field.to_string()));
            }
        }
        if self.promoter_count == 0 {
            return Err(DomainError::InvalidSetupField {
                field: "promoters".to_string(),
                reason: "at least one promoter is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Partially collected setup arguments, as supplied by the model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CampaignSetupDraft {
    pub title: Option<String>,
    pub location_zone: Option<String>,
    pub date: Option<String>,
    pub package_tier: Option<String>,
    pub promoters: Option<String>,
    pub description: Option<String>,
}

impl CampaignSetupDraft {
    pub fn from_arguments(arguments: &Value) -> Self {
        Self {
            title: text_argument(arguments, &["title"]),
            location_zone: text_argument(arguments, &["locationZone", "location_zone"]),
            date: text_argument(arguments, &["date"]),
            package_tier: text_argument(arguments, &["packageTier", "package_tier"]),
            promoters: text_argument(arguments, &["promoters", "promoterCount"]),
            description: text_argument(arguments, &["description"]),
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.title.is_some(),
            self.location_zone.is_some(),
            self.date.is_some(),
            self.package_tier.is_some(),
            self.promoters.is_some(),
        ];
        REQUIRED_SETUP_FIELDS
            .iter()
            .zip(present)
            .filter_map(|(field, present)| (!present).then_some(*field))
            .collect()
    }

    pub fn next_missing_field(&self) -> Option<&'static str> {
        self.missing_fields().into_iter().next()
    }

    pub fn into_request(self) -> Result<CampaignSetupRequest, DomainError> {
        if let Some(field) = self.next_missing_field() {
            return Err(DomainError::MissingSetupField(field.to_string()));
        }

        let date_raw = self.date.unwrap_or_default();
        let date = parse_campaign_date(&date_raw).ok_or_else(|| DomainError::InvalidSetupField {
            field: "date".to_string(),
            reason: format!("`{date_raw}` is not a YYYY-MM-DD date"),
        })?;

        let promoters_raw = self.promoters.unwrap_or_default();
        let promoter_count = parse_promoter_count(&promoters_raw).ok_or_else(|| {
            DomainError::InvalidSetupField {
                field: "promoters".to_string(),
                reason: format!("`{promoters_raw}` is not a whole number of promoters"),
            }
        })?;

        let request = CampaignSetupRequest {
            title: self.title.unwrap_or_default(),
            location_zone: self.location_zone.unwrap_or_default(),
            date,
            package_tier: self.package_tier.unwrap_or_default(),
            promoter_count,
            description: self.description,
        };
        request.validate()?;
        Ok(request)
    }
}

fn text_argument(arguments: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match arguments.get(*key)? {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (truncated to its date).
pub fn parse_campaign_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(trimmed).ok().map(|timestamp| timestamp.date_naive())
    })
}

fn parse_promoter_count(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    trimmed.parse::<u32>().ok().or_else(|| {
        let float = trimmed.parse::<f64>().ok()?;
        (float.fract() == 0.0 && float >= 0.0 && float <= f64::from(u32::MAX))
            .then_some(float as u32)
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub title: String,
    pub brand_id: BrandId,
    pub brand_name: String,
    pub status: CampaignStatus,
    pub location_zone: String,
    pub date: NaiveDate,
    pub package_tier: String,
    pub promoter_count: u32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRecord {
    pub id: CampaignId,
    pub title: String,
    pub brand_id: BrandId,
    pub brand_name: String,
    pub status: CampaignStatus,
    pub location_zone: String,
    pub date: NaiveDate,
    pub package_tier: String,
    pub promoter_count: u32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CampaignRecord {
    pub fn from_new(id: CampaignId, campaign: NewCampaign) -> Self {
        Self {
            id,
            title: campaign.title,
            brand_id: campaign.brand_id,
            brand_name: campaign.brand_name,
            status: campaign.status,
            location_zone: campaign.location_zone,
            date: campaign.date,
            package_tier: campaign.package_tier,
            promoter_count: campaign.promoter_count,
            description: campaign.description,
            created_at: campaign.created_at,
        }
    }
}

/// Result of a successful booking, shaped like the setup tool output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedCampaign {
    pub id: CampaignId,
    pub status: CampaignStatus,
    pub title: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CampaignFilter {
    pub statuses: Vec<CampaignStatus>,
    pub brand_id: Option<BrandId>,
}

impl CampaignFilter {
    pub fn with_status(status: CampaignStatus) -> Self {
        Self { statuses: vec![status], brand_id: None }
    }

    pub fn for_brand(brand_id: BrandId) -> Self {
        Self { statuses: Vec::new(), brand_id: Some(brand_id) }
    }

    pub fn matches(&self, campaign: &CampaignRecord) -> bool {
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&campaign.status);
        let brand_ok = self.brand_id.as_ref().map(|id| id == &campaign.brand_id).unwrap_or(true);
        status_ok && brand_ok
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{CampaignSetupDraft, CampaignStatus};
    use crate::domain::brand::PaymentPlan;
    use crate::errors::DomainError;

    #[test]
    fn status_is_derived_from_payment_plan() {
        assert_eq!(CampaignStatus::for_plan(&PaymentPlan::Standard), CampaignStatus::PendingPayment);
        assert_eq!(CampaignStatus::for_plan(&PaymentPlan::Elite), CampaignStatus::PendingPo);
        assert_eq!(
            CampaignStatus::for_plan(&PaymentPlan::Unspecified),
            CampaignStatus::PendingReview
        );
    }

    #[test]
    fn status_round_trips_through_display_strings() {
        for status in [
            CampaignStatus::PendingPayment,
            CampaignStatus::PendingPo,
            CampaignStatus::PendingReview,
            CampaignStatus::Active,
            CampaignStatus::Completed,
            CampaignStatus::Cancelled,
        ] {
            assert_eq!(CampaignStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(
            serde_json::to_value(CampaignStatus::PendingPo).expect("serialize"),
            json!("Pending PO")
        );
    }

    #[test]
    fn draft_reports_missing_fields_in_canonical_order() {
        let draft = CampaignSetupDraft::from_arguments(&json!({ "title": "Summer Fest" }));
        assert_eq!(draft.missing_fields(), vec!["locationZone", "date", "packageTier", "promoters"]);
        assert_eq!(draft.next_missing_field(), Some("locationZone"));
    }

    #[test]
    fn blank_arguments_count_as_missing() {
        let draft = CampaignSetupDraft::from_arguments(&json!({
            "title": "Summer Fest",
            "locationZone": "   ",
        }));
        assert_eq!(draft.next_missing_field(), Some("locationZone"));
    }

    #[test]
    fn complete_draft_converts_to_request() {
        let request = CampaignSetupDraft::from_arguments(&json!({
            "title": "Summer Fest",
            "locationZone": "Downtown",
            "date": "2026-12-01",
            "packageTier": "Gold",
            "promoters": 4,
            "description": "Soda sampling",
        }))
        .into_request()
        .expect("complete draft should convert");

        assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 12, 1).expect("valid date"));
        assert_eq!(request.promoter_count, 4);
        assert_eq!(request.description.as_deref(), Some("Soda sampling"));
    }

    #[test]
    fn rfc3339_dates_and_numeric_strings_are_accepted() {
        let request = CampaignSetupDraft::from_arguments(&json!({
            "title": "Summer Fest",
            "locationZone": "Downtown",
            "date": "2026-12-01T08:00:00Z",
            "packageTier": "Gold",
            "promoterCount": "3",
        }))
        .into_request()
        .expect("draft should convert");

        assert_eq!(request.promoter_count, 3);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 12, 1).expect("valid date"));
    }

    #[test]
    fn invalid_date_and_zero_promoters_are_rejected() {
        let bad_date = CampaignSetupDraft::from_arguments(&json!({
            "title": "Summer Fest",
            "locationZone": "Downtown",
            "date": "next friday",
            "packageTier": "Gold",
            "promoters": 2,
        }))
        .into_request();
        assert!(matches!(
            bad_date,
            Err(DomainError::InvalidSetupField { ref field, .. }) if field == "date"
        ));

        let zero_promoters = CampaignSetupDraft::from_arguments(&json!({
            "title": "Summer Fest",
            "locationZone": "Downtown",
            "date": "2026-12-01",
            "packageTier": "Gold",
            "promoters": 0,
        }))
        .into_request();
        assert!(matches!(
            zero_promoters,
            Err(DomainError::InvalidSetupField { ref field, .. }) if field == "promoters"
        ));
    }
}
