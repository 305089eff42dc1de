use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::campaign::{CampaignId, CampaignRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckInStatus {
    #[serde(rename = "Checked-In")]
    CheckedIn,
    #[serde(rename = "Awaiting Check-In")]
    AwaitingCheckIn,
    Delayed,
}

impl CheckInStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckedIn => "Checked-In",
            Self::AwaitingCheckIn => "Awaiting Check-In",
            Self::Delayed => "Delayed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Checked-In" => Some(Self::CheckedIn),
            "Awaiting Check-In" => Some(Self::AwaitingCheckIn),
            "Delayed" => Some(Self::Delayed),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoterAssignment {
    pub id: String,
    pub campaign_id: CampaignId,
    pub promoter_name: String,
    pub status: CheckInStatus,
    pub location: String,
    pub checked_in_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoterCheckIn {
    pub name: String,
    pub status: CheckInStatus,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_in_time: Option<String>,
}

impl From<&PromoterAssignment> for PromoterCheckIn {
    fn from(assignment: &PromoterAssignment) -> Self {
        Self {
            name: assignment.promoter_name.clone(),
            status: assignment.status,
            location: assignment.location.clone(),
            checked_in_time: assignment
                .checked_in_at
                .map(|checked_in_at| checked_in_at.format("%I:%M %p").to_string()),
        }
    }
}

pub const LIVE_STATUS_ACTIONS: [&str; 3] = ["View Report", "Promoter Chat", "Campaign Status"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignLiveStatus {
    pub campaign_title: String,
    pub promoters: Vec<PromoterCheckIn>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

impl CampaignLiveStatus {
    pub fn from_assignments(campaign: &CampaignRecord, assignments: &[PromoterAssignment]) -> Self {
        Self {
            campaign_title: campaign.title.clone(),
            promoters: assignments.iter().map(PromoterCheckIn::from).collect(),
            suggested_actions: LIVE_STATUS_ACTIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{CheckInStatus, PromoterAssignment, PromoterCheckIn};
    use crate::domain::campaign::CampaignId;

    #[test]
    fn check_in_time_is_rendered_as_clock_time() {
        let assignment = PromoterAssignment {
            id: "pa-1".to_string(),
            campaign_id: CampaignId("c1".to_string()),
            promoter_name: "Alice Johnson".to_string(),
            status: CheckInStatus::CheckedIn,
            location: "Downtown Plaza".to_string(),
            checked_in_at: Some(Utc.with_ymd_and_hms(2026, 10, 17, 9, 2, 0).unwrap()),
        };

        let check_in = PromoterCheckIn::from(&assignment);
        assert_eq!(check_in.checked_in_time.as_deref(), Some("09:02 AM"));
        assert_eq!(check_in.status, CheckInStatus::CheckedIn);
    }

    #[test]
    fn awaiting_promoters_have_no_check_in_time() {
        let value = serde_json::to_value(PromoterCheckIn {
            name: "Charlie Brown".to_string(),
            status: CheckInStatus::AwaitingCheckIn,
            location: "Downtown Plaza".to_string(),
            checked_in_time: None,
        })
        .expect("serialize");

        assert_eq!(value["status"], "Awaiting Check-In");
        assert!(value.get("checkedInTime").is_none());
    }
}
