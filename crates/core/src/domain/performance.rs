//! Campaign reporting data and the aggregation behind performance summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::campaign::CampaignId;
use crate::domain::promoter::{CheckInStatus, PromoterAssignment};

pub const PERFORMANCE_ACTIONS: [&str; 3] = ["Download Report", "Flag Issue", "Rate Promoter"];

const NO_FEEDBACK_HIGHLIGHT: &str = "No promoter feedback has been submitted yet.";
const MAX_FEEDBACK_HIGHLIGHTS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesEntry {
    pub id: String,
    pub campaign_id: CampaignId,
    pub variant: String,
    pub units: u32,
    pub unit_price: Decimal,
    pub recorded_at: DateTime<Utc>,
}

impl SalesEntry {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.units)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoterReport {
    pub id: String,
    pub campaign_id: CampaignId,
    pub promoter_name: String,
    pub engaged_customers: u32,
    pub potential_customers: u32,
    pub male_customers: u32,
    pub female_customers: u32,
    pub age_group: String,
    pub rating: u8,
    pub sentiment: String,
    pub comments: String,
    pub competitor_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryFigures {
    pub attendance_rate: String,
    pub total_sales: String,
    pub customer_engagements: String,
    pub feedback_highlights: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub campaign_name: String,
    pub summary: SummaryFigures,
    #[serde(default)]
    pub action_buttons: Vec<String>,
}

impl PerformanceSummary {
    pub fn aggregate(
        campaign_name: &str,
        assignments: &[PromoterAssignment],
        sales: &[SalesEntry],
        reports: &[PromoterReport],
    ) -> Self {
        let total_sales = sales.iter().map(SalesEntry::line_total).sum::<Decimal>();
        let engagements = reports.iter().map(|report| u64::from(report.engaged_customers)).sum::<u64>();

        Self {
            campaign_name: campaign_name.to_string(),
            summary: SummaryFigures {
                attendance_rate: attendance_rate(assignments),
                total_sales: format_rand(total_sales),
                customer_engagements: engagements.to_string(),
                feedback_highlights: feedback_highlights(reports),
            },
            action_buttons: PERFORMANCE_ACTIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

fn attendance_rate(assignments: &[PromoterAssignment]) -> String {
    if assignments.is_empty() {
        return "N/A".to_string();
    }
    let total = assignments.len();
    let checked_in = assignments
        .iter()
        .filter(|assignment| assignment.status == CheckInStatus::CheckedIn)
        .count();
    let percent = (checked_in * 100 + total / 2) / total;
    format!("{percent}%")
}

fn feedback_highlights(reports: &[PromoterReport]) -> String {
    let mut ranked = reports.iter().filter(|report| !report.comments.trim().is_empty()).collect::<Vec<_>>();
    ranked.sort_by(|left, right| {
        right.rating.cmp(&left.rating).then_with(|| right.submitted_at.cmp(&left.submitted_at))
    });

    let highlights = ranked
        .into_iter()
        .take(MAX_FEEDBACK_HIGHLIGHTS)
        .map(|report| report.comments.trim().to_string())
        .collect::<Vec<_>>();

    if highlights.is_empty() {
        NO_FEEDBACK_HIGHLIGHT.to_string()
    } else {
        highlights.join(" ")
    }
}

/// Formats an amount in South African Rand, e.g. `R4,850.00`.
pub fn format_rand(amount: Decimal) -> String {
    let rendered = format!("{:.2}", amount.round_dp(2).abs());
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{sign}R{grouped}.{fraction}")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSales {
    pub name: String,
    pub units: u32,
    pub unit_price: Decimal,
}

/// Everything the report generator needs about one campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInputs {
    pub campaign_name: String,
    pub total_revenue: Decimal,
    pub units_sold: u32,
    pub variants: Vec<VariantSales>,
    pub feedback: Vec<PromoterReport>,
    pub competitor_notes: Vec<String>,
}

impl ReportInputs {
    pub fn collect(campaign_name: &str, sales: &[SalesEntry], reports: &[PromoterReport]) -> Self {
        let mut variants: BTreeMap<&str, VariantSales> = BTreeMap::new();
        for entry in sales {
            let variant = variants.entry(entry.variant.as_str()).or_insert_with(|| VariantSales {
                name: entry.variant.clone(),
                units: 0,
                unit_price: entry.unit_price,
            });
            variant.units = variant.units.saturating_add(entry.units);
        }

        let mut variants = variants.into_values().collect::<Vec<_>>();
        variants.sort_by(|left, right| right.units.cmp(&left.units).then(left.name.cmp(&right.name)));

        Self {
            campaign_name: campaign_name.to_string(),
            total_revenue: sales.iter().map(SalesEntry::line_total).sum(),
            units_sold: sales.iter().fold(0u32, |total, entry| total.saturating_add(entry.units)),
            variants,
            feedback: reports.to_vec(),
            competitor_notes: reports
                .iter()
                .filter_map(|report| report.competitor_notes.clone())
                .filter(|notes| !notes.trim().is_empty())
                .collect(),
        }
    }

    pub fn best_selling_variant(&self) -> Option<&VariantSales> {
        self.variants.first()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPerformance {
    pub total_revenue: String,
    pub units_sold: String,
    pub best_selling_variant: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInsights {
    pub sentiment: String,
    pub demographics: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignReport {
    pub executive_summary: String,
    pub sales_performance: SalesPerformance,
    pub customer_insights: CustomerInsights,
    pub promoter_feedback: String,
    pub competitor_activity: String,
    pub recommendations: Vec<String>,
}
