use std::sync::Arc;

use snapactivate_core::domain::brand::BrandId;
use snapactivate_core::domain::campaign::CampaignRecord;
use snapactivate_core::domain::performance::{PerformanceSummary, ReportInputs};

use super::OperationError;
use crate::repositories::{
    CampaignReportingRepository, CampaignRepository, PromoterAssignmentRepository,
};

#[derive(Clone)]
pub struct PerformanceOperations {
    campaigns: Arc<dyn CampaignRepository>,
    assignments: Arc<dyn PromoterAssignmentRepository>,
    reporting: Arc<dyn CampaignReportingRepository>,
}

impl PerformanceOperations {
    pub fn new(
        campaigns: Arc<dyn CampaignRepository>,
        assignments: Arc<dyn PromoterAssignmentRepository>,
        reporting: Arc<dyn CampaignReportingRepository>,
    ) -> Self {
        Self { campaigns, assignments, reporting }
    }

    /// Resolves a campaign by title, preferring the caller's own campaigns.
    pub async fn resolve_campaign(
        &self,
        campaign_name: &str,
        caller: Option<&BrandId>,
    ) -> Result<CampaignRecord, OperationError> {
        self.campaigns
            .find_by_title(campaign_name, caller)
            .await?
            .ok_or_else(|| OperationError::CampaignNotFound(campaign_name.trim().to_string()))
    }

    pub async fn summarize_performance(
        &self,
        campaign_name: &str,
        caller: Option<&BrandId>,
    ) -> Result<PerformanceSummary, OperationError> {
        let campaign = self.resolve_campaign(campaign_name, caller).await?;
        let assignments = self.assignments.list_for_campaign(&campaign.id).await?;
        let sales = self.reporting.list_sales(&campaign.id).await?;
        let reports = self.reporting.list_promoter_reports(&campaign.id).await?;

        Ok(PerformanceSummary::aggregate(&campaign.title, &assignments, &sales, &reports))
    }

    pub async fn report_inputs(
        &self,
        campaign_name: &str,
        caller: Option<&BrandId>,
    ) -> Result<ReportInputs, OperationError> {
        let campaign = self.resolve_campaign(campaign_name, caller).await?;
        let sales = self.reporting.list_sales(&campaign.id).await?;
        let reports = self.reporting.list_promoter_reports(&campaign.id).await?;

        Ok(ReportInputs::collect(&campaign.title, &sales, &reports))
    }
}
