use std::sync::Arc;

use chrono::Utc;

use snapactivate_core::domain::brand::BrandId;
use snapactivate_core::domain::campaign::{
    BookedCampaign, CampaignFilter, CampaignRecord, CampaignSetupRequest, CampaignStatus,
    NewCampaign,
};
use snapactivate_core::domain::promoter::CampaignLiveStatus;

use super::OperationError;
use crate::repositories::{BrandRepository, CampaignRepository, PromoterAssignmentRepository};

#[derive(Clone)]
pub struct CampaignOperations {
    brands: Arc<dyn BrandRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    assignments: Arc<dyn PromoterAssignmentRepository>,
}

impl CampaignOperations {
    pub fn new(
        brands: Arc<dyn BrandRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        assignments: Arc<dyn PromoterAssignmentRepository>,
    ) -> Self {
        Self { brands, campaigns, assignments }
    }

    /// Books a campaign for `brand_id`; the initial status follows the brand's payment plan.
    pub async fn book_campaign(
        &self,
        request: CampaignSetupRequest,
        brand_id: &BrandId,
    ) -> Result<BookedCampaign, OperationError> {
        request.validate()?;

        let brand = self
            .brands
            .find_by_id(brand_id)
            .await?
            .ok_or_else(|| OperationError::BrandNotFound(brand_id.0.clone()))?;

        let status = CampaignStatus::for_plan(&brand.payment_plan);
        let title = request.title.trim().to_string();
        let campaign = NewCampaign {
            title: title.clone(),
            brand_id: brand.id.clone(),
            brand_name: brand.display_name().to_string(),
            status,
            location_zone: request.location_zone.trim().to_string(),
            date: request.date,
            package_tier: request.package_tier.trim().to_string(),
            promoter_count: request.promoter_count,
            description: request
                .description
                .map(|description| description.trim().to_string())
                .filter(|description| !description.is_empty()),
            created_at: Utc::now(),
        };

        let id = self.campaigns.create(campaign).await?;
        if id.0.trim().is_empty() {
            return Err(OperationError::MissingIdentifier("campaign"));
        }

        Ok(BookedCampaign { id, status, title })
    }

    pub async fn list_campaigns(
        &self,
        filter: &CampaignFilter,
    ) -> Result<Vec<CampaignRecord>, OperationError> {
        Ok(self.campaigns.list(filter).await?)
    }

    pub async fn campaigns_for_brand(
        &self,
        brand_id: &BrandId,
    ) -> Result<Vec<CampaignRecord>, OperationError> {
        self.list_campaigns(&CampaignFilter::for_brand(brand_id.clone())).await
    }

    /// Active campaigns with the check-in state of their assigned promoters.
    pub async fn live_statuses(&self) -> Result<Vec<CampaignLiveStatus>, OperationError> {
        let active = self.campaigns.list(&CampaignFilter::with_status(CampaignStatus::Active)).await?;

        let mut statuses = Vec::with_capacity(active.len());
        for campaign in &active {
            let assignments = self.assignments.list_for_campaign(&campaign.id).await?;
            statuses.push(CampaignLiveStatus::from_assignments(campaign, &assignments));
        }
        Ok(statuses)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use snapactivate_core::domain::brand::{BrandId, BrandProfile, PaymentPlan, UserRole};
    use snapactivate_core::domain::campaign::{CampaignSetupRequest, CampaignStatus, NewCampaign};
    use snapactivate_core::domain::promoter::{CheckInStatus, PromoterAssignment};

    use crate::operations::{BackendOperations, OperationError, Stores};
    use crate::repositories::{BrandRepository, CampaignRepository, PromoterAssignmentRepository};

    fn request(title: &str) -> CampaignSetupRequest {
        CampaignSetupRequest {
            title: title.to_string(),
            location_zone: "Sandton City".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 12, 5).expect("valid date"),
            package_tier: "Gold".to_string(),
            promoter_count: 3,
            description: Some("  ".to_string()),
        }
    }

    async fn stores_with_brand(plan: PaymentPlan) -> Stores {
        let stores = Stores::in_memory();
        stores
            .brands
            .save(BrandProfile {
                id: BrandId("brand-1".to_string()),
                name: "Thandi".to_string(),
                company_name: Some("Fizz Co".to_string()),
                payment_plan: plan,
                role: UserRole::Brand,
                created_at: Utc::now(),
            })
            .await
            .expect("save brand");
        stores
    }

    #[tokio::test]
    async fn booking_derives_status_from_payment_plan() {
        for (plan, expected) in [
            (PaymentPlan::Standard, CampaignStatus::PendingPayment),
            (PaymentPlan::Elite, CampaignStatus::PendingPo),
            (PaymentPlan::Unspecified, CampaignStatus::PendingReview),
        ] {
            let stores = stores_with_brand(plan).await;
            let operations = BackendOperations::new(&stores);

            let booked = operations
                .campaigns
                .book_campaign(request("Summer Fest"), &BrandId("brand-1".to_string()))
                .await
                .expect("book campaign");

            assert_eq!(booked.status, expected);
            assert_eq!(booked.title, "Summer Fest");

            let stored = stores.campaigns.find_by_id(&booked.id).await.expect("find").expect("stored");
            assert_eq!(stored.brand_name, "Fizz Co");
            assert_eq!(stored.description, None);
        }
    }

    #[tokio::test]
    async fn unknown_brand_is_rejected_without_a_write() {
        let stores = Stores::in_memory();
        let operations = BackendOperations::new(&stores);

        let result = operations
            .campaigns
            .book_campaign(request("Summer Fest"), &BrandId("ghost".to_string()))
            .await;

        assert!(matches!(result, Err(OperationError::BrandNotFound(ref id)) if id == "ghost"));
        assert!(stores.campaigns.list(&Default::default()).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn live_statuses_include_only_active_campaigns_with_promoters() {
        let stores = stores_with_brand(PaymentPlan::Standard).await;
        let operations = BackendOperations::new(&stores);
        let brand = BrandId("brand-1".to_string());

        let pending =
            operations.campaigns.book_campaign(request("Pending Fest"), &brand).await.expect("book");
        assert_eq!(pending.status, CampaignStatus::PendingPayment);

        let active_id = stores
            .campaigns
            .create(NewCampaign {
                title: "Live Fest".to_string(),
                brand_id: brand.clone(),
                brand_name: "Fizz Co".to_string(),
                status: CampaignStatus::Active,
                location_zone: "Sandton City".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date"),
                package_tier: "Gold".to_string(),
                promoter_count: 2,
                description: None,
                created_at: Utc::now(),
            })
            .await
            .expect("create active");

        stores
            .assignments
            .save(PromoterAssignment {
                id: "pa-1".to_string(),
                campaign_id: active_id,
                promoter_name: "Alice Johnson".to_string(),
                status: CheckInStatus::CheckedIn,
                location: "Sandton City".to_string(),
                checked_in_at: Some(Utc::now()),
            })
            .await
            .expect("save assignment");

        let live = operations.campaigns.live_statuses().await.expect("live statuses");
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].campaign_title, "Live Fest");
        assert_eq!(live[0].promoters.len(), 1);
        assert_eq!(
            live[0].suggested_actions,
            vec!["View Report", "Promoter Chat", "Campaign Status"]
        );
    }
}
