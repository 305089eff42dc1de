use std::collections::HashMap;

use tokio::sync::RwLock;

use snapactivate_core::domain::brand::{BrandId, BrandProfile};
use snapactivate_core::domain::campaign::{CampaignFilter, CampaignId, CampaignRecord, NewCampaign};
use snapactivate_core::domain::package::{CampaignPackage, NewPackage, PackageId};
use snapactivate_core::domain::performance::{PromoterReport, SalesEntry};
use snapactivate_core::domain::promoter::PromoterAssignment;
use snapactivate_core::domain::support::{NewSupportTicket, SupportTicket, TicketId};

use super::{
    new_record_id, BrandRepository, CampaignReportingRepository, CampaignRepository,
    PackageRepository, PromoterAssignmentRepository, RepositoryError, SupportTicketRepository,
};

#[derive(Default)]
pub struct InMemoryBrandRepository {
    brands: RwLock<HashMap<String, BrandProfile>>,
}

#[async_trait::async_trait]
impl BrandRepository for InMemoryBrandRepository {
    async fn find_by_id(&self, id: &BrandId) -> Result<Option<BrandProfile>, RepositoryError> {
        let brands = self.brands.read().await;
        Ok(brands.get(&id.0).cloned())
    }

    async fn save(&self, brand: BrandProfile) -> Result<(), RepositoryError> {
        let mut brands = self.brands.write().await;
        brands.insert(brand.id.0.clone(), brand);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCampaignRepository {
    campaigns: RwLock<Vec<CampaignRecord>>,
}

impl InMemoryCampaignRepository {
    pub async fn len(&self) -> usize {
        self.campaigns.read().await.len()
    }
}

#[async_trait::async_trait]
impl CampaignRepository for InMemoryCampaignRepository {
    async fn create(&self, campaign: NewCampaign) -> Result<CampaignId, RepositoryError> {
        let id = CampaignId(new_record_id());
        let mut campaigns = self.campaigns.write().await;
        campaigns.push(CampaignRecord::from_new(id.clone(), campaign));
        Ok(id)
    }

    async fn find_by_id(&self, id: &CampaignId) -> Result<Option<CampaignRecord>, RepositoryError> {
        let campaigns = self.campaigns.read().await;
        Ok(campaigns.iter().find(|campaign| &campaign.id == id).cloned())
    }

    async fn find_by_title(
        &self,
        title: &str,
        preferred_brand: Option<&BrandId>,
    ) -> Result<Option<CampaignRecord>, RepositoryError> {
        let wanted = title.trim().to_lowercase();
        let campaigns = self.campaigns.read().await;
        Ok(campaigns
            .iter()
            .filter(|campaign| campaign.title.to_lowercase() == wanted)
            .max_by_key(|campaign| (Some(&campaign.brand_id) == preferred_brand, campaign.created_at))
            .cloned())
    }

    async fn list(&self, filter: &CampaignFilter) -> Result<Vec<CampaignRecord>, RepositoryError> {
        let campaigns = self.campaigns.read().await;
        let mut matching =
            campaigns.iter().filter(|campaign| filter.matches(campaign)).cloned().collect::<Vec<_>>();
        matching.sort_by(|left, right| {
            left.date.cmp(&right.date).then(left.created_at.cmp(&right.created_at))
        });
        Ok(matching)
    }
}

#[derive(Default)]
pub struct InMemorySupportTicketRepository {
    tickets: RwLock<HashMap<String, SupportTicket>>,
}

impl InMemorySupportTicketRepository {
    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }
}

#[async_trait::async_trait]
impl SupportTicketRepository for InMemorySupportTicketRepository {
    async fn create(&self, ticket: NewSupportTicket) -> Result<TicketId, RepositoryError> {
        let id = TicketId(new_record_id());
        let record = SupportTicket {
            id: id.clone(),
            campaign_name: ticket.campaign_name,
            issue_description: ticket.issue_description,
            priority: ticket.priority,
            brand_id: ticket.brand_id,
            status: ticket.status,
            created_at: ticket.created_at,
        };
        let mut tickets = self.tickets.write().await;
        tickets.insert(id.0.clone(), record);
        Ok(id)
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<SupportTicket>, RepositoryError> {
        let tickets = self.tickets.read().await;
        Ok(tickets.get(&id.0).cloned())
    }

    async fn list_for_brand(
        &self,
        brand_id: &BrandId,
    ) -> Result<Vec<SupportTicket>, RepositoryError> {
        let tickets = self.tickets.read().await;
        let mut owned = tickets
            .values()
            .filter(|ticket| &ticket.brand_id == brand_id)
            .cloned()
            .collect::<Vec<_>>();
        owned.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(owned)
    }
}

#[derive(Default)]
pub struct InMemoryPackageRepository {
    packages: RwLock<Vec<CampaignPackage>>,
}

#[async_trait::async_trait]
impl PackageRepository for InMemoryPackageRepository {
    async fn list(&self) -> Result<Vec<CampaignPackage>, RepositoryError> {
        Ok(self.packages.read().await.clone())
    }

    async fn find_by_id(&self, id: &PackageId) -> Result<Option<CampaignPackage>, RepositoryError> {
        let packages = self.packages.read().await;
        Ok(packages.iter().find(|package| &package.id == id).cloned())
    }

    async fn create(&self, package: NewPackage) -> Result<CampaignPackage, RepositoryError> {
        let created = CampaignPackage {
            id: PackageId(new_record_id()),
            name: package.name.trim().to_string(),
            price: package.price,
            promoters: package.promoters,
            locations: package.locations,
        };
        self.packages.write().await.push(created.clone());
        Ok(created)
    }

    async fn save(&self, package: CampaignPackage) -> Result<(), RepositoryError> {
        let mut packages = self.packages.write().await;
        match packages.iter_mut().find(|existing| existing.id == package.id) {
            Some(existing) => *existing = package,
            None => packages.push(package),
        }
        Ok(())
    }

    async fn delete(&self, id: &PackageId) -> Result<bool, RepositoryError> {
        let mut packages = self.packages.write().await;
        let before = packages.len();
        packages.retain(|package| &package.id != id);
        Ok(packages.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryPromoterAssignmentRepository {
    assignments: RwLock<HashMap<String, PromoterAssignment>>,
}

#[async_trait::async_trait]
impl PromoterAssignmentRepository for InMemoryPromoterAssignmentRepository {
    async fn list_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<PromoterAssignment>, RepositoryError> {
        let assignments = self.assignments.read().await;
        let mut matching = assignments
            .values()
            .filter(|assignment| &assignment.campaign_id == campaign_id)
            .cloned()
            .collect::<Vec<_>>();
        matching.sort_by(|left, right| left.promoter_name.cmp(&right.promoter_name));
        Ok(matching)
    }

    async fn save(&self, assignment: PromoterAssignment) -> Result<(), RepositoryError> {
        let mut assignments = self.assignments.write().await;
        assignments.insert(assignment.id.clone(), assignment);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCampaignReportingRepository {
    sales: RwLock<HashMap<String, SalesEntry>>,
    reports: RwLock<HashMap<String, PromoterReport>>,
}

#[async_trait::async_trait]
impl CampaignReportingRepository for InMemoryCampaignReportingRepository {
    async fn list_sales(&self, campaign_id: &CampaignId) -> Result<Vec<SalesEntry>, RepositoryError> {
        let sales = self.sales.read().await;
        let mut matching = sales
            .values()
            .filter(|entry| &entry.campaign_id == campaign_id)
            .cloned()
            .collect::<Vec<_>>();
        matching.sort_by(|left, right| left.recorded_at.cmp(&right.recorded_at));
        Ok(matching)
    }

    async fn list_promoter_reports(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<PromoterReport>, RepositoryError> {
        let reports = self.reports.read().await;
        let mut matching = reports
            .values()
            .filter(|report| &report.campaign_id == campaign_id)
            .cloned()
            .collect::<Vec<_>>();
        matching.sort_by(|left, right| right.submitted_at.cmp(&left.submitted_at));
        Ok(matching)
    }

    async fn save_sales_entry(&self, entry: SalesEntry) -> Result<(), RepositoryError> {
        self.sales.write().await.insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn save_promoter_report(&self, report: PromoterReport) -> Result<(), RepositoryError> {
        self.reports.write().await.insert(report.id.clone(), report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Utc};

    use snapactivate_core::domain::brand::BrandId;
    use snapactivate_core::domain::campaign::{CampaignFilter, CampaignStatus, NewCampaign};

    use crate::repositories::{CampaignRepository, InMemoryCampaignRepository};

    fn campaign(title: &str, status: CampaignStatus, age_minutes: i64) -> NewCampaign {
        NewCampaign {
            title: title.to_string(),
            brand_id: BrandId("brand-1".to_string()),
            brand_name: "Fizz Co".to_string(),
            status,
            location_zone: "Downtown".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 20).expect("valid date"),
            package_tier: "Silver".to_string(),
            promoter_count: 2,
            description: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn in_memory_campaign_repo_matches_sql_semantics() {
        let repo = InMemoryCampaignRepository::default();
        repo.create(campaign("Summer Fest", CampaignStatus::Completed, 30)).await.expect("create");
        let newest =
            repo.create(campaign("Summer Fest", CampaignStatus::Active, 0)).await.expect("create");

        let found = repo.find_by_title("SUMMER fest", None).await.expect("find").expect("match");
        assert_eq!(found.id, newest);

        let mut older = campaign("Summer Fest", CampaignStatus::Completed, 90);
        older.brand_id = BrandId("brand-2".to_string());
        let own = repo.create(older).await.expect("create");
        let brand_2 = BrandId("brand-2".to_string());
        let preferred =
            repo.find_by_title("summer fest", Some(&brand_2)).await.expect("find").expect("match");
        assert_eq!(preferred.id, own);

        let active =
            repo.list(&CampaignFilter::with_status(CampaignStatus::Active)).await.expect("list");
        assert_eq!(active.len(), 1);
        assert_eq!(repo.len().await, 3);
    }
}
