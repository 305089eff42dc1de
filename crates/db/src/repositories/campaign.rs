use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};

use snapactivate_core::domain::brand::BrandId;
use snapactivate_core::domain::campaign::{
    CampaignFilter, CampaignId, CampaignRecord, CampaignStatus, NewCampaign,
};

use super::decode::{parse_date, parse_timestamp, parse_u32, timestamp_text, unknown_value};
use super::{new_record_id, CampaignRepository, RepositoryError};
use crate::DbPool;

const CAMPAIGN_COLUMNS: &str = "SELECT
        id,
        title,
        brand_id,
        brand_name,
        status,
        location_zone,
        campaign_date,
        package_tier,
        promoter_count,
        description,
        created_at
     FROM campaigns";

pub struct SqlCampaignRepository {
    pool: DbPool,
}

impl SqlCampaignRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CampaignRepository for SqlCampaignRepository {
    async fn create(&self, campaign: NewCampaign) -> Result<CampaignId, RepositoryError> {
        let id = new_record_id();

        sqlx::query(
            "INSERT INTO campaigns (
                id,
                title,
                brand_id,
                brand_name,
                status,
                location_zone,
                campaign_date,
                package_tier,
                promoter_count,
                description,
                created_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&campaign.title)
        .bind(&campaign.brand_id.0)
        .bind(&campaign.brand_name)
        .bind(campaign.status.as_str())
        .bind(&campaign.location_zone)
        .bind(campaign.date.format("%Y-%m-%d").to_string())
        .bind(&campaign.package_tier)
        .bind(i64::from(campaign.promoter_count))
        .bind(&campaign.description)
        .bind(timestamp_text(&campaign.created_at))
        .execute(&self.pool)
        .await?;

        Ok(CampaignId(id))
    }

    async fn find_by_id(&self, id: &CampaignId) -> Result<Option<CampaignRecord>, RepositoryError> {
        let row = sqlx::query(&format!("{CAMPAIGN_COLUMNS} WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(campaign_from_row).transpose()
    }

    async fn find_by_title(
        &self,
        title: &str,
        preferred_brand: Option<&BrandId>,
    ) -> Result<Option<CampaignRecord>, RepositoryError> {
        let row = sqlx::query(&format!(
            "{CAMPAIGN_COLUMNS} WHERE title = ? COLLATE NOCASE
             ORDER BY COALESCE(brand_id = ?, 0) DESC, created_at DESC
             LIMIT 1"
        ))
        .bind(title.trim())
        .bind(preferred_brand.map(|brand| brand.0.clone()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(campaign_from_row).transpose()
    }

    async fn list(&self, filter: &CampaignFilter) -> Result<Vec<CampaignRecord>, RepositoryError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("{CAMPAIGN_COLUMNS} WHERE 1 = 1"));

        if !filter.statuses.is_empty() {
            builder.push(" AND status IN (");
            let mut statuses = builder.separated(", ");
            for status in &filter.statuses {
                statuses.push_bind(status.as_str());
            }
            statuses.push_unseparated(")");
        }

        if let Some(brand_id) = &filter.brand_id {
            builder.push(" AND brand_id = ").push_bind(brand_id.0.clone());
        }

        builder.push(" ORDER BY campaign_date ASC, created_at ASC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.into_iter().map(campaign_from_row).collect()
    }
}

fn campaign_from_row(row: SqliteRow) -> Result<CampaignRecord, RepositoryError> {
    let status: String = row.try_get("status")?;

    Ok(CampaignRecord {
        id: CampaignId(row.try_get("id")?),
        title: row.try_get("title")?,
        brand_id: BrandId(row.try_get("brand_id")?),
        brand_name: row.try_get("brand_name")?,
        status: CampaignStatus::parse(&status).ok_or_else(|| unknown_value("status", &status))?,
        location_zone: row.try_get("location_zone")?,
        date: parse_date("campaign_date", row.try_get("campaign_date")?)?,
        package_tier: row.try_get("package_tier")?,
        promoter_count: parse_u32("promoter_count", row.try_get("promoter_count")?)?,
        description: row.try_get("description")?,
        created_at: parse_timestamp("created_at", row.try_get("created_at")?)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Utc};

    use snapactivate_core::domain::brand::{BrandId, BrandProfile, PaymentPlan, UserRole};
    use snapactivate_core::domain::campaign::{CampaignFilter, CampaignStatus, NewCampaign};

    use super::SqlCampaignRepository;
    use crate::repositories::{BrandRepository, CampaignRepository, SqlBrandRepository};
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        for id in ["brand-a", "brand-b"] {
            SqlBrandRepository::new(pool.clone())
                .save(BrandProfile {
                    id: BrandId(id.to_string()),
                    name: id.to_string(),
                    company_name: None,
                    payment_plan: PaymentPlan::Standard,
                    role: UserRole::Brand,
                    created_at: Utc::now(),
                })
                .await
                .expect("save brand");
        }
        pool
    }

    fn new_campaign(title: &str, brand: &str, status: CampaignStatus, age_minutes: i64) -> NewCampaign {
        NewCampaign {
            title: title.to_string(),
            brand_id: BrandId(brand.to_string()),
            brand_name: brand.to_string(),
            status,
            location_zone: "Sandton City".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 12, 1).expect("valid date"),
            package_tier: "Gold".to_string(),
            promoter_count: 3,
            description: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn sql_campaign_repo_round_trip() {
        let repo = SqlCampaignRepository::new(setup_pool().await);
        let campaign = new_campaign("Summer Fest", "brand-a", CampaignStatus::PendingPayment, 0);

        let id = repo.create(campaign.clone()).await.expect("create campaign");
        assert!(!id.0.is_empty());

        let found = repo.find_by_id(&id).await.expect("find").expect("campaign exists");
        assert_eq!(found.title, "Summer Fest");
        assert_eq!(found.status, CampaignStatus::PendingPayment);
        assert_eq!(found.date, campaign.date);
        assert_eq!(found.promoter_count, 3);
    }

    #[tokio::test]
    async fn find_by_title_is_case_insensitive_and_prefers_newest() {
        let repo = SqlCampaignRepository::new(setup_pool().await);
        repo.create(new_campaign("Summer Fest", "brand-a", CampaignStatus::Completed, 60))
            .await
            .expect("create older");
        let newest = repo
            .create(new_campaign("Summer Fest", "brand-b", CampaignStatus::Active, 0))
            .await
            .expect("create newer");

        let found = repo.find_by_title("  summer FEST ", None).await.expect("find").expect("match");
        assert_eq!(found.id, newest);
        assert!(repo.find_by_title("Winter Fest", None).await.expect("find").is_none());
    }

    #[tokio::test]
    async fn find_by_title_ranks_the_callers_campaign_first() {
        let repo = SqlCampaignRepository::new(setup_pool().await);
        let own = repo
            .create(new_campaign("Summer Fest", "brand-a", CampaignStatus::Completed, 60))
            .await
            .expect("create own");
        let other = repo
            .create(new_campaign("Summer Fest", "brand-b", CampaignStatus::Active, 0))
            .await
            .expect("create other");

        let brand_a = BrandId("brand-a".to_string());
        let found =
            repo.find_by_title("summer fest", Some(&brand_a)).await.expect("find").expect("match");
        assert_eq!(found.id, own);

        let brand_c = BrandId("brand-c".to_string());
        let fallback =
            repo.find_by_title("summer fest", Some(&brand_c)).await.expect("find").expect("match");
        assert_eq!(fallback.id, other);
    }

    #[tokio::test]
    async fn list_filters_by_status_and_brand() {
        let repo = SqlCampaignRepository::new(setup_pool().await);
        repo.create(new_campaign("A", "brand-a", CampaignStatus::Active, 3)).await.expect("a");
        repo.create(new_campaign("B", "brand-a", CampaignStatus::PendingPo, 2)).await.expect("b");
        repo.create(new_campaign("C", "brand-b", CampaignStatus::Active, 1)).await.expect("c");

        let active = repo.list(&CampaignFilter::with_status(CampaignStatus::Active)).await.expect("list");
        assert_eq!(active.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(), vec!["A", "C"]);

        let brand_a = repo.list(&CampaignFilter::for_brand(BrandId("brand-a".to_string()))).await.expect("list");
        assert_eq!(brand_a.len(), 2);

        let several = repo
            .list(&CampaignFilter {
                statuses: vec![CampaignStatus::Active, CampaignStatus::PendingPo],
                brand_id: Some(BrandId("brand-a".to_string())),
            })
            .await
            .expect("list");
        assert_eq!(several.len(), 2);

        assert_eq!(repo.list(&CampaignFilter::default()).await.expect("list").len(), 3);
    }
}
