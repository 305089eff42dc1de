use sqlx::{sqlite::SqliteRow, Row};

use snapactivate_core::domain::campaign::CampaignId;
use snapactivate_core::domain::performance::{PromoterReport, SalesEntry};

use super::decode::{parse_decimal, parse_timestamp, parse_u32, timestamp_text};
use super::{CampaignReportingRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCampaignReportingRepository {
    pool: DbPool,
}

impl SqlCampaignReportingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CampaignReportingRepository for SqlCampaignReportingRepository {
    async fn list_sales(&self, campaign_id: &CampaignId) -> Result<Vec<SalesEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, campaign_id, variant, units, unit_price, recorded_at
             FROM sales_entries
             WHERE campaign_id = ?
             ORDER BY recorded_at ASC",
        )
        .bind(&campaign_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(sales_entry_from_row).collect()
    }

    async fn list_promoter_reports(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<PromoterReport>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT
                id,
                campaign_id,
                promoter_name,
                engaged_customers,
                potential_customers,
                male_customers,
                female_customers,
                age_group,
                rating,
                sentiment,
                comments,
                competitor_notes,
                submitted_at
             FROM promoter_reports
             WHERE campaign_id = ?
             ORDER BY submitted_at DESC",
        )
        .bind(&campaign_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(promoter_report_from_row).collect()
    }

    async fn save_sales_entry(&self, entry: SalesEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO sales_entries (id, campaign_id, variant, units, unit_price, recorded_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                variant = excluded.variant,
                units = excluded.units,
                unit_price = excluded.unit_price,
                recorded_at = excluded.recorded_at",
        )
        .bind(&entry.id)
        .bind(&entry.campaign_id.0)
        .bind(&entry.variant)
        .bind(i64::from(entry.units))
        .bind(entry.unit_price.to_string())
        .bind(timestamp_text(&entry.recorded_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_promoter_report(&self, report: PromoterReport) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO promoter_reports (
                id,
                campaign_id,
                promoter_name,
                engaged_customers,
                potential_customers,
                male_customers,
                female_customers,
                age_group,
                rating,
                sentiment,
                comments,
                competitor_notes,
                submitted_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                engaged_customers = excluded.engaged_customers,
                potential_customers = excluded.potential_customers,
                male_customers = excluded.male_customers,
                female_customers = excluded.female_customers,
                age_group = excluded.age_group,
                rating = excluded.rating,
                sentiment = excluded.sentiment,
                comments = excluded.comments,
                competitor_notes = excluded.competitor_notes,
                submitted_at = excluded.submitted_at",
        )
        .bind(&report.id)
        .bind(&report.campaign_id.0)
        .bind(&report.promoter_name)
        .bind(i64::from(report.engaged_customers))
        .bind(i64::from(report.potential_customers))
        .bind(i64::from(report.male_customers))
        .bind(i64::from(report.female_customers))
        .bind(&report.age_group)
        .bind(i64::from(report.rating))
        .bind(&report.sentiment)
        .bind(&report.comments)
        .bind(&report.competitor_notes)
        .bind(timestamp_text(&report.submitted_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn sales_entry_from_row(row: SqliteRow) -> Result<SalesEntry, RepositoryError> {
    Ok(SalesEntry {
        id: row.try_get("id")?,
        campaign_id: CampaignId(row.try_get("campaign_id")?),
        variant: row.try_get("variant")?,
        units: parse_u32("units", row.try_get("units")?)?,
        unit_price: parse_decimal("unit_price", row.try_get("unit_price")?)?,
        recorded_at: parse_timestamp("recorded_at", row.try_get("recorded_at")?)?,
    })
}

fn promoter_report_from_row(row: SqliteRow) -> Result<PromoterReport, RepositoryError> {
    let rating: i64 = row.try_get("rating")?;

    Ok(PromoterReport {
        id: row.try_get("id")?,
        campaign_id: CampaignId(row.try_get("campaign_id")?),
        promoter_name: row.try_get("promoter_name")?,
        engaged_customers: parse_u32("engaged_customers", row.try_get("engaged_customers")?)?,
        potential_customers: parse_u32("potential_customers", row.try_get("potential_customers")?)?,
        male_customers: parse_u32("male_customers", row.try_get("male_customers")?)?,
        female_customers: parse_u32("female_customers", row.try_get("female_customers")?)?,
        age_group: row.try_get("age_group")?,
        rating: u8::try_from(rating).map_err(|_| {
            RepositoryError::Decode(format!("invalid value for `rating`: {rating}"))
        })?,
        sentiment: row.try_get("sentiment")?,
        comments: row.try_get("comments")?,
        competitor_notes: row.try_get("competitor_notes")?,
        submitted_at: parse_timestamp("submitted_at", row.try_get("submitted_at")?)?,
    })
}
