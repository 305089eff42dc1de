use sqlx::{sqlite::SqliteRow, Row};

use snapactivate_core::domain::campaign::CampaignId;
use snapactivate_core::domain::promoter::{CheckInStatus, PromoterAssignment};

use super::decode::{parse_optional_timestamp, timestamp_text, unknown_value};
use super::{PromoterAssignmentRepository, RepositoryError};
use crate::DbPool;

pub struct SqlPromoterAssignmentRepository {
    pool: DbPool,
}

impl SqlPromoterAssignmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PromoterAssignmentRepository for SqlPromoterAssignmentRepository {
    async fn list_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<PromoterAssignment>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, campaign_id, promoter_name, status, location, checked_in_at
             FROM promoter_assignments
             WHERE campaign_id = ?
             ORDER BY promoter_name ASC",
        )
        .bind(&campaign_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(assignment_from_row).collect()
    }

    async fn save(&self, assignment: PromoterAssignment) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO promoter_assignments (
                id,
                campaign_id,
                promoter_name,
                status,
                location,
                checked_in_at
             ) VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                promoter_name = excluded.promoter_name,
                status = excluded.status,
                location = excluded.location,
                checked_in_at = excluded.checked_in_at",
        )
        .bind(&assignment.id)
        .bind(&assignment.campaign_id.0)
        .bind(&assignment.promoter_name)
        .bind(assignment.status.as_str())
        .bind(&assignment.location)
        .bind(assignment.checked_in_at.as_ref().map(timestamp_text))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn assignment_from_row(row: SqliteRow) -> Result<PromoterAssignment, RepositoryError> {
    let status: String = row.try_get("status")?;

    Ok(PromoterAssignment {
        id: row.try_get("id")?,
        campaign_id: CampaignId(row.try_get("campaign_id")?),
        promoter_name: row.try_get("promoter_name")?,
        status: CheckInStatus::parse(&status).ok_or_else(|| unknown_value("status", &status))?,
        location: row.try_get("location")?,
        checked_in_at: parse_optional_timestamp("checked_in_at", row.try_get("checked_in_at")?)?,
    })
}
