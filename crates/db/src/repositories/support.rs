use sqlx::{sqlite::SqliteRow, Row};

use snapactivate_core::domain::brand::BrandId;
use snapactivate_core::domain::support::{
    NewSupportTicket, SupportTicket, TicketId, TicketPriority, TicketStatus,
};

use super::decode::{parse_timestamp, timestamp_text, unknown_value};
use super::{new_record_id, RepositoryError, SupportTicketRepository};
use crate::DbPool;

pub struct SqlSupportTicketRepository {
    pool: DbPool,
}

impl SqlSupportTicketRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SupportTicketRepository for SqlSupportTicketRepository {
    async fn create(&self, ticket: NewSupportTicket) -> Result<TicketId, RepositoryError> {
        let id = new_record_id();

        sqlx::query(
            "INSERT INTO support_tickets (
                id,
                campaign_name,
                issue_description,
                priority,
                brand_id,
                status,
                created_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&ticket.campaign_name)
        .bind(&ticket.issue_description)
        .bind(ticket.priority.as_str())
        .bind(&ticket.brand_id.0)
        .bind(ticket.status.as_str())
        .bind(timestamp_text(&ticket.created_at))
        .execute(&self.pool)
        .await?;

        Ok(TicketId(id))
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<SupportTicket>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, campaign_name, issue_description, priority, brand_id, status, created_at
             FROM support_tickets
             WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ticket_from_row).transpose()
    }

    async fn list_for_brand(
        &self,
        brand_id: &BrandId,
    ) -> Result<Vec<SupportTicket>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, campaign_name, issue_description, priority, brand_id, status, created_at
             FROM support_tickets
             WHERE brand_id = ?
             ORDER BY created_at DESC",
        )
        .bind(&brand_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ticket_from_row).collect()
    }
}

fn ticket_from_row(row: SqliteRow) -> Result<SupportTicket, RepositoryError> {
    let priority: String = row.try_get("priority")?;
    let status: String = row.try_get("status")?;

    Ok(SupportTicket {
        id: TicketId(row.try_get("id")?),
        campaign_name: row.try_get("campaign_name")?,
        issue_description: row.try_get("issue_description")?,
        priority: TicketPriority::parse(&priority)
            .map_err(|_| unknown_value("priority", &priority))?,
        brand_id: BrandId(row.try_get("brand_id")?),
        status: TicketStatus::parse(&status).ok_or_else(|| unknown_value("status", &status))?,
        created_at: parse_timestamp("created_at", row.try_get("created_at")?)?,
    })
}

#[cfg(test)]
mod tests {
    use snapactivate_core::domain::brand::BrandId;
    use snapactivate_core::domain::support::{
        NewSupportTicket, SupportTicketRequest, TicketPriority, TicketStatus,
    };

    use super::SqlSupportTicketRepository;
    use crate::repositories::SupportTicketRepository;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn sql_ticket_repo_round_trip() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlSupportTicketRepository::new(pool);
        let brand = BrandId("brand-1".to_string());

        let ticket = NewSupportTicket::from_request(
            SupportTicketRequest {
                campaign_name: "Summer Fest".to_string(),
                issue_description: "Promoter did not arrive".to_string(),
                priority: TicketPriority::Urgent,
            },
            brand.clone(),
        );

        let id = repo.create(ticket).await.expect("create ticket");
        let found = repo.find_by_id(&id).await.expect("find").expect("ticket exists");
        assert_eq!(found.status, TicketStatus::New);
        assert_eq!(found.priority, TicketPriority::Urgent);

        let listed = repo.list_for_brand(&brand).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert!(repo
            .list_for_brand(&BrandId("other".to_string()))
            .await
            .expect("list other")
            .is_empty());
    }
}
