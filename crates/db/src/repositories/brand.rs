use sqlx::{sqlite::SqliteRow, Row};

use snapactivate_core::domain::brand::{BrandId, BrandProfile, PaymentPlan, UserRole};

use super::decode::{parse_timestamp, timestamp_text, unknown_value};
use super::{BrandRepository, RepositoryError};
use crate::DbPool;

pub struct SqlBrandRepository {
    pool: DbPool,
}

impl SqlBrandRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BrandRepository for SqlBrandRepository {
    async fn find_by_id(&self, id: &BrandId) -> Result<Option<BrandProfile>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, company_name, payment_plan, role, created_at
             FROM brands
             WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(brand_from_row).transpose()
    }

    async fn save(&self, brand: BrandProfile) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO brands (id, name, company_name, payment_plan, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                company_name = excluded.company_name,
                payment_plan = excluded.payment_plan,
                role = excluded.role",
        )
        .bind(&brand.id.0)
        .bind(&brand.name)
        .bind(&brand.company_name)
        .bind(brand.payment_plan.as_str())
        .bind(brand.role.as_str())
        .bind(timestamp_text(&brand.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn brand_from_row(row: SqliteRow) -> Result<BrandProfile, RepositoryError> {
    let role: String = row.try_get("role")?;
    let payment_plan: String = row.try_get("payment_plan")?;

    Ok(BrandProfile {
        id: BrandId(row.try_get("id")?),
        name: row.try_get("name")?,
        company_name: row.try_get("company_name")?,
        payment_plan: PaymentPlan::parse(&payment_plan),
        role: UserRole::parse(&role).ok_or_else(|| unknown_value("role", &role))?,
        created_at: parse_timestamp("created_at", row.try_get("created_at")?)?,
    })
}
