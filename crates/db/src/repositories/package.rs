use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use snapactivate_core::domain::package::{CampaignPackage, NewPackage, PackageId};

use super::decode::{parse_decimal, parse_u32, timestamp_text};
use super::{new_record_id, PackageRepository, RepositoryError};
use crate::DbPool;

pub struct SqlPackageRepository {
    pool: DbPool,
}

impl SqlPackageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PackageRepository for SqlPackageRepository {
    async fn list(&self) -> Result<Vec<CampaignPackage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, price, promoters, locations
             FROM campaign_packages
             ORDER BY created_at ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(package_from_row).collect()
    }

    async fn find_by_id(&self, id: &PackageId) -> Result<Option<CampaignPackage>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, price, promoters, locations FROM campaign_packages WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(package_from_row).transpose()
    }

    async fn create(&self, package: NewPackage) -> Result<CampaignPackage, RepositoryError> {
        let created = CampaignPackage {
            id: PackageId(new_record_id()),
            name: package.name.trim().to_string(),
            price: package.price,
            promoters: package.promoters,
            locations: package.locations,
        };
        let now = timestamp_text(&Utc::now());

        sqlx::query(
            "INSERT INTO campaign_packages (id, name, price, promoters, locations, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&created.id.0)
        .bind(&created.name)
        .bind(created.price.to_string())
        .bind(i64::from(created.promoters))
        .bind(i64::from(created.locations))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(created)
    }

    async fn save(&self, package: CampaignPackage) -> Result<(), RepositoryError> {
        let now = timestamp_text(&Utc::now());

        sqlx::query(
            "INSERT INTO campaign_packages (id, name, price, promoters, locations, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                price = excluded.price,
                promoters = excluded.promoters,
                locations = excluded.locations,
                updated_at = excluded.updated_at",
        )
        .bind(&package.id.0)
        .bind(&package.name)
        .bind(package.price.to_string())
        .bind(i64::from(package.promoters))
        .bind(i64::from(package.locations))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &PackageId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM campaign_packages WHERE id = ?")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn package_from_row(row: SqliteRow) -> Result<CampaignPackage, RepositoryError> {
    Ok(CampaignPackage {
        id: PackageId(row.try_get("id")?),
        name: row.try_get("name")?,
        price: parse_decimal("price", row.try_get("price")?)?,
        promoters: parse_u32("promoters", row.try_get("promoters")?)?,
        locations: parse_u32("locations", row.try_get("locations")?)?,
    })
}
