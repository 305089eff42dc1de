use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Tables the migrations own; readiness checks expect all of them.
pub const SCHEMA_TABLES: [&str; 7] = [
    "brands",
    "campaigns",
    "support_tickets",
    "campaign_packages",
    "promoter_assignments",
    "sales_entries",
    "promoter_reports",
];

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Schema tables not yet present in the connected database.
pub async fn missing_tables(pool: &DbPool) -> Result<Vec<&'static str>, sqlx::Error> {
    let present: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(pool)
            .await?;

    Ok(SCHEMA_TABLES
        .into_iter()
        .filter(|table| !present.iter().any(|name| name == table))
        .collect())
}
