use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Row counts the demo dataset guarantees, per table.
const SEED_TABLES: &[SeedTableContract] = &[
    SeedTableContract { table: "brands", ids: &["brand-fizz", "brand-lumen", "brand-kasi"] },
    SeedTableContract {
        table: "campaigns",
        ids: &["camp-summer-splash", "camp-winter-warmers", "camp-spring-launch"],
    },
    SeedTableContract {
        table: "promoter_assignments",
        ids: &[
            "pa-splash-alice",
            "pa-splash-bob",
            "pa-splash-charlie",
            "pa-winter-dineo",
            "pa-winter-eben",
        ],
    },
    SeedTableContract {
        table: "sales_entries",
        ids: &["sale-winter-original", "sale-winter-ginger", "sale-splash-berry"],
    },
    SeedTableContract { table: "promoter_reports", ids: &["pr-winter-dineo", "pr-winter-eben"] },
    SeedTableContract { table: "campaign_packages", ids: &["pkg-bronze", "pkg-silver", "pkg-gold"] },
];

const SEED_CAMPAIGN_STATUSES: &[(&str, &str)] = &[
    ("camp-summer-splash", "Active"),
    ("camp-winter-warmers", "Completed"),
    ("camp-spring-launch", "Pending Payment"),
];

struct SeedTableContract {
    table: &'static str,
    ids: &'static [&'static str],
}

/// Demo dataset: three brands (one per payment plan), one live campaign with
/// promoter check-ins, one completed campaign with sales and promoter reports,
/// and the standard package tiers.
pub struct DemoSeedDataset;

impl DemoSeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_seed.sql");

    /// Loads the dataset. Rows that already exist are left untouched.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult {
            tables_seeded: SEED_TABLES
                .iter()
                .map(|contract| TableSeedInfo { table: contract.table, rows: contract.ids.len() })
                .collect(),
        })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for contract in SEED_TABLES {
            for id in contract.ids {
                let exists: i64 = sqlx::query_scalar(&format!(
                    "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)",
                    contract.table
                ))
                .bind(*id)
                .fetch_one(pool)
                .await?;
                checks.push((*id, exists == 1));
            }
        }

        for (campaign_id, status) in SEED_CAMPAIGN_STATUSES {
            let matches: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM campaigns WHERE id = ?1 AND status = ?2)",
            )
            .bind(*campaign_id)
            .bind(*status)
            .fetch_one(pool)
            .await?;
            checks.push((*status, matches == 1));
        }

        let all_present = checks.iter().all(|(_, exists)| *exists);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub tables_seeded: Vec<TableSeedInfo>,
}

impl SeedResult {
    pub fn total_rows(&self) -> usize {
        self.tables_seeded.iter().map(|table| table.rows).sum()
    }
}

#[derive(Debug)]
pub struct TableSeedInfo {
    pub table: &'static str,
    pub rows: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
