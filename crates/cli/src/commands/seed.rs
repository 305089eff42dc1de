use snapactivate_db::{DemoSeedDataset, SeedResult};

use crate::commands::{build_runtime, load_config, migrated_pool, CommandResult, StepFailure};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = migrated_pool(&config).await?;

        let seeded = DemoSeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;
        let verification = DemoSeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        let outcome: Result<SeedResult, StepFailure> = if verification.all_present {
            Ok(seeded)
        } else {
            let failed = verification
                .checks
                .iter()
                .filter_map(|(check, passed)| (!passed).then_some(*check))
                .collect::<Vec<_>>();
            Err(("seed_verification", verification_message(&failed), 6u8))
        };

        pool.close().await;
        outcome
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", summary(&seeded)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn verification_message(failed: &[&str]) -> String {
    if failed.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for checks: {}", failed.join(", "))
    }
}

fn summary(seeded: &SeedResult) -> String {
    let tables = seeded
        .tables_seeded
        .iter()
        .map(|table| format!("  - {}: {} rows", table.table, table.rows))
        .collect::<Vec<_>>();
    format!("demo dataset loaded ({} rows):\n{}", seeded.total_rows(), tables.join("\n"))
}

#[cfg(test)]
mod tests {
    use snapactivate_db::{SeedResult, TableSeedInfo};

    use super::{summary, verification_message};

    #[test]
    fn verification_message_names_failed_checks() {
        assert_eq!(
            verification_message(&["camp-summer-splash", "Active"]),
            "Seed verification failed for checks: camp-summer-splash, Active"
        );
        assert_eq!(verification_message(&[]), "Some seed data failed to load");
    }

    #[test]
    fn summary_lists_tables_with_total() {
        let seeded = SeedResult {
            tables_seeded: vec![
                TableSeedInfo { table: "brands", rows: 3 },
                TableSeedInfo { table: "campaigns", rows: 3 },
            ],
        };
        assert_eq!(
            summary(&seeded),
            "demo dataset loaded (6 rows):\n  - brands: 3 rows\n  - campaigns: 3 rows"
        );
    }
}
