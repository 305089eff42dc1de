use serde::Serialize;
use snapactivate_core::config::{AppConfig, LlmProvider, LoadOptions};
use snapactivate_db::{connect_with_config, migrations, DbPool};

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str) -> Self {
        Self {
            name,
            status: CheckStatus::Skipped,
            details: "skipped because an earlier check failed".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck::pass("config_validation", "configuration loaded and validated"));
            checks.push(check_llm_provider(&config));
            checks.extend(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("config_validation", error.to_string()));
            checks.push(DoctorCheck::skipped("llm_provider"));
            checks.push(DoctorCheck::skipped("database_connectivity"));
            checks.push(DoctorCheck::skipped("database_schema"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_llm_provider(config: &AppConfig) -> DoctorCheck {
    let target = format!("{} model `{}` at {}", config.llm.provider.as_str(), config.llm.model, config.llm_base_url());
    match config.llm.provider {
        LlmProvider::Gemini if config.llm.api_key.is_none() => {
            DoctorCheck::fail("llm_provider", format!("{target}: api key is not set"))
        }
        _ => DoctorCheck::pass(
            "llm_provider",
            format!("{target}, up to {} tool rounds per turn", config.llm.max_tool_rounds),
        ),
    }
}

fn check_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![
                DoctorCheck::fail(
                    "database_connectivity",
                    format!("failed to initialize async runtime: {error}"),
                ),
                DoctorCheck::skipped("database_schema"),
            ];
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_config(&config.database).await {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck::fail(
                        "database_connectivity",
                        format!("failed to connect to database: {error}"),
                    ),
                    DoctorCheck::skipped("database_schema"),
                ];
            }
        };

        let checks = vec![
            DoctorCheck::pass("database_connectivity", format!("connected using `{}`", config.database.url)),
            check_schema(&pool).await,
        ];
        pool.close().await;
        checks
    })
}

async fn check_schema(pool: &DbPool) -> DoctorCheck {
    match migrations::missing_tables(pool).await {
        Ok(missing) if missing.is_empty() => {
            DoctorCheck::pass("database_schema", "all schema tables present")
        }
        Ok(missing) => DoctorCheck::fail(
            "database_schema",
            format!("missing tables: {}; run `snapactivate migrate`", missing.join(", ")),
        ),
        Err(error) => DoctorCheck::fail("database_schema", format!("schema query failed: {error}")),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
