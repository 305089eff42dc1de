use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use snapactivate_db::{migrations, DbPool};

#[derive(Clone)]
pub struct HealthState {
    pub db_pool: DbPool,
    pub llm_provider: &'static str,
    pub tool_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: HealthCheck,
    pub assistant: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Ready only when the database answers and every schema table exists.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_check(&state.db_pool).await;
    let assistant = if state.tool_count > 0 {
        HealthCheck {
            status: "ready",
            detail: format!("{} tools registered, provider {}", state.tool_count, state.llm_provider),
        }
    } else {
        HealthCheck { status: "degraded", detail: "no assistant tools registered".to_string() }
    };
    let ready = database.status == "ready" && assistant.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        database,
        assistant,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn database_check(pool: &DbPool) -> HealthCheck {
    match migrations::missing_tables(pool).await {
        Ok(missing) if missing.is_empty() => {
            HealthCheck { status: "ready", detail: "database schema is current".to_string() }
        }
        Ok(missing) => HealthCheck {
            status: "degraded",
            detail: format!(
                "{} of {} schema tables present; run migrations",
                migrations::SCHEMA_TABLES.len() - missing.len(),
                migrations::SCHEMA_TABLES.len()
            ),
        },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("database query failed: {error}") }
        }
    }
}
