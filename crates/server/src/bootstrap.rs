use std::sync::Arc;

use snapactivate_agent::{
    client_from_config, AgentRuntime, CampaignReportGenerator, LlmClient, LlmError, ReportError,
    ToolRegistry,
};
use snapactivate_core::config::{AppConfig, ConfigError};
use snapactivate_db::{connect_with_settings, migrations, BackendOperations, DbPool, Stores};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub operations: BackendOperations,
    pub agent_runtime: AgentRuntime,
    pub reports: CampaignReportGenerator,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("llm client setup failed: {0}")]
    Llm(#[from] LlmError),
    #[error("report template setup failed: {0}")]
    Report(#[from] ReportError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let llm = client_from_config(&config)?;
    bootstrap_with_llm(config, llm).await
}

/// Wires stores, operations and the assistant around an already built model client.
pub async fn bootstrap_with_llm(
    config: AppConfig,
    llm: Arc<dyn LlmClient>,
) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        llm_provider = config.llm.provider.as_str(),
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let operations = BackendOperations::new(&Stores::sql(db_pool.clone()));
    let registry = ToolRegistry::snapactivate(&operations);
    info!(
        event_name = "system.bootstrap.tools_registered",
        correlation_id = "bootstrap",
        tool_count = registry.len(),
        "assistant tools registered"
    );

    let agent_runtime = AgentRuntime::new(llm.clone(), Arc::new(registry));
    let reports = CampaignReportGenerator::new(llm)?;

    Ok(Application { config, db_pool, operations, agent_runtime, reports })
}
