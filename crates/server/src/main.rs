mod api;
mod bootstrap;
mod campaigns;
mod chat;
mod health;
mod packages;

use std::time::Duration;

use anyhow::Result;
use axum::Router;
use snapactivate_core::config::{AppConfig, LoadOptions};

use crate::bootstrap::Application;

fn init_logging(config: &AppConfig) {
    use snapactivate_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

fn app_router(app: &Application) -> Router {
    Router::new()
        .merge(chat::router(app.agent_runtime.clone()))
        .merge(campaigns::router(app.operations.clone(), app.reports.clone()))
        .merge(packages::router(app.operations.packages.clone()))
        .merge(health::router(health::HealthState {
            db_pool: app.db_pool.clone(),
            llm_provider: app.agent_runtime.provider(),
            tool_count: app.agent_runtime.registry().len(),
        }))
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        llm_provider = app.agent_runtime.provider(),
        "snapactivate-server listening"
    );

    axum::serve(listener, app_router(&app)).with_graceful_shutdown(wait_for_shutdown()).await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "snapactivate-server stopping"
    );
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    if tokio::time::timeout(grace, app.db_pool.close()).await.is_err() {
        tracing::warn!(
            event_name = "system.server.shutdown_timeout",
            correlation_id = "shutdown",
            "database pool did not close within the grace period"
        );
    }

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "failed to listen for shutdown signal"
        );
    }
}
