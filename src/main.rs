//! Payroll HTTP server.
//!
//! Reads the YAML configuration named by `LABOR_PAYROLL_CONFIG` (default
//! `./config/payroll.yaml`), opens and migrates the database, then serves the
//! API until interrupted.

use labor_payroll::api::{AppState, create_router};
use labor_payroll::config::ConfigLoader;
use labor_payroll::error::{PayrollError, PayrollResult};
use labor_payroll::service::PayrollService;
use labor_payroll::storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "./config/payroll.yaml";

#[tokio::main]
async fn main() -> PayrollResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labor_payroll=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path =
        std::env::var("LABOR_PAYROLL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let loader = ConfigLoader::load(&config_path)?;
    tracing::info!(path = %config_path, "Configuration loaded");

    let database = Database::open(loader.database()).await?;
    let service = PayrollService::new(&database, loader.payroll().clone(), loader.backup());

    let bind_addr = loader.server().bind_addr.clone();
    let router = create_router(AppState::new(loader, service));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| PayrollError::Io {
            path: bind_addr.clone(),
            source,
        })?;
    tracing::info!(addr = %bind_addr, "Payroll API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| PayrollError::Io {
            path: bind_addr,
            source,
        })?;

    database.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
