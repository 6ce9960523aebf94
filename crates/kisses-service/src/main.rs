//! Kisses Service - HTTP API for the credit ledger and generation gateway.
//!
//! This is the main entry point for the kisses service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kisses_service::{create_router, AppState, ServiceConfig};
use kisses_store::SqliteLedger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kisses=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Kisses Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        database_path = %config.database_path,
        provider_configured = %config.provider_api_key.is_some(),
        admin_secret_configured = %config.admin_secret.is_some(),
        rate_limit_requests = %config.rate_limit_requests,
        "Service configuration loaded"
    );

    // Open the ledger and inject it into the app state; the pool is owned
    // here and closed when the process exits.
    tracing::info!(path = %config.database_path, "Opening ledger database");
    let ledger = Arc::new(SqliteLedger::open(&config.database_path, config.amounts).await?);

    let state = AppState::new(Arc::clone(&ledger), config.clone());

    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    ledger.close().await;

    Ok(())
}
