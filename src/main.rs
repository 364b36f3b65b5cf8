use anyhow::Context;
use silicia_gateway::api::{self, app_state::AppState};
use silicia_gateway::config::loader::ConfigLoader;
use silicia_gateway::observability::{ObservabilityState, init_tracing};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    info!("Starting Silicia telegram gateway...");

    ConfigLoader::validate(&config).context("invalid configuration")?;
    info!(
        endpoint = %config.appwrite.endpoint,
        database = %config.appwrite.database_id,
        detached_actions = config.actions.detached,
        "Configuration loaded successfully"
    );

    let observability = Arc::new(ObservabilityState::new(env!("CARGO_PKG_VERSION")));
    let app_state = AppState::from_config(&config, Arc::clone(&observability))?;
    info!("Application state created");

    let shutdown_state = app_state.clone();
    let router = api::create_router(app_state);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_state.drain_background().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
