mod analysis;
mod client;
mod config;
mod web;

use anyhow::{Context, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toxilens=info,tower_http=info".into()),
        )
        .init();

    info!("Loading configuration...");
    let config = config::AppConfig::load()?;
    info!("Analysis API at {}", config.api.base_url);

    let client = client::AnalysisClient::new(&config.api)
        .context("Failed to build analysis API client")?;

    match client.health().await {
        Ok(_) => info!("Analysis API is reachable"),
        Err(e) => tracing::warn!("Analysis API not reachable yet: {:#}", e),
    }

    let app_state = web::state::AppState::new(client, &config.web);
    let router = web::create_router(app_state);

    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:#}", e);
    }
}
