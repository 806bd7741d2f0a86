mod api;
mod app;
mod config;
mod error;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::app::{AppState, router};
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    let app = router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!(addr = %config.addr(), "Starting {} v{}", api::SERVICE_NAME, api::API_VERSION);
    tracing::info!("API endpoints: POST /api/crawl-url, POST /api/test-gap-analysis");

    axum::serve(listener, app).await?;
    Ok(())
}
