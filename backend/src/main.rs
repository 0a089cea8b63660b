//! Krishi Sakhi - Backend Server entry point

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use krishi_server::{
    config::Config, create_app, external::GeminiClient, services::history::HistoryStore,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "krishi_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Krishi Sakhi Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Model: {}", config.gemini.model);

    if config.gemini.api_key.is_empty() {
        tracing::warn!("No Gemini API key configured; AI features will fall back to empty results");
    }

    let model = GeminiClient::new(&config.gemini)?;

    tracing::info!("Loading analysis history from {}", config.storage.history_path);
    let history = HistoryStore::open(&config.storage.history_path).await;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(config, Arc::new(model), history);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
