//! Krishi Sakhi - Backend Server
//!
//! Farmer-facing advisory API: localized AI advice, task lists, market
//! prices and crop recommendations, all produced by prompt calls to a
//! generative-language model.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use external::LanguageModel;
use services::{history::HistoryStore, session::SessionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub model: Arc<dyn LanguageModel>,
    pub sessions: SessionStore,
    pub history: HistoryStore,
}

impl AppState {
    pub fn new(config: Config, model: Arc<dyn LanguageModel>, history: HistoryStore) -> Self {
        Self {
            config: Arc::new(config),
            model,
            sessions: SessionStore::new(),
            history,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Krishi Sakhi Advisory API v1.0"
}
