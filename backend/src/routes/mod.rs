//! Route definitions for the Krishi Sakhi API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Onboarding and per-farmer state
        .nest("/sessions", session_routes())
        // Soil analysis history (shared by all sessions)
        .nest("/history", history_routes())
}

/// Session routes, keyed by the id returned at onboarding
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/:id/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/:id/language", put(handlers::set_language))
        .route("/:id/crop", post(handlers::select_crop))
        .route("/:id/dashboard", get(handlers::get_dashboard))
        .route("/:id/tasks", get(handlers::list_tasks))
        .route("/:id/tasks/upcoming", get(handlers::upcoming_tasks))
        .route("/:id/tasks/:task_id/toggle", post(handlers::toggle_task))
        .route("/:id/chat", post(handlers::send_message))
        .route("/:id/chat/messages", get(handlers::list_messages))
        .route("/:id/chat/stream", post(handlers::stream_message))
        .route("/:id/soil-analysis", post(handlers::analyze_soil))
}

fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_history))
        .route("/:record_id", get(handlers::get_history_record))
}
