//! Dashboard and task list handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::Task;

use crate::error::{AppError, AppResult};
use crate::services::dashboard::{DashboardService, DashboardView, UpcomingView};
use crate::services::AdvisoryService;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub refresh: bool,
}

fn dashboard_service(state: &AppState) -> DashboardService {
    DashboardService::new(
        AdvisoryService::new(state.model.clone()),
        state.sessions.clone(),
    )
}

/// Dashboard cards, loading them from the model when stale
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RefreshQuery>,
) -> AppResult<Json<DashboardView>> {
    let view = dashboard_service(&state).load(id, query.refresh).await?;
    Ok(Json(view))
}

/// Today's tasks, generated on first use for the current profile
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RefreshQuery>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = dashboard_service(&state).today(id, query.refresh).await?;
    Ok(Json(tasks))
}

/// Flip a task between done and pending
pub async fn toggle_task(
    State(state): State<AppState>,
    Path((id, task_id)): Path<(Uuid, String)>,
) -> AppResult<Json<Task>> {
    let task = state
        .sessions
        .update(id, |s| s.tasks.toggle(&task_id).cloned())
        .await?
        .ok_or_else(|| AppError::NotFound("Task".to_string()))?;
    Ok(Json(task))
}

/// Today's tasks plus the weekly plan
pub async fn upcoming_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RefreshQuery>,
) -> AppResult<Json<UpcomingView>> {
    let view = dashboard_service(&state).upcoming(id, query.refresh).await?;
    Ok(Json(view))
}
