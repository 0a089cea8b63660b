//! Analysis history handlers

use axum::{
    extract::{Path, State},
    Json,
};

use shared::AnalysisRecord;

use crate::error::AppResult;
use crate::AppState;

/// All past analyses, newest first
pub async fn list_history(State(state): State<AppState>) -> Json<Vec<AnalysisRecord>> {
    Json(state.history.list().await)
}

pub async fn get_history_record(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> AppResult<Json<AnalysisRecord>> {
    let record = state.history.get(&record_id).await?;
    Ok(Json(record))
}
