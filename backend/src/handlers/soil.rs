//! Soil analysis handler

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::SoilData;

use crate::error::AppResult;
use crate::services::analysis::{SoilAnalysis, SoilAnalysisService};
use crate::services::AdvisoryService;
use crate::AppState;

/// Submit soil readings and get three crop recommendations
pub async fn analyze_soil(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(soil): Json<SoilData>,
) -> AppResult<(StatusCode, Json<SoilAnalysis>)> {
    let lang = state.sessions.read(id, |s| s.language).await?;
    let service = SoilAnalysisService::new(
        AdvisoryService::new(state.model.clone()),
        state.history.clone(),
    );
    let analysis = service.analyze(soil, lang).await?;
    Ok((StatusCode::CREATED, Json(analysis)))
}
