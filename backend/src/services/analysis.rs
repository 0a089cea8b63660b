//! Soil analysis: crop recommendations for a soil sample, recorded in history

use serde::Serialize;

use shared::i18n;
use shared::{soil_warnings, AnalysisRecord, Language, SoilData, SoilWarning};

use super::advisory::AdvisoryService;
use super::history::HistoryStore;
use crate::error::AppResult;

/// Result of one soil submission
#[derive(Debug, Clone, Serialize)]
pub struct SoilAnalysis {
    pub record: AnalysisRecord,
    pub warnings: Vec<SoilWarning>,
    /// Localized text for the pH warning, when raised
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
}

#[derive(Clone)]
pub struct SoilAnalysisService {
    advisory: AdvisoryService,
    history: HistoryStore,
}

impl SoilAnalysisService {
    pub fn new(advisory: AdvisoryService, history: HistoryStore) -> Self {
        Self { advisory, history }
    }

    /// Ask for recommendations and record the result.
    ///
    /// Warnings never block the request. A failed history write is logged;
    /// the farmer still gets the recommendations.
    pub async fn analyze(&self, soil: SoilData, lang: Language) -> AppResult<SoilAnalysis> {
        let warnings = soil_warnings(&soil);
        let warning_message = warnings
            .contains(&SoilWarning::PhOutOfRange)
            .then(|| i18n::catalog(lang).ph_warning.to_string());

        let recommendations = self.advisory.soil_recommendations(&soil, lang).await?;
        let record = AnalysisRecord::new(soil, recommendations);

        if let Err(e) = self.history.append(record.clone()).await {
            tracing::error!("Failed to save analysis history: {}", e);
        }

        tracing::info!(
            record_id = %record.id,
            crops = record.recommendations.len(),
            "Soil analysis recorded"
        );

        Ok(SoilAnalysis {
            record,
            warnings,
            warning_message,
        })
    }
}
