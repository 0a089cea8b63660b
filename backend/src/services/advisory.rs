//! Advisory service: structured prompt calls to the language model
//!
//! Dashboard calls never fail: a missing crop skips the call, and any model
//! or parse failure is logged and degrades to an empty result. Only soil
//! recommendations report failure to the caller.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use shared::i18n;
use shared::{AiTask, CropRecommendation, DashboardAdvice, Language, MarketPrice, Profile, SoilData, WeeklyTasks};

use super::{prompts, schemas};
use crate::error::{AppError, AppResult};
use crate::external::LanguageModel;

#[derive(Deserialize)]
struct TasksEnvelope {
    #[serde(default)]
    tasks: Vec<AiTask>,
}

#[derive(Deserialize)]
struct RecommendationsEnvelope {
    recommendations: Vec<CropRecommendation>,
}

/// Strip surrounding whitespace and a markdown code fence, if present
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a model answer into `T`
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| AppError::ModelResponse(e.to_string()))
}

/// Advice, tasks, prices and crop recommendations for one farmer
#[derive(Clone)]
pub struct AdvisoryService {
    model: Arc<dyn LanguageModel>,
}

impl AdvisoryService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    async fn ask<T: DeserializeOwned>(&self, prompt: &str, schema: &Value) -> AppResult<T> {
        let raw = self.model.generate_json(prompt, schema).await?;
        parse_model_json(&raw)
    }

    /// 3-4 tasks for today
    pub async fn daily_tasks(&self, profile: &Profile, lang: Language) -> Vec<AiTask> {
        if !profile.has_crop() {
            return Vec::new();
        }
        let prompt = prompts::daily_tasks(profile, lang);
        match self.ask::<TasksEnvelope>(&prompt, &schemas::daily_tasks()).await {
            Ok(envelope) => envelope.tasks,
            Err(e) => {
                tracing::error!("Error getting daily tasks from model: {}", e);
                Vec::new()
            }
        }
    }

    /// Seven-day plan
    pub async fn weekly_tasks(&self, profile: &Profile, lang: Language) -> Option<WeeklyTasks> {
        if !profile.has_crop() {
            return None;
        }
        let prompt = prompts::weekly_tasks(profile, lang);
        self.ask(&prompt, &schemas::weekly_tasks())
            .await
            .map_err(|e| tracing::error!("Error getting weekly tasks from model: {}", e))
            .ok()
    }

    pub async fn dashboard_advice(&self, profile: &Profile, lang: Language) -> Option<DashboardAdvice> {
        if !profile.has_crop() {
            return None;
        }
        let prompt = prompts::dashboard_advice(profile, lang);
        self.ask(&prompt, &schemas::dashboard_advice())
            .await
            .map_err(|e| tracing::error!("Error getting dashboard advice from model: {}", e))
            .ok()
    }

    /// Market price for the main crop; the trend is normalized while parsing
    pub async fn market_price(&self, profile: &Profile, lang: Language) -> Option<MarketPrice> {
        if !profile.has_crop() {
            return None;
        }
        let prompt = prompts::market_price(profile, lang);
        self.ask(&prompt, &schemas::market_price())
            .await
            .map_err(|e| tracing::error!("Error getting market price from model: {}", e))
            .ok()
    }

    /// Exactly the crops the model recommends for a soil sample, suitability
    /// normalized to the English tier names
    pub async fn soil_recommendations(
        &self,
        soil: &SoilData,
        lang: Language,
    ) -> AppResult<Vec<CropRecommendation>> {
        let prompt = prompts::soil_recommendations(soil, lang);
        self.ask::<RecommendationsEnvelope>(&prompt, &schemas::soil_recommendations())
            .await
            .map(|envelope| envelope.recommendations)
            .map_err(|e| {
                tracing::error!("Error getting soil recommendations from model: {}", e);
                AppError::RecommendationFailed {
                    message_local: i18n::catalog(lang).error_recommendations.to_string(),
                }
            })
    }
}
