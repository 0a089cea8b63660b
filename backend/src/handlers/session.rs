//! Onboarding, logout, profile and language handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::i18n;
use shared::{validate_profile, Language, Profile, DEFAULT_DISTRICT};

use crate::error::{AppError, AppResult};
use crate::services::session::SessionSummary;
use crate::AppState;

fn default_district() -> String {
    DEFAULT_DISTRICT.to_string()
}

/// Profile fields as submitted by the onboarding wizard or profile editor
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: Option<String>,
    #[serde(default = "default_district")]
    pub district: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub land_size: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub crop: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub soil_type: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub irrigation: String,
}

impl ProfileInput {
    /// Validate and normalize into a profile; messages are localized where
    /// the farmer's language is known
    fn into_profile(self, lang: Language) -> AppResult<Profile> {
        self.validate()?;

        let profile = Profile {
            name: self.name.trim().to_string(),
            email: self
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            district: self.district.trim().to_string(),
            land_size: self.land_size.trim().to_string(),
            crop: self.crop.trim().to_string(),
            soil_type: self.soil_type.trim().to_string(),
            irrigation: self.irrigation.trim().to_string(),
        };

        validate_profile(&profile).map_err(|(field, message)| AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_local: (field == "name")
                .then(|| i18n::catalog(lang).required_field.to_string()),
        })?;

        Ok(profile)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct OnboardingRequest {
    #[validate]
    pub profile: ProfileInput,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct SetLanguageRequest {
    pub language: Language,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SelectCropRequest {
    #[validate(length(min = 1, max = 100, message = "Crop name is required"))]
    pub crop_name: String,
}

#[derive(Debug, Serialize)]
pub struct CropSelectedResponse {
    pub profile: Profile,
    pub active_crops: u32,
    pub message: String,
}

/// Onboarding: create a session for a new farmer
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<OnboardingRequest>,
) -> AppResult<(StatusCode, Json<SessionSummary>)> {
    input.validate()?;
    let profile = input.profile.into_profile(input.language)?;
    let session = state.sessions.create(profile, input.language).await;
    Ok((StatusCode::CREATED, Json(session.summary())))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionSummary>> {
    let summary = state.sessions.read(id, |s| s.summary()).await?;
    Ok(Json(summary))
}

/// Logout
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let profile = state.sessions.read(id, |s| s.profile.clone()).await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProfileInput>,
) -> AppResult<Json<Profile>> {
    let lang = state.sessions.read(id, |s| s.language).await?;
    let profile = input.into_profile(lang)?;
    let profile = state
        .sessions
        .update(id, |s| {
            s.update_profile(profile);
            s.profile.clone()
        })
        .await?;
    tracing::debug!(session_id = %id, "Profile updated");
    Ok(Json(profile))
}

pub async fn set_language(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SetLanguageRequest>,
) -> AppResult<Json<SessionSummary>> {
    let summary = state
        .sessions
        .update(id, |s| {
            if s.set_language(input.language) {
                tracing::debug!(session_id = %id, language = %input.language, "Language changed");
            }
            s.summary()
        })
        .await?;
    Ok(Json(summary))
}

/// Adopt a recommended crop as the farmer's main crop
pub async fn select_crop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SelectCropRequest>,
) -> AppResult<Json<CropSelectedResponse>> {
    input.validate()?;
    if input.crop_name.trim().is_empty() {
        return Err(AppError::invalid("cropName", "Crop name is required"));
    }

    let response = state
        .sessions
        .update(id, |s| {
            let message = s.select_crop(&input.crop_name);
            CropSelectedResponse {
                profile: s.profile.clone(),
                active_crops: s.active_crops,
                message,
            }
        })
        .await?;
    tracing::info!(session_id = %id, crop = %response.profile.crop, "Crop selected");
    Ok(Json(response))
}
