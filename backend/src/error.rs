//! Error handling for the Krishi Sakhi server
//!
//! Provides consistent JSON error responses. Where the farmer's language is
//! known the error carries a localized message alongside the English one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_local: Option<String>,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Session not found")]
    SessionNotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    // External service errors
    #[error("Model service error: {0}")]
    ModelService(String),

    #[error("Malformed model response: {0}")]
    ModelResponse(String),

    #[error("Crop recommendation failed")]
    RecommendationFailed { message_local: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Validation failure on a named field
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
            message_local: None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_local: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message_en: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message_en: message_en.into(),
            message_local: None,
            field: None,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::SessionNotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ModelService(_)
            | AppError::ModelResponse(_)
            | AppError::RecommendationFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::StorageError(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Validation {
                field,
                message,
                message_local,
            } => ErrorDetail {
                field: Some(field.clone()),
                message_local: message_local.clone(),
                ..ErrorDetail::new("VALIDATION_ERROR", message.clone())
            },
            AppError::ValidationError(msg) => ErrorDetail::new("VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(resource) => {
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource))
            }
            AppError::SessionNotFound => ErrorDetail::new(
                "SESSION_NOT_FOUND",
                "Session not found. Please complete onboarding again.",
            ),
            AppError::Conflict(msg) => ErrorDetail::new("CONFLICT", msg.clone()),
            AppError::ModelService(msg) => {
                ErrorDetail::new("MODEL_SERVICE_ERROR", format!("Model service error: {}", msg))
            }
            AppError::ModelResponse(msg) => ErrorDetail::new(
                "MODEL_RESPONSE_ERROR",
                format!("The model returned an unexpected response: {}", msg),
            ),
            AppError::RecommendationFailed { message_local } => ErrorDetail {
                message_local: Some(message_local.clone()),
                ..ErrorDetail::new(
                    "RECOMMENDATION_FAILED",
                    "Failed to generate crop recommendations.",
                )
            },
            AppError::StorageError(msg) => {
                ErrorDetail::new("STORAGE_ERROR", format!("Storage error: {}", msg))
            }
            AppError::Configuration(msg) => {
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg))
            }
        }
    }

    /// Stable machine-readable code, also used for streamed error events
    pub fn code(&self) -> String {
        self.detail().code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_detail = self.detail();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
