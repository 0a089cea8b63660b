//! Validation utilities for Krishi Sakhi forms
//!
//! Mirrors the checks the onboarding wizard, profile editor, chat box and
//! soil form perform before anything is sent to the model.

use serde::Serialize;

use crate::i18n;
use crate::models::{Profile, SoilData};

// ============================================================================
// Profile Validations
// ============================================================================

/// Validate the farmer's name is present
pub fn validate_profile_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name is required");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate district is one of the Kerala districts
pub fn validate_district(district: &str) -> Result<(), &'static str> {
    if i18n::district_keys().any(|key| key.eq_ignore_ascii_case(district.trim())) {
        Ok(())
    } else {
        Err("District is not a recognized Kerala district")
    }
}

/// Validate a whole profile as submitted by onboarding or profile edit
pub fn validate_profile(profile: &Profile) -> Result<(), (&'static str, &'static str)> {
    validate_profile_name(&profile.name).map_err(|e| ("name", e))?;
    if let Some(email) = profile.email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(email).map_err(|e| ("email", e))?;
    }
    validate_district(&profile.district).map_err(|e| ("district", e))?;
    Ok(())
}

// ============================================================================
// Chat Validations
// ============================================================================

/// Image types the chat accepts for plant diagnosis
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// A message needs either text or an image
pub fn validate_chat_input(text: &str, has_image: bool) -> Result<(), &'static str> {
    if text.trim().is_empty() && !has_image {
        return Err("Message must contain text or an image");
    }
    Ok(())
}

pub fn validate_image_mime_type(mime_type: &str) -> Result<(), &'static str> {
    if SUPPORTED_IMAGE_TYPES.contains(&mime_type.trim().to_lowercase().as_str()) {
        Ok(())
    } else {
        Err("Unsupported image type; use PNG, JPEG or WebP")
    }
}

// ============================================================================
// Soil Validations
// ============================================================================

/// Non-blocking findings about a soil submission
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoilWarning {
    PhOutOfRange,
}

/// Soil readings are never rejected; only pH is sanity checked
pub fn soil_warnings(soil: &SoilData) -> Vec<SoilWarning> {
    let mut warnings = Vec::new();
    if soil.is_ph_out_of_range() {
        warnings.push(SoilWarning::PhOutOfRange);
    }
    warnings
}
