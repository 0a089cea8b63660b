//! Crop recommendation model

use serde::{Deserialize, Serialize};

use crate::types::Suitability;

/// A model-produced suitability record for one crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub crop_name: String,
    pub suitability: Suitability,
    #[serde(rename = "yield")]
    pub expected_yield: String,
    /// Harvest duration, always stating a number of days
    pub duration: String,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub planting_tips: Vec<String>,
}
