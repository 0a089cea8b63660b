//! Farmer profile model

use serde::{Deserialize, Serialize};

/// District preselected in the onboarding form
pub const DEFAULT_DISTRICT: &str = "Alappuzha";

/// The farmer's self-reported identity and farm attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// District key (English name), localized for display
    pub district: String,
    #[serde(default)]
    pub land_size: String,
    /// Main crop; empty until one is chosen from a recommendation
    #[serde(default)]
    pub crop: String,
    #[serde(default)]
    pub soil_type: String,
    #[serde(default)]
    pub irrigation: String,
}

impl Profile {
    /// Whether a main crop has been selected yet
    pub fn has_crop(&self) -> bool {
        !self.crop.trim().is_empty()
    }
}

impl Default for Profile {
    /// Values the onboarding wizard starts from
    fn default() -> Self {
        Self {
            name: String::new(),
            email: None,
            district: DEFAULT_DISTRICT.to_string(),
            land_size: "2 acres".to_string(),
            crop: String::new(),
            soil_type: "Alluvial Soil".to_string(),
            irrigation: "Canal Irrigation".to_string(),
        }
    }
}
