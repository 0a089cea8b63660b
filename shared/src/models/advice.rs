//! Dashboard advice and market price models

use serde::{Deserialize, Serialize};

use crate::types::Trend;

/// Personalized tips shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardAdvice {
    pub title: String,
    pub advice: Vec<String>,
}

/// A single market price update for the farmer's main crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarketPrice {
    pub crop_name: String,
    /// Display price, e.g. "₹3,500"
    pub price: String,
    /// e.g. "per quintal"
    pub unit: String,
    pub market: String,
    #[serde(default)]
    pub trend: Trend,
}
