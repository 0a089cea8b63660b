//! Soil analysis history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CropRecommendation, SoilData};

/// Storage key under which the browser keeps the serialized history
pub const HISTORY_STORAGE_KEY: &str = "krishi-sakhi-history";

/// Snapshot of one soil submission and the recommendations it produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub soil_data: SoilData,
    pub recommendations: Vec<CropRecommendation>,
}

impl AnalysisRecord {
    pub fn new(soil_data: SoilData, recommendations: Vec<CropRecommendation>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            soil_data,
            recommendations,
        }
    }
}

/// Newest-first list of analysis records
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AnalysisHistory {
    records: Vec<AnalysisRecord>,
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stored JSON array.
    ///
    /// Anything that is not a JSON array yields an empty history; array
    /// entries that do not have the record shape are dropped.
    pub fn from_json_lenient(raw: &str) -> Self {
        let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
            Ok(values) => values,
            Err(_) => return Self::default(),
        };
        let records = values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
        Self { records }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.records)
    }

    pub fn prepend(&mut self, record: AnalysisRecord) {
        self.records.insert(0, record);
    }

    pub fn find(&self, id: &str) -> Option<&AnalysisRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
