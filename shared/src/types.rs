//! Common types used across the platform

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a closed vocabulary value cannot be parsed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Supported languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ml,
    Ta,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ml, Language::Ta];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ml => "ml",
            Language::Ta => "ta",
        }
    }

    /// BCP 47 tag used for speech synthesis and recognition
    pub fn speech_locale(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Ml => "ml-IN",
            Language::Ta => "ta-IN",
        }
    }

    /// English name of the language, used inside model prompts
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ml => "Malayalam",
            Language::Ta => "Tamil",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ml" => Ok(Language::Ml),
            "ta" => Ok(Language::Ta),
            other => Err(UnknownVariant {
                kind: "language",
                value: other.to_string(),
            }),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Parse a priority leniently; anything unrecognized is `Medium`
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

// Model output is not trusted to stay inside the enum.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Priority::parse_lenient(&s)).unwrap_or_default())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// Direction of a market price movement
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    /// Anything outside `up | down | stable` collapses to `Stable`
    pub fn normalize(value: &str) -> Self {
        match value.trim() {
            "up" => Trend::Up,
            "down" => Trend::Down,
            _ => Trend::Stable,
        }
    }
}

impl<'de> Deserialize<'de> for Trend {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Trend::normalize(&s)).unwrap_or_default())
    }
}

/// Crop suitability tier
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Suitability {
    Best,
    Excellent,
    Good,
}

impl Suitability {
    /// Localized labels the model may answer with, per tier
    const BEST_LABELS: &'static [&'static str] = &[
        "Best",
        "മികച്ചത്",
        "ഏറ്റവും മികച്ചത്",
        "சிறந்தது",
        "மிகச் சிறந்தது",
    ];
    const GOOD_LABELS: &'static [&'static str] = &["Good", "നല്ലത്", "நல்லது"];

    /// Every label accepted in a response schema enum
    pub fn schema_labels() -> Vec<&'static str> {
        let mut labels = vec!["Best", "Excellent", "Good"];
        labels.extend(Self::BEST_LABELS.iter().skip(1));
        labels.extend(Self::GOOD_LABELS.iter().skip(1));
        labels
    }

    /// Normalize an English, Malayalam or Tamil tier label
    pub fn normalize(label: &str) -> Option<Self> {
        let label = label.trim();
        if Self::BEST_LABELS.contains(&label) {
            Some(Suitability::Best)
        } else if label == "Excellent" {
            Some(Suitability::Excellent)
        } else if Self::GOOD_LABELS.contains(&label) {
            Some(Suitability::Good)
        } else {
            None
        }
    }
}

impl<'de> Deserialize<'de> for Suitability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Suitability::normalize(&raw).ok_or_else(|| {
            serde::de::Error::custom(UnknownVariant {
                kind: "suitability",
                value: raw,
            })
        })
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suitability::Best => write!(f, "Best"),
            Suitability::Excellent => write!(f, "Excellent"),
            Suitability::Good => write!(f, "Good"),
        }
    }
}
