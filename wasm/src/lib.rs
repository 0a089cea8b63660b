//! WebAssembly module for the Krishi Sakhi browser client
//!
//! Provides client-side logic shared with the server:
//! - Streaming chat reply interpretation (tool-call detection)
//! - Suitability and trend normalization
//! - Soil pH sanity checks
//! - Localized district names and speech locales
//! - Analysis history kept in `localStorage`

use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::i18n;
use shared::{
    soil_warnings, AnalysisHistory, AnalysisRecord, ChatOutcome, ChatResponseInterpreter,
    Language, SoilData, SoilWarning, StreamStep, Suitability, ToolCall, Trend, HISTORY_STORAGE_KEY,
};

fn parse_language(lang: &str) -> Result<Language, String> {
    lang.parse::<Language>().map_err(|e| e.to_string())
}

fn js_error(message: impl AsRef<str>) -> JsValue {
    JsValue::from_str(message.as_ref())
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StepView<'a> {
    Display { text: &'a str },
    ToolCall { call: &'a ToolCall },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeView<'a> {
    display: &'a str,
    speech: Option<&'a str>,
    model_text: &'a str,
    call: Option<&'a ToolCall>,
}

fn outcome_json(outcome: &ChatOutcome) -> Result<String, String> {
    let call = match outcome {
        ChatOutcome::ToolCall { call, .. } => Some(call),
        ChatOutcome::Text { .. } => None,
    };
    serde_json::to_string(&OutcomeView {
        display: outcome.display_text(),
        speech: outcome.speech_text(),
        model_text: outcome.model_text(),
        call,
    })
    .map_err(|e| e.to_string())
}

/// Interprets one streamed chat reply on the client
#[wasm_bindgen]
#[derive(Default)]
pub struct ChatStreamInterpreter {
    inner: ChatResponseInterpreter,
}

#[wasm_bindgen]
impl ChatStreamInterpreter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a fragment; returns `{"kind":"display","text":...}` or
    /// `{"kind":"tool_call","call":...}` as JSON.
    pub fn push(&mut self, fragment: &str) -> Result<String, JsValue> {
        let step = match self.inner.push(fragment) {
            StreamStep::Display(text) => StepView::Display { text },
            StreamStep::ToolCall(call) => StepView::ToolCall { call },
        };
        serde_json::to_string(&step).map_err(|e| js_error(e.to_string()))
    }

    #[wasm_bindgen(js_name = isToolCall)]
    pub fn is_tool_call(&self) -> bool {
        self.inner.is_tool_call()
    }

    /// Finish the reply; consumes the interpreter
    pub fn finish(self, lang: &str) -> Result<String, JsValue> {
        let lang = parse_language(lang).map_err(js_error)?;
        outcome_json(&self.inner.finish(lang)).map_err(js_error)
    }
}

// ============================================================================
// Normalization and soil checks
// ============================================================================

/// Canonical tier for a localized suitability label, if known
#[wasm_bindgen]
pub fn normalize_suitability(label: &str) -> Option<String> {
    Suitability::normalize(label).map(|s| s.to_string())
}

#[wasm_bindgen]
pub fn normalize_trend(value: &str) -> String {
    match Trend::normalize(value) {
        Trend::Up => "up",
        Trend::Down => "down",
        Trend::Stable => "stable",
    }
    .to_string()
}

#[wasm_bindgen]
pub fn is_ph_out_of_range(ph: &str) -> bool {
    SoilData {
        ph: ph.to_string(),
        ..SoilData::default()
    }
    .is_ph_out_of_range()
}

fn soil_warning_text(soil_json: &str, lang: Language) -> Result<Option<String>, String> {
    let soil: SoilData = serde_json::from_str(soil_json).map_err(|e| e.to_string())?;
    let warnings = soil_warnings(&soil);
    Ok(warnings
        .contains(&SoilWarning::PhOutOfRange)
        .then(|| i18n::catalog(lang).ph_warning.to_string()))
}

/// Localized warning for a soil submission, if any
#[wasm_bindgen]
pub fn soil_warning(soil_json: &str, lang: &str) -> Result<Option<String>, JsValue> {
    let lang = parse_language(lang).map_err(js_error)?;
    soil_warning_text(soil_json, lang).map_err(js_error)
}

// ============================================================================
// Localization
// ============================================================================

#[wasm_bindgen]
pub fn speech_locale(lang: &str) -> Result<String, JsValue> {
    let lang = parse_language(lang).map_err(js_error)?;
    Ok(lang.speech_locale().to_string())
}

#[wasm_bindgen]
pub fn district_name(lang: &str, key: &str) -> Result<String, JsValue> {
    let lang = parse_language(lang).map_err(js_error)?;
    Ok(i18n::district_name(lang, key))
}

// ============================================================================
// History storage
// ============================================================================

fn local_storage() -> Result<web_sys::Storage, JsValue> {
    web_sys::window()
        .ok_or_else(|| js_error("no window"))?
        .local_storage()?
        .ok_or_else(|| js_error("localStorage unavailable"))
}

fn read_history(storage: &web_sys::Storage) -> Result<AnalysisHistory, JsValue> {
    let history = match storage.get_item(HISTORY_STORAGE_KEY)? {
        Some(raw) => AnalysisHistory::from_json_lenient(&raw),
        None => AnalysisHistory::new(),
    };
    Ok(history)
}

/// Stored analysis history as a JSON array, newest first
#[wasm_bindgen]
pub fn load_history() -> Result<String, JsValue> {
    let history = read_history(&local_storage()?)?;
    history.to_json().map_err(|e| js_error(e.to_string()))
}

/// Prepend a record (JSON) to the stored history
#[wasm_bindgen]
pub fn save_history_record(record_json: &str) -> Result<(), JsValue> {
    let record: AnalysisRecord = serde_json::from_str(record_json)
        .map_err(|e| js_error(format!("Invalid record JSON: {}", e)))?;
    let storage = local_storage()?;
    let mut history = read_history(&storage)?;
    history.prepend(record);
    let raw = history.to_json().map_err(|e| js_error(e.to_string()))?;
    storage.set_item(HISTORY_STORAGE_KEY, &raw)
}

#[wasm_bindgen]
pub fn clear_history() -> Result<(), JsValue> {
    local_storage()?.remove_item(HISTORY_STORAGE_KEY)
}
