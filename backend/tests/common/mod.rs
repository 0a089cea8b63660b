//! Shared fixtures for integration tests: a scripted language model and
//! ready-made application state.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use krishi_server::config::Config;
use krishi_server::error::{AppError, AppResult};
use krishi_server::external::{Content, LanguageModel, TextStream};
use krishi_server::services::HistoryStore;
use krishi_server::AppState;
use shared::Profile;

/// Which structured call a schema belongs to
pub fn kind_of(schema: &Value) -> &'static str {
    let properties = &schema["properties"];
    if properties.get("tasks").is_some() {
        "daily"
    } else if properties.get("day1").is_some() {
        "weekly"
    } else if properties.get("title").is_some() {
        "advice"
    } else if properties.get("cropName").is_some() {
        "market"
    } else if properties.get("recommendations").is_some() {
        "soil"
    } else {
        "unknown"
    }
}

/// How one chat call behaves
pub enum ChatScript {
    /// Stream these fragments
    Reply(Vec<&'static str>),
    /// `stream_chat` itself fails with this error
    FailToStart(fn() -> AppError),
    /// Stream the fragments, then fail
    FailMidStream(Vec<&'static str>),
    /// Stream the fragments, then never finish
    Stall(Vec<&'static str>),
}

/// Language model double with canned answers.
///
/// Structured calls answer from `answers` by kind; a kind without an answer
/// fails like a network error. Chat calls consume `chats` in order.
#[derive(Default)]
pub struct ScriptedModel {
    answers: Mutex<HashMap<&'static str, String>>,
    chats: Mutex<VecDeque<ChatScript>>,
    pub json_calls: Mutex<Vec<(&'static str, String)>>,
    pub chat_calls: Mutex<Vec<(String, Vec<Content>)>>,
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn answer(&self, kind: &'static str, raw: impl Into<String>) {
        self.answers.lock().unwrap().insert(kind, raw.into());
    }

    pub fn chat(&self, script: ChatScript) {
        self.chats.lock().unwrap().push_back(script);
    }

    pub fn json_call_count(&self, kind: &str) -> usize {
        self.json_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub fn last_prompt(&self, kind: &str) -> Option<String> {
        self.json_calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, prompt)| prompt.clone())
    }

    /// Answers for a full dashboard load
    pub fn with_dashboard_answers(&self) {
        self.answer(
            "daily",
            r#"{"tasks": [
                {"text": "Check field drainage", "time": "Morning", "priority": "high"},
                {"text": "Apply potash", "time": "After 4 PM", "priority": "medium"},
                {"text": "Inspect for stem borer", "time": "Evening", "priority": "low"}
            ]}"#,
        );
        self.answer(
            "advice",
            r#"{"title": "Monsoon care for rice", "advice": ["Keep bunds intact", "Drain standing water"]}"#,
        );
        self.answer(
            "market",
            r#"{"cropName": "Rice", "price": "₹2,300", "unit": "per quintal", "market": "Kuttanad", "trend": "Rising"}"#,
        );
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate_json(&self, prompt: &str, schema: &Value) -> AppResult<String> {
        let kind = kind_of(schema);
        self.json_calls
            .lock()
            .unwrap()
            .push((kind, prompt.to_string()));
        self.answers
            .lock()
            .unwrap()
            .get(kind)
            .cloned()
            .ok_or_else(|| AppError::ModelService("connection refused".to_string()))
    }

    async fn stream_chat(
        &self,
        system_instruction: &str,
        contents: Vec<Content>,
    ) -> AppResult<TextStream> {
        self.chat_calls
            .lock()
            .unwrap()
            .push((system_instruction.to_string(), contents));
        let script = self
            .chats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ChatScript::Reply(vec![]));
        match script {
            ChatScript::Reply(fragments) => {
                Ok(stream::iter(fragments.into_iter().map(|f| Ok(f.to_string()))).boxed())
            }
            ChatScript::FailToStart(error) => Err(error()),
            ChatScript::FailMidStream(fragments) => {
                let items: Vec<AppResult<String>> = fragments
                    .into_iter()
                    .map(|f| Ok(f.to_string()))
                    .chain(std::iter::once(Err(AppError::ModelService(
                        "stream reset".to_string(),
                    ))))
                    .collect();
                Ok(stream::iter(items).boxed())
            }
            ChatScript::Stall(fragments) => Ok(stream::iter(fragments.into_iter().map(|f| Ok(f.to_string())))
                .chain(stream::pending::<AppResult<String>>())
                .boxed()),
        }
    }
}

/// Fresh history file path under the system temp dir
pub fn temp_history_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("krishi-sakhi-test-{}", uuid::Uuid::new_v4()))
        .join("history.json")
}

pub async fn test_state(model: Arc<ScriptedModel>) -> AppState {
    let history = HistoryStore::open(temp_history_path()).await;
    AppState::new(Config::default(), model, history)
}

pub fn farmer(crop: &str) -> Profile {
    Profile {
        name: "Anitha".to_string(),
        district: "Alappuzha".to_string(),
        crop: crop.to_string(),
        ..Profile::default()
    }
}
