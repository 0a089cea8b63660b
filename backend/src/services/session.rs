//! Per-farmer session state
//!
//! A session is everything one logged-in farmer sees: profile, language,
//! task list, chat transcript and the cached dashboard cards. Sessions live
//! in memory only and disappear at logout.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::i18n;
use shared::{DashboardAdvice, Language, MarketPrice, Message, Profile, TaskList, WeeklyTasks};

use crate::error::{AppError, AppResult};
use crate::external::Content;

/// State of one logged-in farmer
#[derive(Debug, Clone)]
pub struct FarmSession {
    pub id: Uuid,
    pub profile: Profile,
    pub language: Language,
    pub tasks: TaskList,
    /// Chat transcript as displayed
    pub messages: Vec<Message>,
    /// Conversation turns sent back to the model
    pub chat_history: Vec<Content>,
    pub active_crops: u32,
    pub advice: Option<DashboardAdvice>,
    pub market_price: Option<MarketPrice>,
    pub weekly_tasks: Option<WeeklyTasks>,
    /// Revision today's tasks were last generated for
    pub tasks_loaded_revision: Option<u64>,
    /// Revision the advice and market price cards were last loaded for
    pub dashboard_loaded_revision: Option<u64>,
    pub weekly_loaded_revision: Option<u64>,
    /// Bumped whenever profile or language change; results computed for an
    /// older revision are discarded
    pub revision: u64,
    pub chat_in_flight: bool,
    pub created_at: DateTime<Utc>,
}

/// Session overview returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub profile: Profile,
    pub language: Language,
    pub active_crops: u32,
    pub task_count: usize,
    pub pending_tasks: usize,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
}

impl FarmSession {
    pub fn new(profile: Profile, language: Language) -> Self {
        let active_crops = u32::from(profile.has_crop());
        Self {
            id: Uuid::new_v4(),
            profile,
            language,
            tasks: TaskList::new(),
            messages: vec![Self::greeting(language)],
            chat_history: Vec::new(),
            active_crops,
            advice: None,
            market_price: None,
            weekly_tasks: None,
            tasks_loaded_revision: None,
            dashboard_loaded_revision: None,
            weekly_loaded_revision: None,
            revision: 0,
            chat_in_flight: false,
            created_at: Utc::now(),
        }
    }

    fn greeting(language: Language) -> Message {
        Message::ai(i18n::catalog(language).chat_initial_message)
    }

    /// Switch language. The transcript restarts with the localized greeting
    /// and the model conversation starts over. Returns false if unchanged.
    pub fn set_language(&mut self, language: Language) -> bool {
        if self.language == language {
            return false;
        }
        self.language = language;
        self.messages = vec![Self::greeting(language)];
        self.chat_history.clear();
        self.revision += 1;
        true
    }

    /// Replace the profile; the model conversation restarts with the new
    /// profile in its instruction
    pub fn update_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.chat_history.clear();
        self.revision += 1;
    }

    /// Adopt a recommended crop as the main crop
    pub fn select_crop(&mut self, crop: &str) -> String {
        let crop = crop.trim();
        self.update_profile(Profile {
            crop: crop.to_string(),
            ..self.profile.clone()
        });
        self.active_crops = 1;
        i18n::crop_selected(self.language, crop)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            profile: self.profile.clone(),
            language: self.language,
            active_crops: self.active_crops,
            task_count: self.tasks.len(),
            pending_tasks: self.tasks.pending_count(),
            message_count: self.messages.len(),
            created_at: self.created_at,
        }
    }
}

/// In-memory session registry shared by all handlers
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, FarmSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Onboarding: open a session for a new profile
    pub async fn create(&self, profile: Profile, language: Language) -> FarmSession {
        let session = FarmSession::new(profile, language);
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        tracing::info!(session_id = %session.id, language = %language, "Session created");
        session
    }

    /// Logout
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| tracing::info!(session_id = %id, "Session closed"))
            .ok_or(AppError::SessionNotFound)
    }

    /// Run `f` against a session without modifying it
    pub async fn read<T>(&self, id: Uuid, f: impl FnOnce(&FarmSession) -> T) -> AppResult<T> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(f).ok_or(AppError::SessionNotFound)
    }

    /// Run `f` against a session with exclusive access
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut FarmSession) -> T) -> AppResult<T> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(f).ok_or(AppError::SessionNotFound)
    }

    /// Like [`update`](Self::update), but gives up instead of waiting when
    /// the store is locked. Usable outside async code.
    pub fn try_update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut FarmSession) -> T,
    ) -> Option<AppResult<T>> {
        let mut sessions = self.sessions.try_write().ok()?;
        Some(sessions.get_mut(&id).map(f).ok_or(AppError::SessionNotFound))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
