//! Dashboard loading
//!
//! Today's tasks, the advice card, the market price and the weekly plan are
//! independent model calls. Each is cached for the session revision it was
//! generated for; whichever a page needs and is stale gets loaded, the calls
//! run concurrently and each falls back on its own.

use futures::future::OptionFuture;
use serde::Serialize;
use uuid::Uuid;

use shared::{DashboardAdvice, Language, MarketPrice, Profile, Task, WeeklyTasks};

use super::advisory::AdvisoryService;
use super::session::{FarmSession, SessionStore};
use crate::error::AppResult;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub profile: Profile,
    pub language: Language,
    pub active_crops: u32,
    pub tasks: Vec<Task>,
    pub pending_tasks: usize,
    pub advice: Option<DashboardAdvice>,
    pub market_price: Option<MarketPrice>,
}

impl DashboardView {
    fn of(session: &FarmSession) -> Self {
        Self {
            profile: session.profile.clone(),
            language: session.language,
            active_crops: session.active_crops,
            tasks: session.tasks.as_slice().to_vec(),
            pending_tasks: session.tasks.pending_count(),
            advice: session.advice.clone(),
            market_price: session.market_price.clone(),
        }
    }
}

/// Today's list plus the seven-day plan
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingView {
    pub today: Vec<Task>,
    pub weekly: Option<WeeklyTasks>,
}

/// Cards a page shows besides today's tasks
#[derive(Debug, Clone, Copy)]
struct Wanted {
    cards: bool,
    weekly: bool,
}

/// What to load, with the inputs captured before the lock is released
struct LoadPlan {
    profile: Profile,
    language: Language,
    revision: u64,
    tasks: bool,
    cards: bool,
    weekly: bool,
}

impl LoadPlan {
    /// Decide what is stale. Without a crop there is nothing to advise on:
    /// the wanted cards are cleared once per revision and nothing loads.
    fn for_session(session: &mut FarmSession, refresh: bool, wanted: Wanted) -> Option<Self> {
        let current = Some(session.revision);

        if !session.profile.has_crop() {
            if session.tasks_loaded_revision != current {
                session.tasks.clear();
                session.tasks_loaded_revision = current;
            }
            if wanted.cards && session.dashboard_loaded_revision != current {
                session.advice = None;
                session.market_price = None;
                session.dashboard_loaded_revision = current;
            }
            if wanted.weekly {
                session.weekly_tasks = None;
                session.weekly_loaded_revision = current;
            }
            return None;
        }

        let tasks = refresh || session.tasks_loaded_revision != current;
        let cards = wanted.cards && (refresh || session.dashboard_loaded_revision != current);
        let weekly = wanted.weekly && (refresh || session.weekly_loaded_revision != current);

        (tasks || cards || weekly).then(|| LoadPlan {
            profile: session.profile.clone(),
            language: session.language,
            revision: session.revision,
            tasks,
            cards,
            weekly,
        })
    }
}

#[derive(Clone)]
pub struct DashboardService {
    advisory: AdvisoryService,
    sessions: SessionStore,
}

impl DashboardService {
    pub fn new(advisory: AdvisoryService, sessions: SessionStore) -> Self {
        Self { advisory, sessions }
    }

    /// Load the dashboard, calling the model for cards that are stale for
    /// the current profile and language, or for all of them on `refresh`
    pub async fn load(&self, id: Uuid, refresh: bool) -> AppResult<DashboardView> {
        self.sync(id, refresh, Wanted { cards: true, weekly: false })
            .await?;
        self.sessions.read(id, DashboardView::of).await
    }

    /// Today's tasks, generating them when stale
    pub async fn today(&self, id: Uuid, refresh: bool) -> AppResult<Vec<Task>> {
        self.sync(id, refresh, Wanted { cards: false, weekly: false })
            .await?;
        self.sessions
            .read(id, |session| session.tasks.as_slice().to_vec())
            .await
    }

    /// Today's tasks and the weekly plan, loading either when stale
    pub async fn upcoming(&self, id: Uuid, refresh: bool) -> AppResult<UpcomingView> {
        self.sync(id, refresh, Wanted { cards: false, weekly: true })
            .await?;
        self.sessions
            .read(id, |session| UpcomingView {
                today: session.tasks.as_slice().to_vec(),
                weekly: session.weekly_tasks.clone(),
            })
            .await
    }

    async fn sync(&self, id: Uuid, refresh: bool, wanted: Wanted) -> AppResult<()> {
        let plan = self
            .sessions
            .update(id, |session| LoadPlan::for_session(session, refresh, wanted))
            .await?;
        let Some(plan) = plan else {
            return Ok(());
        };

        tracing::debug!(
            session_id = %id,
            crop = %plan.profile.crop,
            tasks = plan.tasks,
            cards = plan.cards,
            weekly = plan.weekly,
            "Loading dashboard"
        );
        let advisory = &self.advisory;
        let (profile, lang) = (&plan.profile, plan.language);
        let (tasks, advice, market_price, weekly) = tokio::join!(
            OptionFuture::from(plan.tasks.then(|| advisory.daily_tasks(profile, lang))),
            OptionFuture::from(plan.cards.then(|| advisory.dashboard_advice(profile, lang))),
            OptionFuture::from(plan.cards.then(|| advisory.market_price(profile, lang))),
            OptionFuture::from(plan.weekly.then(|| advisory.weekly_tasks(profile, lang))),
        );

        self.sessions
            .update(id, |session| {
                if session.revision != plan.revision {
                    tracing::debug!(session_id = %id, "Discarding dashboard results for a stale profile");
                    return;
                }
                let loaded = Some(plan.revision);
                if let Some(tasks) = tasks {
                    session.tasks.replace_from_ai(tasks);
                    session.tasks_loaded_revision = loaded;
                }
                if let (Some(advice), Some(market_price)) = (advice, market_price) {
                    session.advice = advice;
                    session.market_price = market_price;
                    session.dashboard_loaded_revision = loaded;
                }
                if let Some(weekly) = weekly {
                    session.weekly_tasks = weekly;
                    session.weekly_loaded_revision = loaded;
                }
            })
            .await
    }
}
