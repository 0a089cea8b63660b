//! Business logic services for the Krishi Sakhi server

pub mod advisory;
pub mod analysis;
pub mod chat;
pub mod dashboard;
pub mod history;
pub mod prompts;
pub mod schemas;
pub mod session;

pub use advisory::AdvisoryService;
pub use analysis::SoilAnalysisService;
pub use chat::ChatService;
pub use dashboard::DashboardService;
pub use history::HistoryStore;
pub use session::SessionStore;
