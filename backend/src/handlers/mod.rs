//! HTTP request handlers

mod chat;
mod dashboard;
mod health;
mod history;
mod session;
mod soil;

pub use chat::*;
pub use dashboard::*;
pub use health::*;
pub use history::*;
pub use session::*;
pub use soil::*;
