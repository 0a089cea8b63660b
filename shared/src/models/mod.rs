//! Domain models for the Krishi Sakhi platform

mod advice;
mod analysis;
mod chat;
mod profile;
mod recommendation;
mod soil;
mod task;

pub use advice::*;
pub use analysis::*;
pub use chat::*;
pub use profile::*;
pub use recommendation::*;
pub use soil::*;
pub use task::*;
