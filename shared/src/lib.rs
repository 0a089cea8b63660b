//! Shared types and models for the Krishi Sakhi farm advisory platform
//!
//! This crate contains types shared between the backend, the browser client
//! (via WASM), and the chat response interpreter used by both.

pub mod i18n;
pub mod interpreter;
pub mod models;
pub mod types;
pub mod validation;

pub use interpreter::*;
pub use models::*;
pub use types::*;
pub use validation::*;
