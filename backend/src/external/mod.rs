//! External API integrations
//!
//! Everything the server knows about the generative model goes through the
//! [`LanguageModel`] port so services can be exercised without the network.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;

/// Fragments of a streamed reply, in arrival order
pub type TextStream = BoxStream<'static, AppResult<String>>;

/// Author of a conversation turn, as the model API names them
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
}

/// Inline binary payload (base64) such as an uploaded photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One part of a multi-part turn: text or inline data
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// A single conversation turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub role: ContentRole,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: ContentRole::User,
            parts,
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: ContentRole::Model,
            parts: vec![Part::text(text)],
        }
    }
}

/// Port to a generative language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Single-shot prompt whose answer must be JSON matching `schema`.
    /// Returns the raw response text; parsing is the caller's concern.
    async fn generate_json(&self, prompt: &str, schema: &Value) -> AppResult<String>;

    /// Multi-turn chat with a system instruction, streamed as text fragments
    async fn stream_chat(
        &self,
        system_instruction: &str,
        contents: Vec<Content>,
    ) -> AppResult<TextStream>;
}
