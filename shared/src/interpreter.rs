//! Streaming chat response interpreter
//!
//! A chat reply arrives as text fragments. The assistant is instructed to
//! answer "add a task" requests with a bare JSON object:
//!
//! ```json
//! {"action": "addTask", "task": {"text": "...", "priority": "medium", "time": "Anytime"}}
//! ```
//!
//! Each fragment is appended to the buffer. Whenever the buffer (trimmed)
//! starts with `{` a full JSON parse is attempted; once it yields a
//! recognized tool-call the reply is a command, not display text, and the
//! stream should stop. Anything else is displayed as it accumulates.
//!
//! A reply that starts with `{` but never parses falls back to plain text,
//! and JSON surrounded by prose is never recognized.

use serde::Serialize;
use serde_json::Value;

use crate::i18n;
use crate::models::AiTask;
use crate::types::Language;

const ADD_TASK_ACTION: &str = "addTask";

/// A structured command recognized in a chat reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "task", rename_all = "camelCase")]
pub enum ToolCall {
    AddTask(AiTask),
}

/// What the caller should do after feeding a fragment
#[derive(Debug, PartialEq, Eq)]
pub enum StreamStep<'a> {
    /// Show the accumulated text so far
    Display(&'a str),
    /// The reply is a command; stop reading the stream
    ToolCall(&'a ToolCall),
}

/// Final interpretation of a chat reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    ToolCall {
        call: ToolCall,
        /// The JSON exactly as the model produced it
        raw: String,
        /// Localized confirmation to show and speak instead of the JSON
        confirmation: String,
    },
    Text {
        text: String,
    },
}

impl ChatOutcome {
    /// Text to place in the AI message bubble
    pub fn display_text(&self) -> &str {
        match self {
            ChatOutcome::ToolCall { confirmation, .. } => confirmation,
            ChatOutcome::Text { text } => text,
        }
    }

    /// Text to hand to speech synthesis, if any
    pub fn speech_text(&self) -> Option<&str> {
        match self {
            ChatOutcome::ToolCall { confirmation, .. } => Some(confirmation),
            ChatOutcome::Text { text } if !text.trim().is_empty() => Some(text),
            ChatOutcome::Text { .. } => None,
        }
    }

    /// Raw model text, as it should be kept in the conversation history
    pub fn model_text(&self) -> &str {
        match self {
            ChatOutcome::ToolCall { raw, .. } => raw,
            ChatOutcome::Text { text } => text,
        }
    }
}

/// Try to read the whole text as a tool-call
pub fn detect_tool_call(text: &str) -> Option<ToolCall> {
    if !text.trim_start().starts_with('{') {
        return None;
    }
    let value: Value = serde_json::from_str(text).ok()?;
    if value.get("action").and_then(Value::as_str) != Some(ADD_TASK_ACTION) {
        return None;
    }
    let task = value.get("task").filter(|t| t.is_object())?;
    serde_json::from_value::<AiTask>(task.clone())
        .ok()
        .map(ToolCall::AddTask)
}

/// Accumulates fragments of one reply
#[derive(Debug, Default)]
pub struct ChatResponseInterpreter {
    text: String,
    tool_call: Option<ToolCall>,
}

impl ChatResponseInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next fragment.
    ///
    /// After a tool-call has been recognized further fragments are ignored
    /// and the same tool-call is reported again.
    pub fn push(&mut self, fragment: &str) -> StreamStep<'_> {
        if self.tool_call.is_none() {
            self.text.push_str(fragment);
            self.tool_call = detect_tool_call(&self.text);
        }
        match &self.tool_call {
            Some(call) => StreamStep::ToolCall(call),
            None => StreamStep::Display(&self.text),
        }
    }

    pub fn is_tool_call(&self) -> bool {
        self.tool_call.is_some()
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn finish(self, lang: Language) -> ChatOutcome {
        match self.tool_call {
            Some(call) => {
                let confirmation = match &call {
                    ToolCall::AddTask(task) => i18n::task_confirmation(lang, task),
                };
                ChatOutcome::ToolCall {
                    call,
                    raw: self.text,
                    confirmation,
                }
            }
            None => ChatOutcome::Text { text: self.text },
        }
    }
}
