//! Chat with the assistant
//!
//! A turn is split in two: [`ChatService::begin`] validates the message,
//! records it and claims the session's single chat slot; [`PendingTurn::run`]
//! streams the reply through the tool-call interpreter, reporting progress
//! through a callback so the same code serves buffered and SSE responses.

use base64::Engine;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use shared::i18n;
use shared::{
    validate_chat_input, validate_image_mime_type, ChatOutcome, ChatResponseInterpreter, Language,
    Message, StreamStep, Task, ToolCall,
};

use super::prompts;
use super::session::{FarmSession, SessionStore};
use crate::error::{AppError, AppResult};
use crate::external::{Content, LanguageModel, Part};

/// Photo attached to a chat message
#[derive(Debug, Clone, Deserialize)]
pub struct ImageInput {
    pub mime_type: String,
    /// Base64 without the `data:` prefix
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageInput {
    #[serde(default)]
    pub text: String,
    pub image: Option<ImageInput>,
}

/// Progress of a reply
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Display text so far
    Delta { text: String },
    TaskAdded { task: Task },
    Done {
        message: Message,
        #[serde(skip_serializing_if = "Option::is_none")]
        speech: Option<String>,
    },
    /// The turn failed; `message` is the localized text shown instead
    Error { code: String, message: String },
}

impl ChatEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::Delta { .. } => "delta",
            ChatEvent::TaskAdded { .. } => "task_added",
            ChatEvent::Done { .. } => "done",
            ChatEvent::Error { .. } => "error",
        }
    }
}

/// Final result of a turn
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    /// The AI message as it ends up in the transcript
    pub message: Message,
    /// Task created by an addTask reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    /// Text to speak, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech: Option<String>,
    pub failed: bool,
}

#[derive(Clone)]
pub struct ChatService {
    model: Arc<dyn LanguageModel>,
    sessions: SessionStore,
}

/// A claimed turn waiting for the model.
///
/// Dropping it before the reply completes (a disconnected client, a
/// cancelled request) releases the session's chat slot.
pub struct PendingTurn {
    model: Arc<dyn LanguageModel>,
    sessions: SessionStore,
    session_id: Uuid,
    language: Language,
    revision: u64,
    system_instruction: String,
    contents: Vec<Content>,
    /// Index of the AI message being streamed into
    placeholder: Option<usize>,
    finished: bool,
}

fn validate(input: &SendMessageInput) -> AppResult<()> {
    validate_chat_input(&input.text, input.image.is_some())
        .map_err(|e| AppError::invalid("text", e))?;
    if let Some(image) = &input.image {
        validate_image_mime_type(&image.mime_type).map_err(|e| AppError::invalid("image.mime_type", e))?;
        base64::engine::general_purpose::STANDARD
            .decode(image.data.trim())
            .map_err(|_| AppError::invalid("image.data", "Image data must be valid base64"))?;
    }
    Ok(())
}

/// Turn content for the model; an image without text gets the stock prompt
fn user_content(input: &SendMessageInput, language: Language) -> Content {
    match &input.image {
        Some(image) => {
            let prompt = match input.text.trim() {
                "" => i18n::catalog(language).chat_image_prompt,
                text => text,
            };
            Content::user(vec![
                Part::text(prompt),
                Part::inline(image.mime_type.trim().to_lowercase(), image.data.trim()),
            ])
        }
        None => Content::user(vec![Part::text(input.text.clone())]),
    }
}

impl ChatService {
    pub fn new(model: Arc<dyn LanguageModel>, sessions: SessionStore) -> Self {
        Self { model, sessions }
    }

    /// Validate and record the farmer's message, claiming the chat slot.
    ///
    /// Fails with `Conflict` while another reply is still streaming.
    pub async fn begin(&self, id: Uuid, input: SendMessageInput) -> AppResult<PendingTurn> {
        validate(&input)?;

        let turn = self
            .sessions
            .update(id, |session| {
                if session.chat_in_flight {
                    return Err(AppError::Conflict(
                        "A reply is still being generated".to_string(),
                    ));
                }
                session.chat_in_flight = true;

                let image_url = input
                    .image
                    .as_ref()
                    .map(|img| format!("data:{};base64,{}", img.mime_type.trim(), img.data.trim()));
                session.messages.push(Message::user(input.text.clone(), image_url));

                let mut contents = session.chat_history.clone();
                contents.push(user_content(&input, session.language));

                Ok(PendingTurn {
                    model: self.model.clone(),
                    sessions: self.sessions.clone(),
                    session_id: id,
                    language: session.language,
                    revision: session.revision,
                    system_instruction: prompts::system_instruction(&session.profile, session.language),
                    contents,
                    placeholder: None,
                    finished: false,
                })
            })
            .await??;

        tracing::debug!(session_id = %id, turns = turn.contents.len(), "Chat turn started");
        Ok(turn)
    }

    /// Send a message and wait for the whole reply
    pub async fn send_message(&self, id: Uuid, input: SendMessageInput) -> AppResult<ChatReply> {
        self.begin(id, input).await?.run(|_| {}).await
    }
}

impl PendingTurn {
    /// Stream the reply, calling `on_event` as it progresses.
    ///
    /// Model failures do not fail the call: the localized error message is
    /// appended to the transcript and returned with `failed` set.
    pub async fn run(mut self, mut on_event: impl FnMut(ChatEvent) + Send) -> AppResult<ChatReply> {
        let id = self.session_id;
        let revision = self.revision;

        let mut stream = match self
            .model
            .stream_chat(&self.system_instruction, self.contents.clone())
            .await
        {
            Ok(stream) => stream,
            Err(e) => return self.fail(e, &mut on_event).await,
        };

        // Placeholder the streamed text is written into
        let placeholder = self
            .sessions
            .update(id, |session| {
                (session.revision == revision).then(|| {
                    session.messages.push(Message::ai(""));
                    session.messages.len() - 1
                })
            })
            .await?;
        self.placeholder = placeholder;

        let mut interpreter = ChatResponseInterpreter::new();
        while let Some(item) = stream.next().await {
            let fragment = match item {
                Ok(fragment) => fragment,
                Err(e) => return self.fail(e, &mut on_event).await,
            };
            let display = match interpreter.push(&fragment) {
                StreamStep::Display(text) => text.to_string(),
                StreamStep::ToolCall(_) => break,
            };
            self.sessions
                .update(id, |session| {
                    if session.revision != revision {
                        return;
                    }
                    if let Some(message) = placeholder.and_then(|i| session.messages.get_mut(i)) {
                        message.text = display.clone();
                    }
                })
                .await?;
            on_event(ChatEvent::Delta { text: display });
        }
        drop(stream);

        let outcome = interpreter.finish(self.language);
        let user_turn = self.contents.last().cloned();

        let (message, task) = self
            .sessions
            .update(id, |session| {
                let task = match &outcome {
                    ChatOutcome::ToolCall {
                        call: ToolCall::AddTask(task),
                        ..
                    } => Some(session.tasks.prepend(task.clone())),
                    ChatOutcome::Text { .. } => None,
                };

                let mut message = Message::ai(outcome.display_text());
                if session.revision == revision {
                    if let Some(slot) = placeholder.and_then(|i| session.messages.get_mut(i)) {
                        slot.text = outcome.display_text().to_string();
                        message = slot.clone();
                    }
                    if let Some(user_turn) = user_turn {
                        session.chat_history.push(user_turn);
                        session.chat_history.push(Content::model_text(outcome.model_text()));
                    }
                }
                session.chat_in_flight = false;
                (message, task)
            })
            .await?;
        self.finished = true;

        if let Some(task) = &task {
            tracing::info!(session_id = %id, task_id = %task.id, "Task added from chat");
            on_event(ChatEvent::TaskAdded { task: task.clone() });
        }

        let speech = outcome.speech_text().map(str::to_string);
        on_event(ChatEvent::Done {
            message: message.clone(),
            speech: speech.clone(),
        });

        Ok(ChatReply {
            message,
            task,
            speech,
            failed: false,
        })
    }

    /// Record a failed turn and release the chat slot
    async fn fail(
        &mut self,
        error: AppError,
        on_event: &mut (impl FnMut(ChatEvent) + Send),
    ) -> AppResult<ChatReply> {
        tracing::error!(session_id = %self.session_id, "Error sending message: {}", error);

        let catalog = i18n::catalog(self.language);
        let text = match error {
            AppError::Configuration(_) => catalog.error_chat_init_retry,
            _ => catalog.error_send_message,
        };
        let message = Message::ai(text);

        let revision = self.revision;
        self.sessions
            .update(self.session_id, |session| {
                if session.revision == revision {
                    session.messages.push(message.clone());
                }
                session.chat_in_flight = false;
            })
            .await?;
        self.finished = true;

        on_event(ChatEvent::Error {
            code: error.code(),
            message: text.to_string(),
        });

        Ok(ChatReply {
            message,
            task: None,
            speech: None,
            failed: true,
        })
    }
}

impl Drop for PendingTurn {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let id = self.session_id;
        tracing::warn!(session_id = %id, "Chat turn abandoned; releasing the chat slot");

        let (revision, placeholder) = (self.revision, self.placeholder);
        let error_text = i18n::catalog(self.language).error_send_message;
        let release = move |session: &mut FarmSession| {
            if session.revision == revision {
                // An empty bubble would never be filled in
                if let Some(message) = placeholder.and_then(|i| session.messages.get_mut(i)) {
                    if message.text.is_empty() {
                        message.text = error_text.to_string();
                    }
                }
            }
            session.chat_in_flight = false;
        };

        if self.sessions.try_update(id, release).is_none() {
            // Lock is busy; finish the release on the runtime
            let sessions = self.sessions.clone();
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    let _ = sessions.update(id, release).await;
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str, image: Option<(&str, &str)>) -> SendMessageInput {
        SendMessageInput {
            text: text.to_string(),
            image: image.map(|(mime_type, data)| ImageInput {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
        }
    }

    #[test]
    fn test_blank_message_without_image_is_rejected() {
        assert!(validate(&input("   ", None)).is_err());
        assert!(validate(&input("", Some(("image/png", "iVBORw0KGgo=")))).is_ok());
    }

    #[test]
    fn test_image_checks() {
        assert!(validate(&input("", Some(("image/gif", "R0lGOD==")))).is_err());
        assert!(validate(&input("", Some(("image/jpeg", "not base64!")))).is_err());
    }

    #[test]
    fn test_image_only_message_uses_stock_prompt() {
        let content = user_content(&input("  ", Some(("image/webp", "UklGRg=="))), Language::Ml);
        assert_eq!(
            content.parts[0].text.as_deref(),
            Some(i18n::catalog(Language::Ml).chat_image_prompt)
        );
        assert_eq!(
            content.parts[1].inline_data.as_ref().map(|d| d.mime_type.as_str()),
            Some("image/webp")
        );
    }

    #[test]
    fn test_event_wire_shape() {
        let event = ChatEvent::Delta {
            text: "Water".to_string(),
        };
        assert_eq!(event.name(), "delta");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "delta");
        assert_eq!(value["text"], "Water");
    }
}
