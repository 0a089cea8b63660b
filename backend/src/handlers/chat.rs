//! Chat handlers: transcript, buffered replies and server-sent-event replies

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{channel::mpsc, Stream, StreamExt};
use std::convert::Infallible;
use uuid::Uuid;

use shared::Message;

use crate::error::AppResult;
use crate::services::chat::{ChatEvent, ChatReply, ChatService, SendMessageInput};
use crate::AppState;

fn chat_service(state: &AppState) -> ChatService {
    ChatService::new(state.model.clone(), state.sessions.clone())
}

pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Message>>> {
    let messages = state.sessions.read(id, |s| s.messages.clone()).await?;
    Ok(Json(messages))
}

/// Send a message and return the complete reply
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SendMessageInput>,
) -> AppResult<Json<ChatReply>> {
    let reply = chat_service(&state).send_message(id, input).await?;
    Ok(Json(reply))
}

fn to_sse(event: ChatEvent) -> Result<Event, Infallible> {
    let sse = Event::default()
        .event(event.name())
        .json_data(&event)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()));
    Ok(sse)
}

/// Send a message and stream the reply as it is generated.
///
/// Validation and busy-session errors are returned as normal HTTP errors;
/// once streaming starts, failures arrive as an `error` event.
pub async fn stream_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SendMessageInput>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let turn = chat_service(&state).begin(id, input).await?;

    let (tx, rx) = mpsc::unbounded();
    tokio::spawn(async move {
        let result = turn
            .run(|event| {
                // The client may have gone away; the turn still completes
                let _ = tx.unbounded_send(event);
            })
            .await;
        if let Err(e) = result {
            tracing::error!(session_id = %id, "Chat stream ended abnormally: {}", e);
        }
    });

    Ok(Sse::new(rx.map(to_sse)).keep_alive(KeepAlive::default()))
}
