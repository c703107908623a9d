//! Message HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/conversations/{id}/messages - Full transcript, oldest first
//! - POST /api/v1/conversations/{id}/messages - Send a user message, get the reply

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use parley_types::chat::{AssistantReply, ChatMessage};

use super::parse_conversation_id;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
}

/// GET /api/v1/conversations/{id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_conversation_id(&id)?;
    let messages = state.conversation_service.messages(id).await?;
    Ok(Json(timer.respond(messages).with_link(
        "conversation",
        &format!("/api/v1/conversations/{id}"),
    )))
}

/// POST /api/v1/conversations/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<AssistantReply>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_conversation_id(&id)?;
    let reply = state.chat_service.send_message(id, &body.content).await?;
    Ok(Json(timer.respond(reply)))
}
