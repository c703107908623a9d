//! Conversation CRUD HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/conversations      - List conversations, most recent first
//! - POST   /api/v1/conversations      - Create a conversation
//! - GET    /api/v1/conversations/{id} - Get a single conversation
//! - PUT    /api/v1/conversations/{id} - Rename a conversation
//! - DELETE /api/v1/conversations/{id} - Delete a conversation and its messages

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use parley_types::chat::Conversation;

use super::parse_conversation_id;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameConversationRequest {
    #[serde(default)]
    pub title: String,
}

/// GET /api/v1/conversations
pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, AppError> {
    let timer = RequestTimer::start();
    let conversations = state.conversation_service.list().await?;
    Ok(Json(
        timer
            .respond(conversations)
            .with_link("self", "/api/v1/conversations"),
    ))
}

/// POST /api/v1/conversations
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(body): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Conversation>>), AppError> {
    let timer = RequestTimer::start();
    let conversation = state
        .conversation_service
        .create(body.title.as_deref())
        .await?;
    let href = format!("/api/v1/conversations/{}", conversation.id);
    Ok((
        StatusCode::CREATED,
        Json(
            timer
                .respond(conversation)
                .with_link("self", &href)
                .with_link("messages", &format!("{href}/messages")),
        ),
    ))
}

/// GET /api/v1/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Conversation>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_conversation_id(&id)?;
    let conversation = state.conversation_service.get(id).await?;
    Ok(Json(timer.respond(conversation).with_link(
        "messages",
        &format!("/api/v1/conversations/{id}/messages"),
    )))
}

/// PUT /api/v1/conversations/{id}
pub async fn rename_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RenameConversationRequest>,
) -> Result<Json<ApiResponse<Conversation>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_conversation_id(&id)?;
    let conversation = state.conversation_service.rename(id, &body.title).await?;
    Ok(Json(timer.respond(conversation)))
}

/// DELETE /api/v1/conversations/{id}
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_conversation_id(&id)?;
    state.conversation_service.delete(id).await?;
    Ok(Json(
        timer.respond(serde_json::json!({ "deleted": true, "id": id })),
    ))
}
