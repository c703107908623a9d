//! HTTP request handlers for the REST API.

pub mod config;
pub mod conversation;
pub mod message;

use parley_types::chat::ConversationId;

use crate::http::error::AppError;

/// Parse a conversation id from a path parameter, returning a 400 on bad input.
pub(crate) fn parse_conversation_id(raw: &str) -> Result<ConversationId, AppError> {
    raw.parse::<ConversationId>().map_err(AppError::Validation)
}
