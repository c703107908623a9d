//! Conversation and message types for Parley.
//!
//! A conversation owns an append-only transcript of user and assistant
//! messages. System messages are synthesized per model call and never
//! persisted, so the persisted role type has only two variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::llm::{FinishReason, MessageRole, Usage};

/// Title given to conversations created without one.
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Conversation";

/// Store-assigned conversation identifier.
///
/// Monotonically increasing and never reused (SQLite `AUTOINCREMENT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(ConversationId)
            .map_err(|_| format!("invalid conversation id: '{s}'"))
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        ConversationId(id)
    }
}

/// Role of a persisted message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ChatRole::User),
            "assistant" => Ok(ChatRole::Assistant),
            other => Err(format!("invalid chat role: '{other}'")),
        }
    }
}

impl From<ChatRole> for MessageRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => MessageRole::User,
            ChatRole::Assistant => MessageRole::Assistant,
        }
    }
}

/// A conversation between the user and the assistant.
///
/// `updated_at` is bumped on creation, rename, and every message append,
/// which makes it the sort key for "recent chats".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single persisted message within a conversation.
///
/// Messages are ordered by `created_at`, ties broken by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub conversation_id: ConversationId,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// The assistant's answer to one `send_message` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Id of the persisted assistant message.
    pub message_id: i64,
    pub role: ChatRole,
    pub content: String,
    pub model: String,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_role_roundtrip() {
        for role in [ChatRole::User, ChatRole::Assistant] {
            let s = role.to_string();
            let parsed: ChatRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_chat_role_rejects_system() {
        assert!("system".parse::<ChatRole>().is_err());
    }

    #[test]
    fn test_chat_role_into_message_role() {
        assert_eq!(MessageRole::from(ChatRole::User), MessageRole::User);
        assert_eq!(MessageRole::from(ChatRole::Assistant), MessageRole::Assistant);
    }

    #[test]
    fn test_conversation_id_parse() {
        assert_eq!("42".parse::<ConversationId>().unwrap(), ConversationId(42));
        assert!("abc".parse::<ConversationId>().is_err());
    }

    #[test]
    fn test_conversation_id_serializes_as_number() {
        let json = serde_json::to_string(&ConversationId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_chat_message_serialize() {
        let msg = ChatMessage {
            id: 1,
            conversation_id: ConversationId(3),
            role: ChatRole::Assistant,
            content: "Hello!".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
        assert!(json.contains("\"conversation_id\":3"));
    }
}
