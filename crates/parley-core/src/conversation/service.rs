//! Conversation service: validation and not-found mapping over the repository.
//!
//! The repository speaks in `Option`/`bool`; this layer turns absent rows into
//! `ChatError::NotFound` so callers never have to.

use parley_types::chat::{
    ChatMessage, ChatRole, Conversation, ConversationId, DEFAULT_CONVERSATION_TITLE,
};
use parley_types::error::ChatError;
use tracing::{debug, info};

use crate::conversation::repository::ConversationRepository;

/// Manages conversation lifecycle and transcript reads.
///
/// Generic over `ConversationRepository` so parley-core never depends on
/// parley-infra.
pub struct ConversationService<C: ConversationRepository> {
    repo: C,
}

impl<C: ConversationRepository> ConversationService<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &C {
        &self.repo
    }

    /// Create a conversation. A missing or blank title becomes the default.
    pub async fn create(&self, title: Option<&str>) -> Result<Conversation, ChatError> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CONVERSATION_TITLE);

        let conversation = self.repo.create_conversation(title).await?;
        info!(conversation_id = %conversation.id, title = %conversation.title, "Conversation created");
        Ok(conversation)
    }

    pub async fn get(&self, id: ConversationId) -> Result<Conversation, ChatError> {
        self.repo
            .get_conversation(id)
            .await?
            .ok_or(ChatError::NotFound(id))
    }

    /// All conversations, most recently active first.
    pub async fn list(&self) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.repo.list_conversations().await?)
    }

    /// Rename a conversation and return it with the refreshed `updated_at`.
    pub async fn rename(&self, id: ConversationId, title: &str) -> Result<Conversation, ChatError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ChatError::Validation("title must not be empty".to_string()));
        }

        if !self.repo.rename_conversation(id, title).await? {
            return Err(ChatError::NotFound(id));
        }
        info!(conversation_id = %id, title, "Conversation renamed");
        self.get(id).await
    }

    /// Delete a conversation and its whole transcript.
    pub async fn delete(&self, id: ConversationId) -> Result<(), ChatError> {
        if !self.repo.delete_conversation(id).await? {
            return Err(ChatError::NotFound(id));
        }
        info!(conversation_id = %id, "Conversation deleted");
        Ok(())
    }

    /// Transcript of an existing conversation in chronological order.
    pub async fn messages(&self, id: ConversationId) -> Result<Vec<ChatMessage>, ChatError> {
        self.get(id).await?;
        Ok(self.repo.list_messages(id, None).await?)
    }

    /// Append one message. The caller has already checked the conversation exists.
    pub async fn append(
        &self,
        id: ConversationId,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage, ChatError> {
        let message = self.repo.append_message(id, role, content).await?;
        debug!(conversation_id = %id, message_id = message.id, role = %role, "Message appended");
        Ok(message)
    }

    pub async fn count_conversations(&self) -> Result<u64, ChatError> {
        Ok(self.repo.count_conversations().await?)
    }

    pub async fn count_messages(&self) -> Result<u64, ChatError> {
        Ok(self.repo.count_messages().await?)
    }
}
