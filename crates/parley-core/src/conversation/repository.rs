//! ConversationRepository trait definition.
//!
//! Provides CRUD for conversations and append-only message storage.

use parley_types::chat::{ChatMessage, ChatRole, Conversation, ConversationId};
use parley_types::error::RepositoryError;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in parley-infra (e.g., `SqliteConversationRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ConversationRepository: Send + Sync {
    /// Insert a new conversation. `created_at` and `updated_at` are both set
    /// to the insertion time and the id is assigned by the store.
    fn create_conversation(
        &self,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by id.
    fn get_conversation(
        &self,
        id: ConversationId,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List all conversations, most recently active (updated_at DESC) first.
    fn list_conversations(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Change the title and refresh `updated_at`. Returns false if no row matched.
    fn rename_conversation(
        &self,
        id: ConversationId,
        title: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete a conversation and, by cascade, all of its messages.
    /// Returns false if no row matched.
    fn delete_conversation(
        &self,
        id: ConversationId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Append a message and bump the parent's `updated_at` to the message's
    /// `created_at`. Both writes commit together or not at all.
    fn append_message(
        &self,
        conversation_id: ConversationId,
        role: ChatRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Get messages ordered by (created_at, id) ascending.
    ///
    /// A limit keeps the EARLIEST `limit` messages; callers wanting the most
    /// recent ones fetch everything and take a suffix.
    fn list_messages(
        &self,
        conversation_id: ConversationId,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Count all conversations.
    fn count_conversations(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count all messages across conversations.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
