//! In-memory doubles of the core ports, shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

use parley_types::chat::{ChatMessage, ChatRole, Conversation, ConversationId};
use parley_types::config::ConfigEntry;
use parley_types::error::RepositoryError;
use parley_types::llm::{CompletionRequest, CompletionResponse, FinishReason, LlmError, Usage};

use crate::config::repository::ConfigRepository;
use crate::conversation::repository::ConversationRepository;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::{LlmProvider, ProviderFactory};

// ---------------------------------------------------------------------------
// Conversations
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ConversationState {
    conversations: Vec<Conversation>,
    messages: Vec<ChatMessage>,
    next_conversation_id: i64,
    next_message_id: i64,
    clock: Option<DateTime<Utc>>,
}

impl ConversationState {
    /// Strictly increasing fake clock so ordering assertions are deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = match self.clock {
            Some(prev) => prev + Duration::milliseconds(1),
            None => Utc::now(),
        };
        self.clock = Some(now);
        now
    }
}

#[derive(Default, Clone)]
pub struct InMemoryConversationRepository {
    state: Arc<Mutex<ConversationState>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_count(&self, id: ConversationId) -> usize {
        let state = self.state.lock().unwrap();
        state
            .messages
            .iter()
            .filter(|m| m.conversation_id == id)
            .count()
    }
}

impl ConversationRepository for InMemoryConversationRepository {
    async fn create_conversation(&self, title: &str) -> Result<Conversation, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        state.next_conversation_id += 1;
        let conversation = Conversation {
            id: ConversationId(state.next_conversation_id),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.conversations.iter().find(|c| c.id == id).cloned())
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut all = state.conversations.clone();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }

    async fn rename_conversation(
        &self,
        id: ConversationId,
        title: &str,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        match state.conversations.iter_mut().find(|c| c.id == id) {
            Some(conversation) => {
                conversation.title = title.to_string();
                conversation.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_conversation(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.conversations.len();
        state.conversations.retain(|c| c.id != id);
        if state.conversations.len() == before {
            return Ok(false);
        }
        state.messages.retain(|m| m.conversation_id != id);
        Ok(true)
    }

    async fn append_message(
        &self,
        conversation_id: ConversationId,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if !state.conversations.iter().any(|c| c.id == conversation_id) {
            return Err(RepositoryError::Query(
                "FOREIGN KEY constraint failed".to_string(),
            ));
        }
        let now = state.tick();
        state.next_message_id += 1;
        let message = ChatMessage {
            id: state.next_message_id,
            conversation_id,
            role,
            content: content.to_string(),
            created_at: now,
        };
        state.messages.push(message.clone());
        if let Some(conversation) = state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            conversation.updated_at = now;
        }
        Ok(message)
    }

    async fn list_messages(
        &self,
        conversation_id: ConversationId,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut messages: Vec<ChatMessage> = state
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        if let Some(limit) = limit {
            messages.truncate(limit.max(0) as usize);
        }
        Ok(messages)
    }

    async fn count_conversations(&self) -> Result<u64, RepositoryError> {
        Ok(self.state.lock().unwrap().conversations.len() as u64)
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        Ok(self.state.lock().unwrap().messages.len() as u64)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Default, Clone)]
pub struct InMemoryConfigRepository {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

impl ConfigRepository for InMemoryConfigRepository {
    async fn get(&self, key: &str) -> Result<Option<ConfigEntry>, RepositoryError> {
        Ok(self.entries.lock().unwrap().get(key).map(|value| ConfigEntry {
            key: key.to_string(),
            value: value.clone(),
            updated_at: Utc::now(),
        }))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, RepositoryError> {
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn list(&self) -> Result<Vec<ConfigEntry>, RepositoryError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|(key, value)| ConfigEntry {
                key: key.clone(),
                value: value.clone(),
                updated_at: Utc::now(),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Scripted provider behaviour.
#[derive(Clone)]
pub enum StubBehavior {
    Reply(String),
    Fail(String),
    /// Accept exactly this credential, reject every other one.
    AcceptKey { key: String, reply: String },
}

/// Records every request and every credential the factory was asked for.
#[derive(Clone)]
pub struct StubProviderFactory {
    behavior: StubBehavior,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    pub credentials: Arc<Mutex<Vec<String>>>,
}

impl StubProviderFactory {
    pub fn replying(content: &str) -> Self {
        Self::new(StubBehavior::Reply(content.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(StubBehavior::Fail(message.to_string()))
    }

    pub fn accepting(key: &str, reply: &str) -> Self {
        Self::new(StubBehavior::AcceptKey {
            key: key.to_string(),
            reply: reply.to_string(),
        })
    }

    fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
            credentials: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ProviderFactory for StubProviderFactory {
    fn create(&self, api_key: &SecretString, _model: &str) -> BoxLlmProvider {
        let key = api_key.expose_secret().to_string();
        self.credentials.lock().unwrap().push(key.clone());
        BoxLlmProvider::new(StubProvider {
            key,
            behavior: self.behavior.clone(),
            requests: Arc::clone(&self.requests),
        })
    }
}

struct StubProvider {
    key: String,
    behavior: StubBehavior,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl LlmProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let content = match &self.behavior {
            StubBehavior::Reply(content) => content.clone(),
            StubBehavior::Fail(message) => {
                return Err(LlmError::Provider {
                    message: message.clone(),
                });
            }
            StubBehavior::AcceptKey { key, reply } => {
                if *key != self.key {
                    return Err(LlmError::AuthenticationFailed("Invalid API key".to_string()));
                }
                reply.clone()
            }
        };
        Ok(CompletionResponse {
            id: "resp-stub".to_string(),
            content,
            model: request.model.clone(),
            finish_reason: FinishReason::Stop,
            usage: Usage {
                prompt_tokens: 12,
                completion_tokens: 3,
                total_tokens: 15,
            },
        })
    }
}
