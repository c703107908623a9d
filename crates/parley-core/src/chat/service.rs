//! Chat orchestrator: one user turn in, one assistant reply out.
//!
//! Ties together the conversation store, config resolution, the history
//! window and a provider built for the resolved credential. The user
//! message is committed before the provider is called and is never rolled
//! back; the assistant reply is only persisted on success.

use std::sync::Arc;

use tracing::{Instrument, field, info, info_span, warn};

use parley_types::chat::{AssistantReply, ChatMessage, ChatRole, ConversationId};
use parley_types::error::ChatError;
use parley_types::llm::{CompletionRequest, Message};

use crate::chat::history::history_window;
use crate::config::repository::ConfigRepository;
use crate::config::service::{ConfigService, EffectiveSettings};
use crate::conversation::repository::ConversationRepository;
use crate::conversation::service::ConversationService;
use crate::llm::provider::DynProviderFactory;

pub struct ChatService<C: ConversationRepository, R: ConfigRepository> {
    conversations: Arc<ConversationService<C>>,
    config: Arc<ConfigService<R>>,
    providers: DynProviderFactory,
}

impl<C: ConversationRepository, R: ConfigRepository> ChatService<C, R> {
    pub fn new(
        conversations: Arc<ConversationService<C>>,
        config: Arc<ConfigService<R>>,
        providers: DynProviderFactory,
    ) -> Self {
        Self {
            conversations,
            config,
            providers,
        }
    }

    /// Run one request/response cycle against the model.
    ///
    /// Validation, not-found and configuration failures happen before any
    /// write. A provider failure leaves exactly the new user message behind.
    pub async fn send_message(
        &self,
        conversation_id: ConversationId,
        content: &str,
    ) -> Result<AssistantReply, ChatError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatError::Validation(
                "message content must not be empty".to_string(),
            ));
        }

        self.conversations.get(conversation_id).await?;

        let settings = self.config.effective_settings().await?;
        let Some(api_key) = settings.api_key.as_ref() else {
            return Err(ChatError::Configuration(
                "no API key configured; set one with `parley config set-key`".to_string(),
            ));
        };

        // Read before writing so the new turn can never show up in its own history.
        let transcript = self
            .conversations
            .repo()
            .list_messages(conversation_id, None)
            .await?;
        let history = history_window(&transcript, settings.max_history_rounds);

        let user_message = self
            .conversations
            .append(conversation_id, ChatRole::User, content)
            .await?;

        let request = build_request(&settings, history, &user_message.content);
        let provider = self.providers.create(api_key, &settings.model);

        let span = info_span!(
            "chat",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = request.temperature,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
            gen_ai.response.finish_reasons = field::Empty,
        );
        let response = match provider.complete(&request).instrument(span.clone()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    conversation_id = %conversation_id,
                    model = %settings.model,
                    error = %e,
                    "Provider call failed; user message kept"
                );
                return Err(ChatError::Provider(e));
            }
        };
        span.record("gen_ai.usage.input_tokens", response.usage.prompt_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.completion_tokens);
        span.record(
            "gen_ai.response.finish_reasons",
            field::display(response.finish_reason),
        );

        let reply = self
            .conversations
            .append(conversation_id, ChatRole::Assistant, &response.content)
            .await?;

        info!(
            conversation_id = %conversation_id,
            message_id = reply.id,
            model = %response.model,
            history_len = history.len(),
            total_tokens = response.usage.total_tokens,
            "Assistant reply stored"
        );

        Ok(AssistantReply {
            message_id: reply.id,
            role: ChatRole::Assistant,
            content: reply.content,
            model: response.model,
            finish_reason: response.finish_reason,
            usage: response.usage,
        })
    }
}

/// System prompt, then the windowed history in order, then the new turn.
fn build_request(
    settings: &EffectiveSettings,
    history: &[ChatMessage],
    content: &str,
) -> CompletionRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(settings.system_prompt.clone()));
    messages.extend(history.iter().map(|m| Message {
        role: m.role.into(),
        content: m.content.clone(),
    }));
    messages.push(Message::user(content));

    CompletionRequest {
        model: settings.model.clone(),
        messages,
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    }
}
