//! LlmProvider and ProviderFactory trait definitions.

use std::sync::Arc;

use secrecy::SecretString;

use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::box_provider::BoxLlmProvider;

/// Trait for model provider backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). There is no
/// streaming method: replies are delivered whole.
///
/// Implementations live in parley-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "zhipu").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}

/// Builds a provider bound to one credential and model.
///
/// The credential can change between calls (it is a runtime override), so
/// services ask the factory for a fresh provider per operation instead of
/// holding a long-lived client.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, api_key: &SecretString, model: &str) -> BoxLlmProvider;
}

/// Shared handle to the injected factory.
pub type DynProviderFactory = Arc<dyn ProviderFactory>;
