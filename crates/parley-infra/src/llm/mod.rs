//! Model provider implementations.
//!
//! [`OpenAiCompatFactory`] is the production [`ProviderFactory`]: it builds
//! an [`OpenAiCompatibleProvider`] for whatever credential and model the
//! config service resolved for the current call.

pub mod openai_compat;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_core::llm::provider::ProviderFactory;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::ZHIPU_BASE_URL;

/// Builds Zhipu GLM providers against a fixed base URL.
#[derive(Debug, Clone)]
pub struct OpenAiCompatFactory {
    base_url: String,
}

impl OpenAiCompatFactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OpenAiCompatFactory {
    fn default() -> Self {
        Self::new(ZHIPU_BASE_URL)
    }
}

impl ProviderFactory for OpenAiCompatFactory {
    fn create(&self, api_key: &SecretString, model: &str) -> BoxLlmProvider {
        BoxLlmProvider::new(OpenAiCompatibleProvider::zhipu(
            api_key.clone(),
            model,
            &self.base_url,
        ))
    }
}
