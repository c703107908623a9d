//! Configuration for the OpenAI-compatible provider.

use secrecy::SecretString;

/// Zhipu's OpenAI-compatible endpoint.
pub const ZHIPU_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Settings needed to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name, used in spans and logs.
    pub provider_name: String,
    /// Base URL for the API.
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request leaves its model empty.
    pub model: String,
}

/// Zhipu GLM configuration against `base_url` (normally [`ZHIPU_BASE_URL`]).
pub fn zhipu_config(api_key: SecretString, model: &str, base_url: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "zhipu".into(),
        base_url: base_url.into(),
        api_key,
        model: model.into(),
    }
}
