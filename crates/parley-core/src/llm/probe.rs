//! Credential probe: the cheapest request that proves a key is accepted.

use parley_types::llm::{CompletionRequest, LlmError, Message};

use super::box_provider::BoxLlmProvider;

pub const PROBE_CONTENT: &str = "ping";
pub const PROBE_MAX_TOKENS: u32 = 10;
const PROBE_TEMPERATURE: f64 = 0.7;

pub fn probe_request(model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user(PROBE_CONTENT)],
        max_tokens: PROBE_MAX_TOKENS,
        temperature: PROBE_TEMPERATURE,
    }
}

/// Run the probe. Any successful completion counts, whatever its content.
pub async fn probe(provider: &BoxLlmProvider, model: &str) -> Result<(), LlmError> {
    provider.complete(&probe_request(model)).await.map(|_| ())
}
