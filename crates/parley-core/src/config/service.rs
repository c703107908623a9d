//! Config service: precedence resolution, validated writes, redacted display.
//!
//! Every tunable resolves the same way: a non-blank override row wins,
//! otherwise the compiled default from `GlobalConfig` applies. Nothing is
//! cached, so every call reads the store.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use secrecy::SecretString;
use serde::Serialize;
use tracing::{info, warn};

use parley_types::config::{
    ConfigKey, ConfigUpdate, GlobalConfig, REDACTED_PLACEHOLDER, is_credential_key,
};
use parley_types::error::ConfigError;

use crate::config::repository::ConfigRepository;
use crate::llm::probe::probe;
use crate::llm::provider::DynProviderFactory;

/// Fully resolved settings for one model call.
pub struct EffectiveSettings {
    /// `None` when neither an override nor a default credential exists.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub max_history_rounds: u32,
    pub system_prompt: String,
}

/// Outcome of probing the currently configured credential.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ConfigService<R: ConfigRepository> {
    repo: R,
    defaults: GlobalConfig,
    providers: DynProviderFactory,
}

impl<R: ConfigRepository> ConfigService<R> {
    pub fn new(repo: R, defaults: GlobalConfig, providers: DynProviderFactory) -> Self {
        Self {
            repo,
            defaults,
            providers,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn defaults(&self) -> &GlobalConfig {
        &self.defaults
    }

    // --- Resolution ---

    /// Effective text value of a key: the override if present and non-blank,
    /// else the compiled default.
    pub async fn resolve(&self, key: ConfigKey) -> Result<String, ConfigError> {
        let stored = self.repo.get(key.as_str()).await?;
        Ok(match stored {
            Some(entry) if !entry.value.trim().is_empty() => entry.value,
            _ => self.defaults.default_for(key),
        })
    }

    /// Resolve and parse a typed value.
    pub async fn resolve_as<T>(&self, key: ConfigKey) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.resolve(key).await?;
        raw.trim().parse::<T>().map_err(|e| {
            ConfigError::Configuration(format!("invalid value for '{key}': '{raw}' ({e})"))
        })
    }

    /// Resolve every tunable in one pass.
    pub async fn effective_settings(&self) -> Result<EffectiveSettings, ConfigError> {
        let api_key = self.resolve(ConfigKey::ApiKey).await?;
        Ok(EffectiveSettings {
            api_key: (!api_key.is_empty()).then(|| SecretString::from(api_key)),
            model: self.resolve(ConfigKey::Model).await?,
            temperature: self.resolve_as(ConfigKey::Temperature).await?,
            max_tokens: self.resolve_as(ConfigKey::MaxTokens).await?,
            max_history_rounds: self.resolve_as(ConfigKey::MaxHistoryRounds).await?,
            system_prompt: self.resolve(ConfigKey::SystemPrompt).await?,
        })
    }

    /// Effective configuration safe to show to a client.
    ///
    /// Covers every known key plus any extra stored keys. Credential-like
    /// keys show the placeholder when set and an empty string when not.
    pub async fn display_config(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut out = BTreeMap::new();
        for key in ConfigKey::ALL {
            out.insert(key.as_str().to_string(), self.resolve(key).await?);
        }
        for entry in self.repo.list().await? {
            out.entry(entry.key).or_insert(entry.value);
        }

        for (key, value) in out.iter_mut() {
            if is_credential_key(key) {
                *value = redact(value);
            }
        }
        Ok(out)
    }

    // --- Writes ---

    /// Store a new credential after a successful probe against the provider.
    ///
    /// A rejected credential leaves the store untouched.
    pub async fn set_credential(&self, value: &str) -> Result<(), ConfigError> {
        let candidate = value.trim();
        if candidate.is_empty() {
            return Err(ConfigError::Validation("API key must not be empty".to_string()));
        }

        let model = self.resolve(ConfigKey::Model).await?;
        let provider = self
            .providers
            .create(&SecretString::from(candidate.to_string()), &model);
        if let Err(e) = probe(&provider, &model).await {
            warn!(provider = provider.name(), error = %e, "Credential rejected by provider");
            return Err(ConfigError::Validation(format!("invalid API key: {e}")));
        }

        self.repo.set(ConfigKey::ApiKey.as_str(), candidate).await?;
        info!(key = %ConfigKey::ApiKey, "Credential validated and stored");
        Ok(())
    }

    /// Set a single override.
    ///
    /// An empty value clears the override. The redaction placeholder is
    /// ignored for credentials, since it is what display clients send back.
    pub async fn set(&self, key: ConfigKey, raw: &str) -> Result<(), ConfigError> {
        let value = raw.trim();
        if key.is_credential() && value == REDACTED_PLACEHOLDER {
            return Ok(());
        }
        if value.is_empty() {
            self.clear(key).await?;
            return Ok(());
        }
        if key.is_credential() {
            return self.set_credential(value).await;
        }

        validate_value(key, value)?;
        // Prompt text is stored exactly as given.
        let stored = if key == ConfigKey::SystemPrompt { raw } else { value };
        self.repo.set(key.as_str(), stored).await?;
        info!(key = %key, "Config override stored");
        Ok(())
    }

    /// Apply a batch update from a client.
    ///
    /// All plain values are validated first, then the credential is probed;
    /// nothing is written unless both succeed. Returns the keys touched.
    pub async fn apply_update(&self, update: ConfigUpdate) -> Result<Vec<ConfigKey>, ConfigError> {
        let mut pending: Vec<(ConfigKey, String)> = Vec::new();
        if let Some(model) = update.model {
            pending.push((ConfigKey::Model, model));
        }
        if let Some(temperature) = update.temperature {
            pending.push((ConfigKey::Temperature, temperature.to_string()));
        }
        if let Some(max_tokens) = update.max_tokens {
            pending.push((ConfigKey::MaxTokens, max_tokens.to_string()));
        }
        if let Some(rounds) = update.max_history_rounds {
            pending.push((ConfigKey::MaxHistoryRounds, rounds.to_string()));
        }
        if let Some(prompt) = update.system_prompt {
            pending.push((ConfigKey::SystemPrompt, prompt));
        }

        for (key, value) in &pending {
            let value = value.trim();
            if !value.is_empty() {
                validate_value(*key, value)?;
            }
        }

        let mut touched = Vec::new();
        if let Some(api_key) = update.api_key {
            let api_key = api_key.trim();
            if api_key != REDACTED_PLACEHOLDER {
                self.set(ConfigKey::ApiKey, api_key).await?;
                touched.push(ConfigKey::ApiKey);
            }
        }
        for (key, value) in pending {
            self.set(key, &value).await?;
            touched.push(key);
        }
        Ok(touched)
    }

    /// Drop an override so the key reverts to its default.
    pub async fn clear(&self, key: ConfigKey) -> Result<bool, ConfigError> {
        let removed = self.repo.delete(key.as_str()).await?;
        if removed {
            info!(key = %key, "Config override cleared");
        }
        Ok(removed)
    }

    // --- Credential check ---

    /// Probe the currently resolved credential.
    ///
    /// Reports `valid: false` when no credential is configured at all.
    pub async fn validate_credential(&self) -> Result<CredentialCheck, ConfigError> {
        let settings = self.effective_settings().await?;
        let Some(api_key) = settings.api_key else {
            return Ok(CredentialCheck {
                valid: false,
                error: Some("no API key configured".to_string()),
            });
        };

        let provider = self.providers.create(&api_key, &settings.model);
        Ok(match probe(&provider, &settings.model).await {
            Ok(()) => CredentialCheck {
                valid: true,
                error: None,
            },
            Err(e) => CredentialCheck {
                valid: false,
                error: Some(e.to_string()),
            },
        })
    }
}

fn redact(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        REDACTED_PLACEHOLDER.to_string()
    }
}

/// Parse and range-check a non-empty override before it is stored.
fn validate_value(key: ConfigKey, value: &str) -> Result<(), ConfigError> {
    let invalid = |detail: &str| ConfigError::Validation(format!("{key}: {detail}"));
    match key {
        ConfigKey::Temperature => {
            let t: f64 = value.parse().map_err(|_| invalid("must be a number"))?;
            if !(0.0..=2.0).contains(&t) {
                return Err(invalid("must be between 0 and 2"));
            }
        }
        ConfigKey::MaxTokens => {
            let n: u32 = value
                .parse()
                .map_err(|_| invalid("must be a positive integer"))?;
            if n == 0 {
                return Err(invalid("must be at least 1"));
            }
        }
        ConfigKey::MaxHistoryRounds => {
            value
                .parse::<u32>()
                .map_err(|_| invalid("must be a non-negative integer"))?;
        }
        ConfigKey::ApiKey | ConfigKey::Model | ConfigKey::SystemPrompt => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::testing::{InMemoryConfigRepository, StubProviderFactory};

    fn service_with(
        repo: InMemoryConfigRepository,
        factory: StubProviderFactory,
    ) -> ConfigService<InMemoryConfigRepository> {
        ConfigService::new(repo, GlobalConfig::default(), Arc::new(factory))
    }

    fn service() -> ConfigService<InMemoryConfigRepository> {
        service_with(
            InMemoryConfigRepository::new(),
            StubProviderFactory::replying("pong"),
        )
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_default() {
        let svc = service();
        assert_eq!(svc.resolve(ConfigKey::Model).await.unwrap(), "glm-4");
        assert_eq!(
            svc.resolve_as::<u32>(ConfigKey::MaxTokens).await.unwrap(),
            2000
        );
    }

    #[tokio::test]
    async fn test_resolve_prefers_override() {
        let svc = service_with(
            InMemoryConfigRepository::new().with("model", "glm-4-plus"),
            StubProviderFactory::replying("pong"),
        );
        assert_eq!(svc.resolve(ConfigKey::Model).await.unwrap(), "glm-4-plus");
    }

    #[tokio::test]
    async fn test_blank_override_counts_as_absent() {
        let svc = service_with(
            InMemoryConfigRepository::new().with("system_prompt", "   "),
            StubProviderFactory::replying("pong"),
        );
        assert_eq!(
            svc.resolve(ConfigKey::SystemPrompt).await.unwrap(),
            "You are a helpful AI assistant."
        );
    }

    #[tokio::test]
    async fn test_system_prompt_keeps_surrounding_whitespace() {
        let svc = service_with(
            InMemoryConfigRepository::new().with("system_prompt", "  Reply in haiku.\n"),
            StubProviderFactory::replying("pong"),
        );
        assert_eq!(
            svc.resolve(ConfigKey::SystemPrompt).await.unwrap(),
            "  Reply in haiku.\n"
        );

        svc.set(ConfigKey::SystemPrompt, "\tBe terse. ").await.unwrap();
        assert_eq!(
            svc.resolve(ConfigKey::SystemPrompt).await.unwrap(),
            "\tBe terse. "
        );

        svc.set(ConfigKey::Model, " glm-4-plus ").await.unwrap();
        assert_eq!(svc.resolve(ConfigKey::Model).await.unwrap(), "glm-4-plus");
    }

    #[tokio::test]
    async fn test_set_then_clear_reverts_to_default() {
        let svc = service();
        svc.set(ConfigKey::MaxHistoryRounds, "3").await.unwrap();
        assert_eq!(
            svc.resolve_as::<u32>(ConfigKey::MaxHistoryRounds).await.unwrap(),
            3
        );

        assert!(svc.clear(ConfigKey::MaxHistoryRounds).await.unwrap());
        assert_eq!(
            svc.resolve_as::<u32>(ConfigKey::MaxHistoryRounds).await.unwrap(),
            10
        );
    }

    #[tokio::test]
    async fn test_set_empty_value_clears() {
        let svc = service();
        svc.set(ConfigKey::Model, "glm-4-air").await.unwrap();
        svc.set(ConfigKey::Model, "").await.unwrap();
        assert!(svc.repo().raw("model").is_none());
    }

    #[tokio::test]
    async fn test_unparseable_override_is_configuration_error() {
        let svc = service_with(
            InMemoryConfigRepository::new().with("temperature", "warm"),
            StubProviderFactory::replying("pong"),
        );
        let err = svc.effective_settings().await.err().unwrap();
        assert!(matches!(err, ConfigError::Configuration(_)));
        assert!(err.to_string().contains("temperature"));
    }

    #[tokio::test]
    async fn test_set_rejects_out_of_range_values() {
        let svc = service();
        assert!(matches!(
            svc.set(ConfigKey::Temperature, "2.5").await,
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            svc.set(ConfigKey::MaxTokens, "0").await,
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            svc.set(ConfigKey::MaxHistoryRounds, "-1").await,
            Err(ConfigError::Validation(_))
        ));
        assert!(svc.repo().raw("temperature").is_none());
    }

    #[tokio::test]
    async fn test_set_credential_rejected_leaves_store_unchanged() {
        let factory = StubProviderFactory::accepting("good-token", "pong");
        let svc = service_with(InMemoryConfigRepository::new(), factory.clone());

        let err = svc.set_credential("bad-token").await.unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().starts_with("invalid API key"));
        assert!(svc.repo().raw("api_key").is_none());
        assert!(
            svc.effective_settings()
                .await
                .unwrap()
                .api_key
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_set_credential_probes_then_stores() {
        let factory = StubProviderFactory::accepting("good-token", "pong");
        let svc = service_with(InMemoryConfigRepository::new(), factory.clone());

        svc.set_credential("  good-token  ").await.unwrap();

        assert_eq!(svc.repo().raw("api_key").as_deref(), Some("good-token"));
        let probe = factory.last_request().unwrap();
        assert_eq!(probe.messages.len(), 1);
        assert_eq!(probe.messages[0].content, "ping");
        assert_eq!(probe.max_tokens, 10);
        assert_eq!(probe.model, "glm-4");
    }

    #[tokio::test]
    async fn test_set_credential_rejects_blank() {
        let factory = StubProviderFactory::replying("pong");
        let svc = service_with(InMemoryConfigRepository::new(), factory.clone());
        assert!(matches!(
            svc.set_credential("  ").await,
            Err(ConfigError::Validation(_))
        ));
        assert_eq!(factory.request_count(), 0);
    }

    #[tokio::test]
    async fn test_display_redacts_credentials() {
        let svc = service_with(
            InMemoryConfigRepository::new()
                .with("api_key", "sk-secret")
                .with("zhipu_api_key", "legacy-secret"),
            StubProviderFactory::replying("pong"),
        );
        let shown = svc.display_config().await.unwrap();
        assert_eq!(shown["api_key"], REDACTED_PLACEHOLDER);
        assert_eq!(shown["zhipu_api_key"], REDACTED_PLACEHOLDER);
        assert_eq!(shown["model"], "glm-4");
        assert!(!shown.values().any(|v| v.contains("secret")));
    }

    #[tokio::test]
    async fn test_display_shows_empty_for_missing_credential() {
        let svc = service();
        let shown = svc.display_config().await.unwrap();
        assert_eq!(shown["api_key"], "");
        assert_eq!(shown.len(), ConfigKey::ALL.len());
    }

    #[tokio::test]
    async fn test_apply_update_ignores_placeholder() {
        let factory = StubProviderFactory::replying("pong");
        let svc = service_with(
            InMemoryConfigRepository::new().with("api_key", "existing"),
            factory.clone(),
        );
        let update = ConfigUpdate {
            api_key: Some(REDACTED_PLACEHOLDER.to_string()),
            model: Some("glm-4-air".to_string()),
            ..Default::default()
        };

        let touched = svc.apply_update(update).await.unwrap();

        assert_eq!(touched, vec![ConfigKey::Model]);
        assert_eq!(svc.repo().raw("api_key").as_deref(), Some("existing"));
        assert_eq!(svc.repo().raw("model").as_deref(), Some("glm-4-air"));
        assert_eq!(factory.request_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_update_validates_before_writing() {
        let svc = service();
        let update = ConfigUpdate {
            model: Some("glm-4-air".to_string()),
            temperature: Some(3.0),
            ..Default::default()
        };

        assert!(svc.apply_update(update).await.is_err());
        assert!(svc.repo().raw("model").is_none());
    }

    #[tokio::test]
    async fn test_apply_update_bad_credential_writes_nothing() {
        let svc = service_with(
            InMemoryConfigRepository::new(),
            StubProviderFactory::accepting("good", "pong"),
        );
        let update = ConfigUpdate {
            api_key: Some("bad".to_string()),
            max_tokens: Some(500),
            ..Default::default()
        };

        assert!(svc.apply_update(update).await.is_err());
        assert!(svc.repo().raw("api_key").is_none());
        assert!(svc.repo().raw("max_tokens").is_none());
    }

    #[tokio::test]
    async fn test_validate_credential_without_key() {
        let factory = StubProviderFactory::replying("pong");
        let svc = service_with(InMemoryConfigRepository::new(), factory.clone());
        let check = svc.validate_credential().await.unwrap();
        assert!(!check.valid);
        assert_eq!(factory.request_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_credential_probes_current_key() {
        let svc = service_with(
            InMemoryConfigRepository::new().with("api_key", "good"),
            StubProviderFactory::accepting("good", "pong"),
        );
        assert!(svc.validate_credential().await.unwrap().valid);

        let svc = service_with(
            InMemoryConfigRepository::new().with("api_key", "stale"),
            StubProviderFactory::accepting("good", "pong"),
        );
        let check = svc.validate_credential().await.unwrap();
        assert!(!check.valid);
        assert!(check.error.unwrap().contains("Invalid API key"));
    }
}
