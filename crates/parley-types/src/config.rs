//! Configuration types for Parley.
//!
//! `GlobalConfig` holds the compiled-in defaults (optionally overridden by
//! `config.toml`). Runtime overrides live in the `config` table as
//! `ConfigEntry` rows keyed by `ConfigKey` names and always win over the
//! defaults.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder returned in place of a stored credential.
pub const REDACTED_PLACEHOLDER: &str = "***configured***";

/// Tunable settings with a runtime override row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKey {
    ApiKey,
    Model,
    Temperature,
    MaxTokens,
    MaxHistoryRounds,
    SystemPrompt,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::ApiKey,
        ConfigKey::Model,
        ConfigKey::Temperature,
        ConfigKey::MaxTokens,
        ConfigKey::MaxHistoryRounds,
        ConfigKey::SystemPrompt,
    ];

    /// Row key in the `config` table.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::ApiKey => "api_key",
            ConfigKey::Model => "model",
            ConfigKey::Temperature => "temperature",
            ConfigKey::MaxTokens => "max_tokens",
            ConfigKey::MaxHistoryRounds => "max_history_rounds",
            ConfigKey::SystemPrompt => "system_prompt",
        }
    }

    pub fn is_credential(&self) -> bool {
        is_credential_key(self.as_str())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        ConfigKey::ALL
            .into_iter()
            .find(|k| k.as_str() == lowered)
            .ok_or_else(|| format!("unknown config key: '{s}'"))
    }
}

/// Whether a config key names a credential and must be redacted for display.
pub fn is_credential_key(key: &str) -> bool {
    key.to_lowercase().contains("api_key")
}

/// A stored runtime override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Batch of overrides submitted by a client.
///
/// Absent fields are left untouched; an empty string clears the override.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub max_history_rounds: Option<u32>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Compiled-in defaults for every tunable, plus provider endpoint settings.
///
/// Loaded from `~/.parley/config.toml`. All fields have sensible defaults.
#[derive(Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Credential used when no override is stored. Usually supplied via
    /// the `PARLEY_API_KEY` environment variable rather than the file.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Number of user/assistant rounds replayed into each model call.
    #[serde(default = "default_max_history_rounds")]
    pub max_history_rounds: u32,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// OpenAI-compatible endpoint of the model provider.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    "glm-4".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_max_history_rounds() -> u32 {
    10
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant.".to_string()
}

fn default_base_url() -> String {
    "https://open.bigmodel.cn/api/paas/v4".to_string()
}

impl GlobalConfig {
    /// Compiled default for a key, rendered as the text stored in overrides.
    pub fn default_for(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::ApiKey => self.api_key.clone(),
            ConfigKey::Model => self.model.clone(),
            ConfigKey::Temperature => self.temperature.to_string(),
            ConfigKey::MaxTokens => self.max_tokens.to_string(),
            ConfigKey::MaxHistoryRounds => self.max_history_rounds.to_string(),
            ConfigKey::SystemPrompt => self.system_prompt.clone(),
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_history_rounds: default_max_history_rounds(),
            system_prompt: default_system_prompt(),
            base_url: default_base_url(),
        }
    }
}

// Hand-written so the credential never lands in logs.
impl fmt::Debug for GlobalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { REDACTED_PLACEHOLDER })
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_history_rounds", &self.max_history_rounds)
            .field("system_prompt", &self.system_prompt)
            .field("base_url", &self.base_url)
            .finish()
    }
}
