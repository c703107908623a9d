use thiserror::Error;

use crate::chat::ConversationId;
use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from conversation and chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("conversation {0} not found")]
    NotFound(ConversationId),

    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl ChatError {
    /// Stable machine-readable category.
    pub fn category(&self) -> &'static str {
        match self {
            ChatError::Validation(_) => "VALIDATION_ERROR",
            ChatError::NotFound(_) => "NOT_FOUND",
            ChatError::Configuration(_) => "CONFIGURATION_ERROR",
            ChatError::Provider(_) => "PROVIDER_ERROR",
            ChatError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl ConfigError {
    /// Stable machine-readable category.
    pub fn category(&self) -> &'static str {
        match self {
            ConfigError::Validation(_) => "VALIDATION_ERROR",
            ConfigError::Configuration(_) => "CONFIGURATION_ERROR",
            ConfigError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<ConfigError> for ChatError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Validation(msg) => ChatError::Validation(msg),
            ConfigError::Configuration(msg) => ChatError::Configuration(msg),
            ConfigError::Storage(e) => ChatError::Storage(e),
        }
    }
}
