//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use parley_types::error::{ChatError, ConfigError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Chat(ChatError),
    Config(ConfigError),
    /// Malformed path or body that never reached a service.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl AppError {
    /// HTTP status, stable error code and message for this error.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(e) => {
                let status = match e {
                    ChatError::Validation(_) => StatusCode::BAD_REQUEST,
                    ChatError::NotFound(_) => StatusCode::NOT_FOUND,
                    ChatError::Provider(_) => StatusCode::BAD_GATEWAY,
                    ChatError::Configuration(_) | ChatError::Storage(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.category(), e.to_string())
            }
            AppError::Config(e) => {
                let status = match e {
                    ConfigError::Validation(_) => StatusCode::BAD_REQUEST,
                    ConfigError::Configuration(_) | ConfigError::Storage(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.category(), e.to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        }

        let request_id = uuid::Uuid::now_v7().to_string();
        (
            status,
            Json(ApiResponse::error(code, &message, request_id, 0)),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::chat::ConversationId;
    use parley_types::error::RepositoryError;
    use parley_types::llm::LlmError;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_chat_error_statuses() {
        assert_eq!(
            status_of(ChatError::Validation("empty".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ChatError::NotFound(ConversationId(1)).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ChatError::Configuration("no key".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ChatError::Provider(LlmError::RateLimited("slow down".into())).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ChatError::Storage(RepositoryError::Query("disk I/O error".into())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_config_validation_is_bad_request() {
        let err: AppError = ConfigError::Validation("invalid API key: nope".into()).into();
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert!(message.contains("invalid API key"));
    }

    #[test]
    fn test_provider_message_reaches_client() {
        let err: AppError = ChatError::Provider(LlmError::Provider {
            message: "model does not exist".into(),
        })
        .into();
        let (_, code, message) = err.parts();
        assert_eq!(code, "PROVIDER_ERROR");
        assert!(message.contains("model does not exist"));
    }
}
