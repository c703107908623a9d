//! Runtime configuration HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/config          - Effective configuration, credential redacted
//! - POST /api/v1/config          - Apply a batch of overrides
//! - POST /api/v1/config/validate - Probe the configured credential

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;

use parley_core::config::service::CredentialCheck;
use parley_types::config::ConfigUpdate;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// GET /api/v1/config
pub async fn get_config(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, AppError> {
    let timer = RequestTimer::start();
    let config = state.config_service.display_config().await?;
    Ok(Json(timer.respond(config).with_link("validate", "/api/v1/config/validate")))
}

/// POST /api/v1/config
///
/// Returns the effective configuration after the update.
pub async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, AppError> {
    let timer = RequestTimer::start();
    let changed = state.config_service.apply_update(update).await?;
    tracing::info!(changed = changed.len(), "Config updated via API");
    let config = state.config_service.display_config().await?;
    Ok(Json(timer.respond(config)))
}

/// POST /api/v1/config/validate
pub async fn validate_config(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CredentialCheck>>, AppError> {
    let timer = RequestTimer::start();
    let check = state.config_service.validate_credential().await?;
    Ok(Json(timer.respond(check)))
}
