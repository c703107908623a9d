//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`.
//! Middleware: CORS, tracing.
//!
//! When `PARLEY_WEB_DIR` points at an existing directory, its files are
//! served for every path the API does not claim, with `index.html` as the
//! fallback for client-side routing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Environment variable naming a directory of static web assets.
pub const WEB_DIR_ENV: &str = "PARLEY_WEB_DIR";

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Conversations
        .route(
            "/conversations",
            get(handlers::conversation::list_conversations)
                .post(handlers::conversation::create_conversation),
        )
        .route(
            "/conversations/{id}",
            get(handlers::conversation::get_conversation)
                .put(handlers::conversation::rename_conversation)
                .delete(handlers::conversation::delete_conversation),
        )
        // Messages
        .route(
            "/conversations/{id}/messages",
            get(handlers::message::list_messages).post(handlers::message::send_message),
        )
        // Runtime config
        .route(
            "/config",
            get(handlers::config::get_config).post(handlers::config::update_config),
        )
        .route("/config/validate", post(handlers::config::validate_config));

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Ok(web_dir) = std::env::var(WEB_DIR_ENV) {
        if std::path::Path::new(&web_dir).is_dir() {
            let index_path = format!("{web_dir}/index.html");
            let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
            router = router.fallback_service(serve_dir);
            tracing::info!(path = %web_dir, "Static file serving enabled");
        } else {
            tracing::warn!(path = %web_dir, "Web directory not found, serving API only");
        }
    }

    router
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::test_support::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn send_json(
        router: Router,
        method: &str,
        uri: &str,
        body: &str,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_rename_without_title_is_validation_error() {
        let state = test_state("good-key").await;
        let conv = state.conversation_service.create(Some("a")).await.unwrap();
        let uri = format!("/api/v1/conversations/{}", conv.id);

        let (status, body) = send_json(build_router(state.clone()), "PUT", &uri, "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let unchanged = state.conversation_service.get(conv.id).await.unwrap();
        assert_eq!(unchanged.title, "a");
    }

    #[tokio::test]
    async fn test_send_without_content_is_validation_error() {
        let state = test_state("good-key").await;
        let conv = state.conversation_service.create(None).await.unwrap();
        let uri = format!("/api/v1/conversations/{}/messages", conv.id);

        let (status, body) = send_json(build_router(state.clone()), "POST", &uri, "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        assert!(state.conversation_service.messages(conv.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_empty_body_uses_default_title() {
        let state = test_state("").await;
        let (status, body) =
            send_json(build_router(state), "POST", "/api/v1/conversations", "{}").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["title"], "New Conversation");
    }

    #[tokio::test]
    async fn test_health_check_reports_version() {
        let axum::Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
