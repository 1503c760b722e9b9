//! HTTP request handlers

use super::types::{ErrorResponse, HealthResponse, ReceivedResponse, VerifyParams};
use super::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .route("/healthz", get(healthz))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Webhook
// ============================================================

/// WhatsApp verification handshake: echo `hub.challenge` when the mode is
/// `subscribe` and the token matches the configured one.
async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<String, AppError> {
    let token_matches = matches!(
        (&state.verify_token, &params.verify_token),
        (Some(expected), Some(got)) if expected == got
    );

    if params.mode.as_deref() == Some("subscribe") && token_matches {
        if let Some(challenge) = params.challenge {
            return Ok(challenge);
        }
    }
    Err(AppError::Forbidden("webhook verification failed".to_string()))
}

/// Inbound events. Always 200: the engine is infallible and treats
/// payloads without an extractable message as silent no-ops.
async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<ReceivedResponse> {
    state.engine.handle_inbound(&payload).await;
    Json(ReceivedResponse { received: true })
}

// ============================================================
// Health / Version
// ============================================================

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        active_sessions: state.engine.session_count(),
    })
}

async fn get_version() -> &'static str {
    concat!("intake-bot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{LogOnlySender, NoopCheckout};
    use crate::engine::Engine;
    use crate::session::SessionStore;
    use crate::webhook::tests::text_message_payload;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn test_app() -> Router {
        let store = SessionStore::new(16, Duration::from_secs(3600));
        let engine = Arc::new(Engine::new(
            store,
            Arc::new(LogOnlySender) as Arc<dyn crate::channel::ReplySender>,
            Arc::new(NoopCheckout) as Arc<dyn crate::channel::CheckoutNotifier>,
        ));
        create_router(AppState::new(engine, Some("secret".to_string())))
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn verify_echoes_challenge_for_matching_token() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=secret&hub.challenge=12345")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "12345");
    }

    #[tokio::test]
    async fn verify_rejects_wrong_token() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=12345")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn webhook_post_is_acknowledged() {
        let payload = text_message_payload("27831234567", "hi");
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"received":true}"#);
    }

    #[tokio::test]
    async fn webhook_post_with_irrelevant_payload_is_still_ok() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"object":"whatsapp_business_account"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthz_reports_session_count() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            r#"{"ok":true,"active_sessions":0}"#
        );
    }
}
