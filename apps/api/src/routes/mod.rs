pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/turns", post(handlers::handle_turn))
        .route(
            "/api/v1/sessions/:id/reset",
            post(handlers::handle_reset_session),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::testing::ScriptedCollaborator;
    use crate::screening::fields::default_fields;
    use crate::screening::machine::{ScreeningOptions, Screener};
    use crate::screening::store::SessionStore;

    fn test_router() -> Router {
        let collaborator = Arc::new(ScriptedCollaborator::always("VALID"));
        let state = AppState {
            screener: Screener::new(default_fields(), collaborator, ScreeningOptions::default()),
            sessions: SessionStore::new(),
        };
        build_router(state)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_session(router: &Router) -> String {
        let (status, body) = send(router, "POST", "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "screener-api");
        assert_eq!(body["active_sessions"], 0);

        create_session(&router).await;
        let (_, body) = send(&router, "GET", "/health", None).await;
        assert_eq!(body["active_sessions"], 1);
    }

    #[tokio::test]
    async fn test_create_session_returns_greeting_and_first_prompt() {
        let router = test_router();
        let (status, body) = send(&router, "POST", "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["phase"], "collecting");
        let transcript = body["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1]["role"], "assistant");
        assert_eq!(transcript[1]["text"], "What is your full name?");
    }

    #[tokio::test]
    async fn test_turn_advances_and_reports_progress() {
        let router = test_router();
        let id = create_session(&router).await;

        let uri = format!("/api/v1/sessions/{id}/turns");
        let (status, body) = send(&router, "POST", &uri, Some(json!({"text": "John Smith"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "collecting");
        assert_eq!(body["current_field"], "email");
        assert_eq!(body["retry_count"], 0);
        assert_eq!(body["reply"], "What is your email address?");

        let (_, body) = send(&router, "POST", &uri, Some(json!({"text": "not-an-email"}))).await;
        assert_eq!(body["current_field"], "email");
        assert_eq!(body["retry_count"], 1);
    }

    #[tokio::test]
    async fn test_exit_turn_completes_session() {
        let router = test_router();
        let id = create_session(&router).await;

        let uri = format!("/api/v1/sessions/{id}/turns");
        let (_, body) = send(&router, "POST", &uri, Some(json!({"text": "Bye"}))).await;
        assert_eq!(body["phase"], "complete");
        assert!(body["current_field"].is_null());
    }

    #[tokio::test]
    async fn test_blank_turn_rejected() {
        let router = test_router();
        let id = create_session(&router).await;

        let uri = format!("/api/v1/sessions/{id}/turns");
        let (status, body) = send(&router, "POST", &uri, Some(json!({"text": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let router = test_router();
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_snapshot_reset_and_delete() {
        let router = test_router();
        let id = create_session(&router).await;
        let turns = format!("/api/v1/sessions/{id}/turns");
        send(&router, "POST", &turns, Some(json!({"text": "John Smith"}))).await;

        let session_uri = format!("/api/v1/sessions/{id}");
        let (status, snapshot) = send(&router, "GET", &session_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["current_field_index"], 1);
        assert_eq!(snapshot["answers"]["full_name"]["accepted"], true);
        assert_eq!(snapshot["profile"]["full_name"], "John Smith");

        let reset_uri = format!("/api/v1/sessions/{id}/reset");
        let (status, snapshot) = send(&router, "POST", &reset_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["current_field_index"], 0);
        assert_eq!(snapshot["answers"], json!({}));

        let (status, _) = send(&router, "DELETE", &session_uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&router, "DELETE", &session_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
