pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/options", get(handlers::handle_get_options))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/setup",
            post(handlers::handle_complete_setup),
        )
        .route(
            "/api/v1/sessions/:id/turns",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/feedback",
            post(handlers::handle_request_feedback),
        )
        .route("/api/v1/sessions/:id/restart", post(handlers::handle_restart))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::llm_client::testing::EchoGateway;
    use crate::llm_client::ModelGateway;
    use crate::session::store::SessionStore;

    fn app_with(gateway: Arc<dyn ModelGateway>) -> (Router, Arc<SessionStore>) {
        let sessions = Arc::new(SessionStore::new("gemini-1.5-flash"));
        let state = AppState {
            sessions: sessions.clone(),
            gateway,
        };
        (build_router(state), sessions)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn ana_json() -> Value {
        json!({
            "name": "Ana",
            "experience": "2 yrs analytics",
            "skills": "SQL, Python",
            "level": "Junior",
            "position": "Data Scientist",
            "company": "Amazon"
        })
    }

    async fn create_session(app: &Router) -> String {
        let (status, body) = send(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["phase"], "setup");
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app_with(Arc::new(EchoGateway::new()));
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["sessions"], 0);
    }

    #[tokio::test]
    async fn test_full_interview_flow() {
        let gateway = Arc::new(EchoGateway::new());
        let (app, _) = app_with(gateway.clone());
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/setup"),
            Some(ana_json()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "interviewing");
        assert_eq!(body["hint"], "Start by introducing yourself.");
        assert_eq!(body["messages"], json!([]));

        for n in 1..=5 {
            let (status, body) = send(
                &app,
                Method::POST,
                &format!("/api/v1/sessions/{id}/turns"),
                Some(json!({ "content": format!("answer {n}") })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["reply"], format!("ack {n}"));
            assert_eq!(body["turn_count"], n);
        }

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(body["phase"], "complete");
        assert_eq!(body["messages"].as_array().unwrap().len(), 10);
        assert_eq!(body["messages"][0]["role"], "user");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/turns"),
            Some(json!({ "content": "too late" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_STATE");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/feedback"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["feedback"], "ack 6");

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(body["phase"], "feedback_shown");
        assert_eq!(body["feedback"], "ack 6");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/restart"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "setup");
        assert_eq!(body["turn_count"], 0);
        assert_eq!(body["id"], id.as_str());
        assert!(body["profile"].is_null());
        assert_eq!(gateway.calls(), 6);
    }

    #[tokio::test]
    async fn test_invalid_profile_is_rejected_without_mutation() {
        let (app, _) = app_with(Arc::new(EchoGateway::new()));
        let id = create_session(&app).await;

        let mut form = ana_json();
        form["name"] = json!("a".repeat(41));
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/setup"),
            Some(form),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["retryable"], false);

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(body["phase"], "setup");
    }

    #[tokio::test]
    async fn test_gateway_failure_is_retryable() {
        let (app, _) = app_with(Arc::new(EchoGateway::failing_on(&[1])));
        let id = create_session(&app).await;
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/setup"),
            Some(ana_json()),
        )
        .await;

        let turn = format!("/api/v1/sessions/{id}/turns");
        let (status, body) = send(&app, Method::POST, &turn, Some(json!({ "content": "hi" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "GATEWAY_UNAVAILABLE");
        assert_eq!(body["error"]["retryable"], true);

        let (status, body) = send(&app, Method::POST, &turn, Some(json!({ "content": "hi" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["turn_count"], 1);
    }

    #[tokio::test]
    async fn test_feedback_failure_is_terminal_until_restart() {
        let (app, _) = app_with(Arc::new(EchoGateway::failing_on(&[6])));
        let id = create_session(&app).await;
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/setup"),
            Some(ana_json()),
        )
        .await;
        for n in 1..=5 {
            let (status, _) = send(
                &app,
                Method::POST,
                &format!("/api/v1/sessions/{id}/turns"),
                Some(json!({ "content": format!("answer {n}") })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let feedback = format!("/api/v1/sessions/{id}/feedback");
        let (status, body) = send(&app, Method::POST, &feedback, None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "FEEDBACK_FAILED");
        assert_eq!(body["error"]["retryable"], false);

        let (status, body) = send(&app, Method::POST, &feedback, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_STATE");

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(body["phase"], "feedback_pending");
        assert_eq!(body["chat_complete"], true);
        assert!(body["feedback"].is_null());

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/restart"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "setup");
    }

    #[tokio::test]
    async fn test_busy_session_rejects_concurrent_action() {
        let (app, sessions) = app_with(Arc::new(EchoGateway::new()));
        let id = create_session(&app).await;

        let handle = sessions.get(id.parse::<Uuid>().unwrap()).unwrap();
        let _in_flight = handle.lock().await;

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "SESSION_BUSY");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (app, _) = app_with(Arc::new(EchoGateway::new()));
        let uri = format!("/api/v1/sessions/{}", Uuid::new_v4());

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (app, sessions) = app_with(Arc::new(EchoGateway::new()));
        let id = create_session(&app).await;

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(sessions.len(), 0);
    }
}
