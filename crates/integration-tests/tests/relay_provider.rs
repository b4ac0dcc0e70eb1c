//! Relay service against an in-process fake Gemini provider.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chopchop_integration_tests::spawn_relay;
use serde_json::{Value, json};

/// What the fake provider saw.
#[derive(Default)]
struct Seen {
    action: Option<String>,
    api_key: Option<String>,
    body: Option<Value>,
}

type Shared = Arc<Mutex<Seen>>;

/// A provider that records the request and answers with `status`/`reply`.
fn provider(status: StatusCode, reply: Value, seen: Shared) -> Router {
    Router::new()
        .route(
            "/v1beta/models/{action}",
            post(
                move |State(seen): State<Shared>, Path(action): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        let mut seen = seen.lock().expect("lock");
                        seen.action = Some(action);
                        seen.api_key = headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        seen.body = Some(body);
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(seen)
}

async fn post_prompt(relay: &url::Url, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(relay.join("api/gemini").expect("url"))
        .json(&body)
        .send()
        .await
        .expect("relay reachable");
    let status = StatusCode::from_u16(response.status().as_u16()).expect("status");
    (status, response.json().await.expect("json body"))
}

fn prompt() -> Value {
    json!({"contents": [{"parts": [{"text": "Extract items from: MILK 2.99"}]}]})
}

// ============================================================================
// Success path
// ============================================================================

#[tokio::test]
async fn test_forwards_contents_verbatim_with_header_key() {
    let seen = Shared::default();
    let relay = spawn_relay(provider(
        StatusCode::OK,
        json!({"candidates": [{"content": {"parts": [{"text": "[{\"item\": \"🥛 Milk\", \"perish_in_days\": 7}]"}]}}]}),
        seen.clone(),
    ))
    .await;

    let (status, body) = post_prompt(&relay, prompt()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"text": "[{\"item\": \"🥛 Milk\", \"perish_in_days\": 7}]"})
    );

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.action.as_deref(), Some("gemini-1.5-flash:generateContent"));
    assert_eq!(seen.api_key.as_deref(), Some("AIzaSyB3x9Qm2LkP7vT0wR5nC8dE1fG4hJ6"));
    assert_eq!(seen.body.as_ref(), Some(&prompt()));
}

#[tokio::test]
async fn test_empty_candidates_yield_empty_text() {
    let relay = spawn_relay(provider(StatusCode::OK, json!({"candidates": []}), Shared::default())).await;

    let (status, body) = post_prompt(&relay, prompt()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": ""}));
}

#[tokio::test]
async fn test_malformed_contents_are_passed_through() {
    let seen = Shared::default();
    let relay = spawn_relay(provider(StatusCode::OK, json!({}), seen.clone())).await;

    let (status, _) = post_prompt(&relay, json!({"contents": "not a list"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        seen.lock().expect("lock").body,
        Some(json!({"contents": "not a list"}))
    );
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn test_provider_error_is_embedded_under_details() {
    let provider_error = json!({
        "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
    });
    let relay = spawn_relay(provider(
        StatusCode::BAD_REQUEST,
        provider_error.clone(),
        Shared::default(),
    ))
    .await;

    let (status, body) = post_prompt(&relay, prompt()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Gemini API error", "details": provider_error}));
}

#[tokio::test]
async fn test_unparseable_request_is_rejected() {
    let relay = spawn_relay(provider(StatusCode::OK, json!({}), Shared::default())).await;

    let response = reqwest::Client::new()
        .post(relay.join("api/gemini").expect("url"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("relay reachable");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("json");
    assert!(body.get("error").and_then(Value::as_str).is_some());
}
