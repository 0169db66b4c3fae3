mod common;

use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use backend::{
    AppState,
    completion::{CompletionClient, SYSTEM_PROMPT},
    config::ProseConfig,
    create_router,
};
use common::FakeCompletions;
use serde_json::{Value, json};
use shared::{ApiError, GenerateProseResponse, narrative::EMPTY_MANEUVERS_MESSAGE};
use tower::ServiceExt;

fn app_with(config: ProseConfig) -> axum::Router {
    let completion = CompletionClient::new(config).expect("client");
    create_router(AppState {
        completion: Arc::new(completion),
    })
}

fn prose_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate-prose")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn prose_endpoint_returns_completion_text() {
    let fake = FakeCompletions::answering(
        "  Leave Church Street heading east, merge onto I-4 and arrive at the airport.  ",
    );
    let upstream = common::spawn(fake.router()).await;
    let app = app_with(ProseConfig::new(Some("sk-test".into())).with_base_url(upstream));

    let payload = json!({ "maneuvers": ["Head east on West Church Street", "Merge onto I-4", "Arrive"] });
    let response = app.oneshot(prose_request(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: GenerateProseResponse = read_json(response).await;
    assert_eq!(
        body.prose,
        "Leave Church Street heading east, merge onto I-4 and arrive at the airport."
    );

    let calls = fake.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (auth, sent) = &calls[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][0]["content"], SYSTEM_PROMPT);
    assert_eq!(
        sent["messages"][1]["content"],
        "Describe this driving route:\n1. Head east on West Church Street\n2. Merge onto I-4\n3. Arrive"
    );
}

#[tokio::test]
async fn missing_credential_is_a_server_error() {
    let app = app_with(ProseConfig::new(None));

    let payload = json!({ "maneuvers": ["Head north"] });
    let response = app.oneshot(prose_request(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ApiError = read_json(response).await;
    assert!(body.error.contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn invalid_maneuvers_are_bad_requests() {
    // Never contacted: every request below is rejected before the upstream call.
    let app = app_with(ProseConfig::new(Some("sk-test".into())).with_base_url("http://127.0.0.1:9"));

    let bodies = [
        json!({}).to_string(),
        json!({ "maneuvers": [] }).to_string(),
        json!({ "maneuvers": "Head north" }).to_string(),
        json!({ "maneuvers": [1, 2] }).to_string(),
        "not json".to_string(),
    ];

    for body in bodies {
        let response = app.clone().oneshot(prose_request(body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let error: ApiError = read_json(response).await;
        assert_eq!(error.error, EMPTY_MANEUVERS_MESSAGE);
    }
}

#[tokio::test]
async fn upstream_failure_is_surfaced() {
    let fake = FakeCompletions::failing(StatusCode::TOO_MANY_REQUESTS, "Rate limit reached");
    let upstream = common::spawn(fake.router()).await;
    let app = app_with(ProseConfig::new(Some("sk-test".into())).with_base_url(upstream));

    let payload = json!({ "maneuvers": ["Head north"] });
    let response = app.oneshot(prose_request(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = read_json(response).await;
    assert_eq!(body["error"], "Failed to generate prose: Rate limit reached");
    assert_eq!(fake.call_count(), 1);
}
