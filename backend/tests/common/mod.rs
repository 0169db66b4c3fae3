//! Fake upstream providers served on loopback ports.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde_json::{Value, json};

pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Records chat-completion calls and answers with a fixed reply.
#[derive(Clone)]
pub struct FakeCompletions {
    pub status: StatusCode,
    pub reply: Value,
    pub calls: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

impl FakeCompletions {
    pub fn answering(prose: &str) -> Self {
        Self {
            status: StatusCode::OK,
            reply: json!({
                "choices": [{ "message": { "role": "assistant", "content": prose } }]
            }),
            calls: Arc::default(),
        }
    }

    pub fn failing(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            reply: json!({ "error": { "message": message, "type": "server_error" } }),
            calls: Arc::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(self.clone())
    }
}

async fn completions(
    State(fake): State<FakeCompletions>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    fake.calls.lock().unwrap().push((auth, body));
    (fake.status, Json(fake.reply.clone()))
}

/// Geocoding and directions endpoints with scripted answers.
#[derive(Clone)]
pub struct FakeMapbox {
    /// Features keyed by the exact `q` parameter.
    pub features: Arc<HashMap<String, Value>>,
    pub directions_status: StatusCode,
    pub directions: Value,
    pub geocode_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub directions_paths: Arc<Mutex<Vec<String>>>,
}

impl FakeMapbox {
    pub fn new(features: HashMap<String, Value>, directions: Value) -> Self {
        Self {
            features: Arc::new(features),
            directions_status: StatusCode::OK,
            directions,
            geocode_queries: Arc::default(),
            directions_paths: Arc::default(),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/search/geocode/v6/forward", get(forward))
            .route("/directions/v5/mapbox/driving/:waypoints", get(directions))
            .with_state(self.clone())
    }
}

async fn forward(
    State(fake): State<FakeMapbox>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let query = params.get("q").cloned().unwrap_or_default();
    fake.geocode_queries.lock().unwrap().push(params);
    if query.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "q is required" })),
        );
    }
    let features = fake
        .features
        .get(&query)
        .cloned()
        .map(|feature| vec![feature])
        .unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({ "type": "FeatureCollection", "features": features })),
    )
}

async fn directions(
    State(fake): State<FakeMapbox>,
    Path(waypoints): Path<String>,
) -> (StatusCode, Json<Value>) {
    fake.directions_paths.lock().unwrap().push(waypoints);
    (fake.directions_status, Json(fake.directions.clone()))
}

pub fn feature(full_address: &str, lon: f64, lat: f64) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [lon, lat] },
        "properties": { "full_address": full_address, "name": full_address }
    })
}

pub fn route_with_steps(instructions: &[&str]) -> Value {
    let steps: Vec<Value> = instructions
        .iter()
        .map(|text| json!({ "maneuver": { "instruction": text, "type": "turn" } }))
        .collect();
    json!({ "code": "Ok", "routes": [{ "legs": [{ "steps": steps }] }] })
}
