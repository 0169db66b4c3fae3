pub mod completion;
pub mod config;
pub mod error;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use serde_json::Value;
use shared::{ApiError, GenerateProseResponse, narrative::EMPTY_MANEUVERS_MESSAGE};
use tower_http::cors::{Any, CorsLayer};

use crate::completion::CompletionClient;
use crate::error::{ProseError, api_error};

#[derive(Clone)]
pub struct AppState {
    pub completion: Arc<CompletionClient>,
}

pub fn create_router(state: AppState) -> Router {
    // The frontend is served from its own origin during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate-prose", post(generate_prose_handler))
        .layer(cors)
        .with_state(state)
}

async fn generate_prose_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateProseResponse>, (StatusCode, Json<ApiError>)> {
    if !state.completion.has_credential() {
        tracing::error!("prose requested but OPENAI_API_KEY is not set");
        return Err(api_error(ProseError::MissingCredential));
    }

    let maneuvers = payload
        .map_err(|rejection| {
            tracing::debug!("rejected prose request body: {rejection}");
            ProseError::InvalidRequest(EMPTY_MANEUVERS_MESSAGE.to_string())
        })
        .and_then(|Json(body)| parse_maneuvers(&body))
        .map_err(api_error)?;

    tracing::info!("generating prose for {} maneuver(s)", maneuvers.len());
    let prose = state
        .completion
        .narrate(&maneuvers)
        .await
        .map_err(api_error)?;

    Ok(Json(GenerateProseResponse { prose }))
}

/// Accepts only `{ "maneuvers": [string, ...] }` with at least one entry.
fn parse_maneuvers(body: &Value) -> Result<Vec<String>, ProseError> {
    let invalid = || ProseError::InvalidRequest(EMPTY_MANEUVERS_MESSAGE.to_string());
    let maneuvers = body
        .get("maneuvers")
        .and_then(Value::as_array)
        .ok_or_else(invalid)?
        .iter()
        .map(|step| step.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;

    if maneuvers.is_empty() {
        return Err(invalid());
    }
    Ok(maneuvers)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_maneuvers_accepts_string_list() {
        let parsed = parse_maneuvers(&json!({ "maneuvers": ["Head north", "Arrive"] })).unwrap();
        assert_eq!(parsed, vec!["Head north", "Arrive"]);
    }

    #[test]
    fn test_parse_maneuvers_rejects_bad_shapes() {
        for body in [
            json!({}),
            json!({ "maneuvers": "Head north" }),
            json!({ "maneuvers": [] }),
            json!({ "maneuvers": ["Head north", 3] }),
        ] {
            let err = parse_maneuvers(&body).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(err.to_string(), EMPTY_MANEUVERS_MESSAGE);
        }
    }
}
