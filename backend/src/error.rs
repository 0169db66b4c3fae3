use axum::{Json, http::StatusCode};
use shared::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProseError {
    #[error("OPENAI_API_KEY is not configured on the server")]
    MissingCredential,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Failed to generate prose: {0}")]
    Upstream(String),
    #[error("Failed to generate prose: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProseError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProseError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProseError::MissingCredential | ProseError::Upstream(_) | ProseError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub fn api_error(err: ProseError) -> (StatusCode, Json<ApiError>) {
    (
        err.status(),
        Json(ApiError {
            error: err.to_string(),
        }),
    )
}
