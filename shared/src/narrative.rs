//! Client side of `POST /api/generate-prose`.

use async_trait::async_trait;
use reqwest::Client;

use crate::{ApiError, GenerateProseRequest, GenerateProseResponse, error::NarrativeError};

pub const EMPTY_MANEUVERS_MESSAGE: &str = "maneuvers must be a non-empty list of strings";

#[async_trait(?Send)]
pub trait NarrativeBackend {
    async fn narrate(&self, maneuvers: &[String]) -> Result<String, NarrativeError>;
}

#[derive(Debug, Clone)]
pub struct HttpNarrativeBackend {
    http: Client,
    endpoint: String,
}

impl HttpNarrativeBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait(?Send)]
impl NarrativeBackend for HttpNarrativeBackend {
    async fn narrate(&self, maneuvers: &[String]) -> Result<String, NarrativeError> {
        if maneuvers.is_empty() {
            return Err(NarrativeError::Backend(EMPTY_MANEUVERS_MESSAGE.to_string()));
        }

        tracing::debug!(
            "requesting prose for {} maneuver(s) from {}",
            maneuvers.len(),
            self.endpoint
        );
        let payload = GenerateProseRequest {
            maneuvers: maneuvers.to_vec(),
        };
        let response = self.http.post(&self.endpoint).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|err| err.error)
                .unwrap_or_else(|_| format!("Prose service responded with HTTP {status}"));
            return Err(NarrativeError::Backend(message));
        }

        let body: GenerateProseResponse = response.json().await?;
        Ok(body.prose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_list_is_rejected_locally() {
        let backend = HttpNarrativeBackend::new("http://127.0.0.1:9/api/generate-prose");
        let err = backend.narrate(&[]).await.unwrap_err();
        assert_eq!(err.to_string(), EMPTY_MANEUVERS_MESSAGE);
    }
}
