use reqwest::{Client, Response};
use serde::Deserialize;

use crate::config::MapboxConfig;

/// HTTP client for the map provider: forward geocoding and driving directions.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    http: Client,
    config: MapboxConfig,
}

impl MapboxClient {
    pub fn new(config: MapboxConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: MapboxConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &MapboxConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.config.token.as_deref()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[derive(Deserialize)]
struct ProviderMessage {
    message: String,
}

/// The provider's own `message` when the body carries one, else the HTTP status.
pub(crate) async fn provider_failure(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ProviderMessage>(&body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => format!("HTTP {status}"),
    }
}
