//! Chat-completion client turning a maneuver list into one paragraph of prose.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::ProseConfig, error::ProseError};

pub const SYSTEM_PROMPT: &str = "You turn turn-by-turn driving directions into prose. \
Write a concise, factual description of the route as a single flowing paragraph. \
Keep every turn in its original order and do not invent landmarks. \
Do not use lists, bullets, numbering, headings or line breaks.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    error: UpstreamErrorBody,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    config: ProseConfig,
}

impl CompletionClient {
    pub fn new(config: ProseConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    pub fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub async fn narrate(&self, maneuvers: &[String]) -> Result<String, ProseError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProseError::MissingCredential)?;

        let user_prompt = user_prompt(maneuvers);
        let payload = ChatRequest {
            model: &self.config.model,
            temperature: TEMPERATURE,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        tracing::debug!(
            "requesting completion from {} with model {}",
            self.config.base_url,
            self.config.model
        );
        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UpstreamError>(&body)
                .map(|err| err.error.message)
                .unwrap_or_else(|_| format!("upstream responded with HTTP {status}"));
            tracing::warn!("completion failed with {status}: {message}");
            return Err(ProseError::Upstream(message));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ProseError::Upstream("completion returned no text".to_string()))
    }
}

fn user_prompt(maneuvers: &[String]) -> String {
    let steps = maneuvers
        .iter()
        .enumerate()
        .map(|(idx, step)| format!("{}. {}", idx + 1, step.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Describe this driving route:\n{steps}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_keeps_order() {
        let prompt = user_prompt(&["Head north".into(), " Turn left ".into()]);
        assert_eq!(prompt, "Describe this driving route:\n1. Head north\n2. Turn left");
    }

    #[tokio::test]
    async fn test_missing_credential_skips_request() {
        let client = CompletionClient::new(ProseConfig::new(None)).unwrap();
        assert!(!client.has_credential());
        let err = client.narrate(&["Head north".into()]).await.unwrap_err();
        assert!(matches!(err, ProseError::MissingCredential));
    }
}
