//! Chat-completions client that reflows a page's joined text.
//!
//! The service's internal line-break heuristics are opaque; this client only
//! guarantees the black-box contract of string in, reformatted string out.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::{ExtractionConfig, ENV_OPENAI_API_KEY};
use crate::error::ExtractError;
use crate::prompts;
use crate::services::TextReflow;

const SERVICE: &str = "reflow";
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Client for the remote text-reflow service.
#[derive(Debug)]
pub struct ReflowClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl ReflowClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Build a client from the run configuration, naming the missing
    /// environment variable when the key is absent.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let api_key = config.openai_api_key.clone().ok_or_else(|| {
            ExtractError::InvalidConfig(format!("reflow API key not set ({ENV_OPENAI_API_KEY})"))
        })?;
        Ok(Self::new(api_key, config.reflow_model.clone()))
    }
}

#[async_trait]
impl TextReflow for ReflowClient {
    async fn reflow(&self, text: &str) -> Result<String, ExtractError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompts::REFLOW_SYSTEM_PROMPT},
                {"role": "user", "content": prompts::reflow_request(text)},
            ],
        });

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractError::RequestFailed {
                service: SERVICE,
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::ServiceStatus {
                service: SERVICE,
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let completion: ChatCompletion =
            response
                .json()
                .await
                .map_err(|e| ExtractError::MalformedResponse {
                    service: SERVICE,
                    detail: e.to_string(),
                })?;

        let choice =
            completion
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ExtractError::MalformedResponse {
                    service: SERVICE,
                    detail: "completion carried no choices".into(),
                })?;
        debug!("reflowed {} chars into {} chars", text.len(), choice.message.content.len());
        Ok(choice.message.content)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_response_parses() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "line one\nline two"}}
            ]
        }"#;
        let completion: ChatCompletion = serde_json::from_str(body).unwrap();
        assert_eq!(completion.choices[0].message.content, "line one\nline two");
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = ExtractionConfig::default();
        let err = ReflowClient::from_config(&config).unwrap_err();
        assert!(err.to_string().contains(ENV_OPENAI_API_KEY));
    }
}
