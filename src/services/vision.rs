//! Image-analysis captioning client.
//!
//! Unlike the layout service this endpoint is synchronous: one binary POST,
//! one JSON body back. The gender-neutral flag is always sent so captions
//! describe people without guessing.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

use crate::config::{ExtractionConfig, ENV_VISION_ENDPOINT, ENV_VISION_KEY};
use crate::error::ExtractError;
use crate::services::Captioner;

const SERVICE: &str = "caption";
const API_VERSION: &str = "2023-10-01";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Client for the remote image-captioning service.
#[derive(Debug)]
pub struct CaptionClient {
    http: reqwest::Client,
    endpoint: String,
    key: String,
}

impl CaptionClient {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            key: key.into(),
        }
    }

    /// Build a client from the run configuration, naming the missing
    /// environment variable when a setting is absent.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let endpoint = config.vision_endpoint.clone().ok_or_else(|| {
            ExtractError::InvalidConfig(format!("vision endpoint not set ({ENV_VISION_ENDPOINT})"))
        })?;
        let key = config.vision_key.clone().ok_or_else(|| {
            ExtractError::InvalidConfig(format!("vision API key not set ({ENV_VISION_KEY})"))
        })?;
        Ok(Self::new(endpoint, key))
    }
}

#[async_trait]
impl Captioner for CaptionClient {
    async fn caption(&self, image: &[u8]) -> Result<String, ExtractError> {
        let url = format!(
            "{}/computervision/imageanalysis:analyze\
             ?api-version={API_VERSION}&features=caption&gender-neutral-caption=true",
            self.endpoint
        );

        let response = self
            .http
            .post(&url)
            .header(KEY_HEADER, &self.key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
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

        let analysis: ImageAnalysis =
            response
                .json()
                .await
                .map_err(|e| ExtractError::MalformedResponse {
                    service: SERVICE,
                    detail: e.to_string(),
                })?;

        let caption = analysis
            .caption_result
            .ok_or_else(|| ExtractError::MalformedResponse {
                service: SERVICE,
                detail: "response carried no captionResult".into(),
            })?;
        debug!(
            "caption (confidence {:.2}): {}",
            caption.confidence, caption.text
        );
        Ok(caption.text)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageAnalysis {
    caption_result: Option<CaptionResult>,
}

#[derive(Debug, Deserialize)]
struct CaptionResult {
    text: String,
    #[serde(default)]
    confidence: f64,
}
