//! Document-layout analysis client.
//!
//! The layout service is asynchronous on the wire: submitting a page image
//! returns `202 Accepted` plus an `Operation-Location` URL, which is polled
//! until the analysis reaches a terminal state. Both pipelines drive the same
//! `prebuilt-layout` model with the formulas add-on enabled, so one client
//! implements both capability traits and the traits pull different parts out
//! of the same result payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::config::{ExtractionConfig, ENV_LAYOUT_ENDPOINT, ENV_LAYOUT_KEY};
use crate::error::ExtractError;
use crate::geometry::Polygon;
use crate::services::{FigureDetector, LineRecognizer, TextLine};

const SERVICE: &str = "layout";
const API_VERSION: &str = "2024-11-30";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Client for the remote layout/OCR service.
#[derive(Debug)]
pub struct LayoutClient {
    http: reqwest::Client,
    endpoint: String,
    key: String,
    poll_interval: Duration,
}

impl LayoutClient {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            key: key.into(),
            poll_interval: Duration::from_millis(1000),
        }
    }

    /// Build a client from the run configuration, naming the missing
    /// environment variable when a setting is absent.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let endpoint = config.layout_endpoint.clone().ok_or_else(|| {
            ExtractError::InvalidConfig(format!("layout endpoint not set ({ENV_LAYOUT_ENDPOINT})"))
        })?;
        let key = config.layout_key.clone().ok_or_else(|| {
            ExtractError::InvalidConfig(format!("layout API key not set ({ENV_LAYOUT_KEY})"))
        })?;
        let mut client = Self::new(endpoint, key);
        client.poll_interval = Duration::from_millis(config.poll_interval_ms);
        Ok(client)
    }

    /// Submit a page image and poll the operation to completion.
    async fn analyze(&self, image: &[u8]) -> Result<AnalyzeResult, ExtractError> {
        let url = format!(
            "{}/documentintelligence/documentModels/prebuilt-layout:analyze\
             ?api-version={API_VERSION}&features=formulas",
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

        let operation_url = response
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| ExtractError::MalformedResponse {
                service: SERVICE,
                detail: "missing Operation-Location header".into(),
            })?;
        debug!("layout analysis accepted; polling result");

        // No poll cap: a hung operation stalls the run rather than producing
        // a partial result.
        loop {
            sleep(self.poll_interval).await;

            let response = self
                .http
                .get(&operation_url)
                .header(KEY_HEADER, &self.key)
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

            let operation: AnalyzeOperation =
                response
                    .json()
                    .await
                    .map_err(|e| ExtractError::MalformedResponse {
                        service: SERVICE,
                        detail: e.to_string(),
                    })?;

            match operation.status.as_str() {
                "succeeded" => {
                    return operation.analyze_result.ok_or_else(|| {
                        ExtractError::MalformedResponse {
                            service: SERVICE,
                            detail: "operation succeeded without an analyzeResult".into(),
                        }
                    });
                }
                "failed" | "canceled" => {
                    return Err(ExtractError::AnalyzeFailed {
                        status: operation.status,
                    });
                }
                other => trace!("layout analysis still '{other}'"),
            }
        }
    }
}

#[async_trait]
impl FigureDetector for LayoutClient {
    async fn detect_figures(&self, image: &[u8]) -> Result<Vec<Polygon>, ExtractError> {
        let result = self.analyze(image).await?;

        let mut polygons = Vec::new();
        for (figure_idx, figure) in result.figures.iter().enumerate() {
            for region in &figure.bounding_regions {
                debug!(
                    "figure {} on page {} within polygon {:?}",
                    figure_idx, region.page_number, region.polygon
                );
                polygons.push(region.polygon.clone());
            }
        }
        Ok(polygons)
    }
}

#[async_trait]
impl LineRecognizer for LayoutClient {
    async fn recognize_lines(&self, image: &[u8]) -> Result<Vec<TextLine>, ExtractError> {
        let result = self.analyze(image).await?;

        // One request carries one page image, but the payload still nests
        // lines under pages; flatten in page order.
        let mut lines = Vec::new();
        for page in result.pages {
            debug!(
                "page {}: {}x{} {}, {} line(s)",
                page.page_number,
                page.width.unwrap_or_default(),
                page.height.unwrap_or_default(),
                page.unit.as_deref().unwrap_or("px"),
                page.lines.len()
            );
            lines.extend(page.lines);
        }
        Ok(lines)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResult {
    #[serde(default)]
    figures: Vec<DocumentFigure>,
    #[serde(default)]
    pages: Vec<DocumentPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentFigure {
    #[serde(default)]
    bounding_regions: Vec<BoundingRegion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundingRegion {
    page_number: u32,
    polygon: Polygon,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentPage {
    page_number: u32,
    width: Option<f64>,
    height: Option<f64>,
    unit: Option<String>,
    #[serde(default)]
    lines: Vec<TextLine>,
}
