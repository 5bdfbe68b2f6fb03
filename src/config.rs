//! Run configuration: endpoints, credentials, and render settings.
//!
//! Everything a run needs lives in one [`ExtractionConfig`], built once per
//! process invocation and immutable afterwards. Service clients borrow the
//! pieces they need at construction, so no module reads the environment at
//! call time.

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::error::ExtractError;

/// Environment variable holding the layout-service endpoint.
pub const ENV_LAYOUT_ENDPOINT: &str = "DOCUMENT_INTELLIGENCE_ENDPOINT";
/// Environment variable holding the layout-service API key.
pub const ENV_LAYOUT_KEY: &str = "DOCUMENT_INTELLIGENCE_API_KEY";
/// Environment variable holding the image-analysis endpoint.
pub const ENV_VISION_ENDPOINT: &str = "VISION_ENDPOINT";
/// Environment variable holding the image-analysis API key.
pub const ENV_VISION_KEY: &str = "VISION_KEY";
/// Environment variable holding the reflow-service API key.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Configuration for an extraction run.
///
/// Built via [`ExtractionConfig::builder()`], [`ExtractionConfig::from_env()`],
/// or [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pagemill::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .output_dir("out")
///     .dpi(450)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 450);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Directory receiving rendered pages and figure crops. Default: `output`.
    pub output_dir: PathBuf,

    /// Rendering DPI used when rasterising each PDF page. Range: 72-600.
    /// Default: 300.
    ///
    /// 300 keeps small print legible for the layout service; dense workbook
    /// pages may need 450.
    pub dpi: u32,

    /// Layout-service endpoint, e.g. `https://<resource>.cognitiveservices.azure.com`.
    pub layout_endpoint: Option<String>,

    /// Layout-service API key.
    pub layout_key: Option<String>,

    /// Image-analysis endpoint for figure captioning.
    pub vision_endpoint: Option<String>,

    /// Image-analysis API key.
    pub vision_key: Option<String>,

    /// API key for the reflow service.
    pub openai_api_key: Option<String>,

    /// Chat model used to reflow page text. Default: `gpt-4o-mini`.
    pub reflow_model: String,

    /// Delay between layout-operation status polls, in milliseconds.
    /// Default: 1000.
    pub poll_interval_ms: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            dpi: 300,
            layout_endpoint: None,
            layout_key: None,
            vision_endpoint: None,
            vision_key: None,
            openai_api_key: None,
            reflow_model: "gpt-4o-mini".to_string(),
            poll_interval_ms: 1000,
        }
    }
}

// Keys stay out of logs.
impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ExtractionConfig")
            .field("output_dir", &self.output_dir)
            .field("dpi", &self.dpi)
            .field("layout_endpoint", &self.layout_endpoint)
            .field("layout_key", &redact(&self.layout_key))
            .field("vision_endpoint", &self.vision_endpoint)
            .field("vision_key", &redact(&self.vision_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("reflow_model", &self.reflow_model)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read service settings from the environment.
    ///
    /// Unset or empty variables leave the corresponding field `None`; the
    /// affected client constructor reports which variable is missing when a
    /// pipeline actually needs it.
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            layout_endpoint: var(ENV_LAYOUT_ENDPOINT),
            layout_key: var(ENV_LAYOUT_KEY),
            vision_endpoint: var(ENV_VISION_ENDPOINT),
            vision_key: var(ENV_VISION_KEY),
            openai_api_key: var(ENV_OPENAI_API_KEY),
            ..Self::default()
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn layout(mut self, endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        self.config.layout_endpoint = Some(endpoint.into());
        self.config.layout_key = Some(key.into());
        self
    }

    pub fn vision(mut self, endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        self.config.vision_endpoint = Some(endpoint.into());
        self.config.vision_key = Some(key.into());
        self
    }

    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.openai_api_key = Some(key.into());
        self
    }

    pub fn reflow_model(mut self, model: impl Into<String>) -> Self {
        self.config.reflow_model = model.into();
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(ExtractError::InvalidConfig(format!(
                "DPI must be 72-600, got {}",
                c.dpi
            )));
        }
        if c.reflow_model.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "reflow model must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
