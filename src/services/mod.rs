//! Remote collaborators behind small capability traits.
//!
//! The pipelines depend only on these traits, never on a concrete client, so
//! deterministic test doubles can stand in for the network. The production
//! implementations live in the submodules:
//!
//! 1. [`layout`]: document-layout analysis; one client implements both
//!    [`FigureDetector`] and [`LineRecognizer`] over the same operation
//! 2. [`vision`]: image captioning
//! 3. [`reflow`]: chat-based text reflow

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ExtractError;
use crate::geometry::Polygon;
use crate::spans::Span;

pub mod layout;
pub mod reflow;
pub mod vision;

pub use layout::LayoutClient;
pub use reflow::ReflowClient;
pub use vision::CaptionClient;

/// One recognized text line, in detection order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextLine {
    /// Raw recognized text, possibly containing formula placeholders.
    pub content: String,
    /// Character spans this line covers in the service's content stream.
    #[serde(default)]
    pub spans: Vec<Span>,
}

/// Locates figure regions on a single page image.
#[async_trait]
pub trait FigureDetector: Send + Sync {
    /// Returns the bounding polygon of every detected figure region, zero or
    /// more per page.
    async fn detect_figures(&self, image: &[u8]) -> Result<Vec<Polygon>, ExtractError>;
}

/// Recognizes text lines on a single page image, in reading order.
#[async_trait]
pub trait LineRecognizer: Send + Sync {
    async fn recognize_lines(&self, image: &[u8]) -> Result<Vec<TextLine>, ExtractError>;
}

/// Produces a short descriptive caption for an image.
///
/// Callers validate image dimensions first; see
/// [`crate::pipeline::figures::caption_figure`].
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, image: &[u8]) -> Result<String, ExtractError>;
}

/// Reinserts line breaks into a page's joined text.
#[async_trait]
pub trait TextReflow: Send + Sync {
    async fn reflow(&self, text: &str) -> Result<String, ExtractError>;
}
