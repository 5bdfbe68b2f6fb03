//! Result types returned by the extraction entry points.

use std::path::PathBuf;

use serde::Serialize;

use crate::geometry::Rect;

/// One captioned figure crop.
#[derive(Debug, Clone, Serialize)]
pub struct FigureCaption {
    /// 0-based page index within the document.
    pub page_index: usize,
    /// 0-based figure index within the page.
    pub figure_index: usize,
    /// Bounding rectangle of the detected region, in page-image pixels.
    pub rect: Rect,
    /// Where the cropped JPEG was written.
    pub path: PathBuf,
    /// Caption from the image-analysis service, or the fixed sentinel when
    /// the crop's dimensions fall outside the captionable range.
    pub caption: String,
}

/// Output of the figure pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct FigureRun {
    /// All captioned figures, in page order then figure order.
    pub figures: Vec<FigureCaption>,
    pub stats: RunStats,
}

/// Cleaned and reflowed text for one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageText {
    /// 0-based page index within the document.
    pub page_index: usize,
    /// Normalized lines space-joined in detection order, before reflow.
    pub source: String,
    /// Reflowed text as returned by the reflow service.
    pub text: String,
}

/// Output of the text pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct TextRun {
    /// Per-page results, in page order.
    pub pages: Vec<PageText>,
    pub stats: RunStats,
}

/// Timing and volume figures for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Pages rasterised and processed.
    pub page_count: usize,
    /// Wall-clock time spent rasterising, in milliseconds.
    pub render_duration_ms: u64,
    /// Wall-clock time spent in the per-page service stages, in milliseconds.
    pub service_duration_ms: u64,
    /// Wall-clock time for the whole run, in milliseconds.
    pub total_duration_ms: u64,
}
