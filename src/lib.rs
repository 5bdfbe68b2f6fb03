//! # pagemill
//!
//! Extract captioned figures and reflowed text from PDF documents using
//! remote document-analysis services.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate the local document path
//!  ├─ 2. Render   rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  │
//!  ├─ figures:    per page, in order:
//!  │    3. Detect   remote layout analysis returns figure polygons
//!  │    4. Crop     polygon → bounding rectangle → JPEG crop on disk
//!  │    5. Caption  remote captioning per crop, behind a size guard
//!  │
//!  └─ text:       per page, in order:
//!       3. Recognize  remote layout+OCR returns text lines
//!       4. Normalize  drop formula placeholders and bare numerics, join
//!       5. Reflow     remote service reinserts line breaks
//! ```
//!
//! Pages and figures are processed strictly sequentially, and any failure
//! beyond the caption size guard aborts the run. The remote services sit
//! behind the capability traits in [`services`], so tests drive both
//! pipelines with deterministic fixtures instead of the network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagemill::{extract_figures, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Endpoints and keys from DOCUMENT_INTELLIGENCE_* / VISION_* vars
//!     let config = ExtractionConfig::from_env();
//!     let run = extract_figures("input/edu_01.pdf", &config).await?;
//!     for figure in &run.figures {
//!         println!("{}: {}", figure.path.display(), figure.caption);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Artifact naming
//!
//! Rendered pages land at `{output_dir}/{doc_name}_P{page_index}.jpg` and
//! figure crops at `{output_dir}/{page_name}_fig{fig_index}.jpg`, 0-based
//! indices without padding. Surrounding tooling keys on these names.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod services;
pub mod spans;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::ExtractError;
pub use extract::{
    extract_figures, extract_figures_from_pages, extract_figures_with, extract_text,
    extract_text_from_pages, extract_text_with,
};
pub use geometry::{bounding_rect, Polygon, Rect};
pub use normalize::{normalize_line, FORMULA_PLACEHOLDER};
pub use output::{FigureCaption, FigureRun, PageText, RunStats, TextRun};
pub use pipeline::figures::{INVALID_SIZE_CAPTION, MAX_CAPTION_DIMENSION, MIN_CAPTION_DIMENSION};
pub use pipeline::render::RenderedPage;
pub use services::{Captioner, FigureDetector, LineRecognizer, TextLine, TextReflow};
pub use spans::Span;
