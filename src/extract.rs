//! Extraction entry points.
//!
//! Three seams per pipeline, from most to least convenient:
//!
//! * `extract_*` builds the production service clients from the config and
//!   runs the whole pipeline.
//! * `extract_*_with` accepts caller-supplied clients (trait objects), which
//!   is how tests substitute deterministic fixtures for the network.
//! * `extract_*_from_pages` skips rasterisation and starts from in-memory
//!   pages, so scenarios need neither pdfium nor a PDF on disk.
//!
//! Execution is strictly sequential: pages one at a time, each remote call
//! awaited before the next begins, figures within a page in order. Any
//! failure past the size guard aborts the run with no partial recovery.

use std::time::Instant;

use tracing::info;

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{FigureRun, RunStats, TextRun};
use crate::pipeline::render::RenderedPage;
use crate::pipeline::{figures, input, render, text};
use crate::services::{
    CaptionClient, Captioner, FigureDetector, LayoutClient, LineRecognizer, ReflowClient,
    TextReflow,
};

/// Extract and caption every figure in a PDF document.
///
/// This is the primary entry point for the figure pipeline; service clients
/// are built from `config`.
pub async fn extract_figures(
    input: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<FigureRun, ExtractError> {
    let detector = LayoutClient::from_config(config)?;
    let captioner = CaptionClient::from_config(config)?;
    extract_figures_with(input.as_ref(), config, &detector, &captioner).await
}

/// Figure pipeline with caller-supplied detector and captioner.
pub async fn extract_figures_with(
    input_path: &str,
    config: &ExtractionConfig,
    detector: &dyn FigureDetector,
    captioner: &dyn Captioner,
) -> Result<FigureRun, ExtractError> {
    let total_start = Instant::now();
    info!("starting figure extraction: {input_path}");

    let pdf_path = input::resolve_pdf(input_path)?;

    let render_start = Instant::now();
    let pages = render::render_document(&pdf_path, config).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    let mut run = extract_figures_from_pages(&pages, config, detector, captioner).await?;
    run.stats.render_duration_ms = render_duration_ms;
    run.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "figure extraction complete: {} figure(s) across {} page(s) in {}ms",
        run.figures.len(),
        run.stats.page_count,
        run.stats.total_duration_ms
    );
    Ok(run)
}

/// Figure pipeline over already-rendered pages.
pub async fn extract_figures_from_pages(
    pages: &[RenderedPage],
    config: &ExtractionConfig,
    detector: &dyn FigureDetector,
    captioner: &dyn Captioner,
) -> Result<FigureRun, ExtractError> {
    std::fs::create_dir_all(&config.output_dir).map_err(|e| ExtractError::OutputWriteFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let service_start = Instant::now();
    let mut all_figures = Vec::new();
    for page in pages {
        let page_figures =
            figures::process_page(page, &config.output_dir, detector, captioner).await?;
        all_figures.extend(page_figures);
    }
    let service_duration_ms = service_start.elapsed().as_millis() as u64;

    Ok(FigureRun {
        figures: all_figures,
        stats: RunStats {
            page_count: pages.len(),
            render_duration_ms: 0,
            service_duration_ms,
            total_duration_ms: service_duration_ms,
        },
    })
}

/// Recognize, clean, and reflow the text of a PDF document.
///
/// This is the primary entry point for the text pipeline; service clients
/// are built from `config`.
pub async fn extract_text(
    input: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<TextRun, ExtractError> {
    let recognizer = LayoutClient::from_config(config)?;
    let reflow = ReflowClient::from_config(config)?;
    extract_text_with(input.as_ref(), config, &recognizer, &reflow).await
}

/// Text pipeline with caller-supplied recognizer and reflow service.
pub async fn extract_text_with(
    input_path: &str,
    config: &ExtractionConfig,
    recognizer: &dyn LineRecognizer,
    reflow: &dyn TextReflow,
) -> Result<TextRun, ExtractError> {
    let total_start = Instant::now();
    info!("starting text extraction: {input_path}");

    let pdf_path = input::resolve_pdf(input_path)?;

    let render_start = Instant::now();
    let pages = render::render_document(&pdf_path, config).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    let mut run = extract_text_from_pages(&pages, recognizer, reflow).await?;
    run.stats.render_duration_ms = render_duration_ms;
    run.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "text extraction complete: {} page(s) in {}ms",
        run.stats.page_count, run.stats.total_duration_ms
    );
    Ok(run)
}

/// Text pipeline over already-rendered pages.
pub async fn extract_text_from_pages(
    pages: &[RenderedPage],
    recognizer: &dyn LineRecognizer,
    reflow: &dyn TextReflow,
) -> Result<TextRun, ExtractError> {
    let service_start = Instant::now();
    let mut page_texts = Vec::with_capacity(pages.len());
    for page in pages {
        page_texts.push(text::process_page(page, recognizer, reflow).await?);
    }
    let service_duration_ms = service_start.elapsed().as_millis() as u64;

    Ok(TextRun {
        pages: page_texts,
        stats: RunStats {
            page_count: pages.len(),
            render_duration_ms: 0,
            service_duration_ms,
            total_duration_ms: service_duration_ms,
        },
    })
}
