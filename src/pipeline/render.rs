//! PDF rasterisation: render every page to an image via pdfium.
//!
//! pdfium wraps a C++ library with thread-local state and must not run on
//! async worker threads; the whole render pass happens inside
//! `tokio::task::spawn_blocking`. Pages are persisted as
//! `{output_dir}/{doc_name}_P{index}.jpg` (0-based, unpadded) and also kept
//! in memory so later stages never re-read what this stage just wrote.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::pipeline::{encode, input};

/// One rasterised page, carried between stages in memory.
pub struct RenderedPage {
    /// 0-based page index within the document.
    pub index: usize,
    /// Artifact stem, `{doc_name}_P{index}`; figure crops derive their names
    /// from it.
    pub name: String,
    /// Where the page JPEG is (or would be) persisted.
    pub path: PathBuf,
    /// The rasterised page, used for cropping.
    pub image: DynamicImage,
    /// JPEG encoding of `image`; the persisted bytes and every service
    /// request body.
    pub jpeg: Vec<u8>,
}

impl RenderedPage {
    /// Wrap an in-memory page image, encoding its JPEG form once.
    ///
    /// Does not touch the filesystem; [`render_document`] persists pages
    /// after construction.
    pub fn from_image(
        index: usize,
        name: impl Into<String>,
        output_dir: &Path,
        image: DynamicImage,
    ) -> Result<Self, ExtractError> {
        let name = name.into();
        let jpeg = encode::encode_jpeg(&image)?;
        let path = output_dir.join(format!("{name}.jpg"));
        Ok(Self {
            index,
            name,
            path,
            image,
            jpeg,
        })
    }
}

/// Rasterise every page of a PDF and persist the page JPEGs.
pub async fn render_document(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<Vec<RenderedPage>, ExtractError> {
    let path = pdf_path.to_path_buf();
    let dpi = config.dpi;
    let output_dir = config.output_dir.clone();

    tokio::task::spawn_blocking(move || render_document_blocking(&path, dpi, &output_dir))
        .await
        .map_err(|e| ExtractError::Internal(format!("render task panicked: {e}")))?
}

/// Blocking implementation of page rendering.
fn render_document_blocking(
    pdf_path: &Path,
    dpi: u32,
    output_dir: &Path,
) -> Result<Vec<RenderedPage>, ExtractError> {
    let doc_name = input::document_name(pdf_path);

    std::fs::create_dir_all(output_dir).map_err(|e| ExtractError::OutputWriteFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let pdfium = Pdfium::default();
    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| ExtractError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    info!("loaded '{}': {} pages", doc_name, pages.len());

    let mut rendered = Vec::with_capacity(pages.len() as usize);
    for (index, page) in pages.iter().enumerate() {
        // Page geometry is in points (1/72 inch); scale to the configured DPI.
        let target_width = (page.width().value * dpi as f32 / 72.0).round().max(1.0) as i32;
        let render_config = PdfRenderConfig::new().set_target_width(target_width);

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| ExtractError::RasterisationFailed {
                    page: index,
                    detail: format!("{e:?}"),
                })?;
        let image = bitmap.as_image();
        debug!(
            "rendered page {} at {} dpi: {}x{} px",
            index,
            dpi,
            image.width(),
            image.height()
        );

        let rendered_page =
            RenderedPage::from_image(index, format!("{doc_name}_P{index}"), output_dir, image)?;
        std::fs::write(&rendered_page.path, &rendered_page.jpeg).map_err(|e| {
            ExtractError::OutputWriteFailed {
                path: rendered_page.path.clone(),
                source: e,
            }
        })?;
        rendered.push(rendered_page);
    }

    Ok(rendered)
}
