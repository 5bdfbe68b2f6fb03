//! Per-page figure stage: detect regions, crop, persist, caption.
//!
//! Figures within a page are processed one at a time; a failure from the
//! detector, the filesystem, or the captioner aborts the run. The only
//! locally-recovered condition is the size guard below.

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::geometry;
use crate::output::FigureCaption;
use crate::pipeline::encode;
use crate::pipeline::render::RenderedPage;
use crate::services::{Captioner, FigureDetector};

/// Smallest width or height the caption service accepts.
pub const MIN_CAPTION_DIMENSION: u32 = 50;
/// Largest width or height the caption service accepts.
pub const MAX_CAPTION_DIMENSION: u32 = 16000;

/// Caption recorded for a crop whose dimensions the caption service would
/// reject. The service-side limit is hard, so the remote call is skipped
/// entirely.
pub const INVALID_SIZE_CAPTION: &str = "Invalid image size. Size of image is too small or big.";

/// Detect, crop, persist, and caption every figure on one page.
///
/// Crops are written as `{output_dir}/{page_name}_fig{index}.jpg`, 0-based
/// and unpadded.
pub async fn process_page(
    page: &RenderedPage,
    output_dir: &Path,
    detector: &dyn FigureDetector,
    captioner: &dyn Captioner,
) -> Result<Vec<FigureCaption>, ExtractError> {
    let polygons = detector.detect_figures(&page.jpeg).await?;
    if polygons.is_empty() {
        debug!("page {}: no figures detected", page.index);
        return Ok(Vec::new());
    }
    info!("page {}: {} figure region(s)", page.index, polygons.len());

    // All crops are derived and persisted before any caption call, so the
    // page's artifacts are complete even if captioning aborts the run.
    let mut crops = Vec::with_capacity(polygons.len());
    for (figure_index, polygon) in polygons.iter().enumerate() {
        let rect = geometry::bounding_rect(polygon)?;
        let (x, y, width, height) = rect.to_pixel_crop(page.image.width(), page.image.height());
        let crop = page.image.crop_imm(x, y, width, height);

        let jpeg = encode::encode_jpeg(&crop)?;
        let path = output_dir.join(format!("{}_fig{}.jpg", page.name, figure_index));
        std::fs::write(&path, &jpeg).map_err(|e| ExtractError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;
        debug!(
            "page {}: figure {} cropped to {}x{} at ({}, {})",
            page.index, figure_index, width, height, x, y
        );
        crops.push((figure_index, rect, path, crop, jpeg));
    }

    let mut figures = Vec::with_capacity(crops.len());
    for (figure_index, rect, path, crop, jpeg) in crops {
        let caption = caption_figure(captioner, &crop, &jpeg).await?;
        figures.push(FigureCaption {
            page_index: page.index,
            figure_index,
            rect,
            path,
            caption,
        });
    }

    Ok(figures)
}

/// Caption one figure crop, guarding the remote call behind the service's
/// dimension limits.
///
/// A crop with width or height outside
/// [`MIN_CAPTION_DIMENSION`]..=[`MAX_CAPTION_DIMENSION`] short-circuits to
/// [`INVALID_SIZE_CAPTION`] without touching the network.
pub async fn caption_figure(
    captioner: &dyn Captioner,
    figure: &DynamicImage,
    jpeg: &[u8],
) -> Result<String, ExtractError> {
    let (width, height) = (figure.width(), figure.height());
    let captionable = MIN_CAPTION_DIMENSION..=MAX_CAPTION_DIMENSION;
    if !captionable.contains(&width) || !captionable.contains(&height) {
        warn!(
            "figure is {}x{}, outside the captionable range [{}, {}]; using sentinel caption",
            width, height, MIN_CAPTION_DIMENSION, MAX_CAPTION_DIMENSION
        );
        return Ok(INVALID_SIZE_CAPTION.to_string());
    }
    captioner.caption(jpeg).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCaptioner {
        calls: AtomicUsize,
    }

    impl CountingCaptioner {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Captioner for CountingCaptioner {
        async fn caption(&self, _image: &[u8]) -> Result<String, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("a diagram of a cylinder".to_string())
        }
    }

    fn white_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    #[tokio::test]
    async fn undersized_figure_yields_sentinel_without_remote_call() {
        let captioner = CountingCaptioner::new();
        let figure = white_image(10, 10);
        let jpeg = encode::encode_jpeg(&figure).unwrap();

        let caption = caption_figure(&captioner, &figure, &jpeg).await.unwrap();
        assert_eq!(caption, INVALID_SIZE_CAPTION);
        assert_eq!(captioner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn in_range_figure_invokes_the_captioner() {
        let captioner = CountingCaptioner::new();
        let figure = white_image(100, 100);
        let jpeg = encode::encode_jpeg(&figure).unwrap();

        let caption = caption_figure(&captioner, &figure, &jpeg).await.unwrap();
        assert_eq!(caption, "a diagram of a cylinder");
        assert_eq!(captioner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn one_oversized_dimension_is_enough_to_skip() {
        let captioner = CountingCaptioner::new();
        // Width in range, height below the minimum.
        let figure = white_image(100, 49);
        let jpeg = encode::encode_jpeg(&figure).unwrap();

        let caption = caption_figure(&captioner, &figure, &jpeg).await.unwrap();
        assert_eq!(caption, INVALID_SIZE_CAPTION);
        assert_eq!(captioner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn boundary_dimensions_are_captionable() {
        let captioner = CountingCaptioner::new();
        let figure = white_image(MIN_CAPTION_DIMENSION, MIN_CAPTION_DIMENSION);
        let jpeg = encode::encode_jpeg(&figure).unwrap();

        caption_figure(&captioner, &figure, &jpeg).await.unwrap();
        assert_eq!(captioner.calls.load(Ordering::SeqCst), 1);
    }
}
