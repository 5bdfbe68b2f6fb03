//! Image encoding: `DynamicImage` to JPEG bytes.
//!
//! JPEG because the artifact naming contract fixes `.jpg` page and figure
//! files, and the layout and caption services accept the same bytes as their
//! octet-stream bodies, so each image is encoded exactly once.

use std::io::Cursor;

use image::DynamicImage;
use tracing::trace;

/// Encode an image as JPEG.
///
/// pdfium hands back RGBA bitmaps; JPEG has no alpha channel, so the image
/// is flattened to RGB first.
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)?;
    trace!("encoded {}x{} image into {} JPEG bytes", image.width(), image.height(), buf.len());
    Ok(buf)
}
