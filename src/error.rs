//! Error types for the pagemill library.
//!
//! A single fatal error enum: any failure other than the figure-size guard
//! (which resolves to a sentinel caption, see [`crate::pipeline::figures`])
//! aborts the run. There is no retry and no partial-result recovery; errors
//! carry whatever detail the underlying failure naturally provides.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pagemill library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("document not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("file is not a valid PDF: '{path}' (first bytes: {magic:?})")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not open the document.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error for a specific page (0-based).
    #[error("rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Geometry errors ───────────────────────────────────────────────────
    /// A bounding polygon did not contain an even, non-zero number of
    /// coordinates.
    #[error("bounding polygon has {len} coordinates; expected a non-empty even count")]
    MalformedPolygon { len: usize },

    // ── Remote-service errors ─────────────────────────────────────────────
    /// The HTTP request itself failed (connection, TLS, etc.).
    #[error("{service} request failed: {source}")]
    RequestFailed {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success HTTP status.
    #[error("{service} returned HTTP {status}: {message}")]
    ServiceStatus {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The service answered 2xx but the body was not what we expect.
    #[error("{service} returned an unexpected response: {detail}")]
    MalformedResponse {
        service: &'static str,
        detail: String,
    },

    /// The layout analysis operation finished in a terminal non-success state.
    #[error("layout analysis ended with status '{status}'")]
    AnalyzeFailed { status: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// JPEG encoding of a page or figure failed.
    #[error("failed to encode image: {0}")]
    ImageEncoding(#[from] image::ImageError),

    /// Could not create or write an output artifact.
    #[error("failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// A required setting is missing or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_polygon_display() {
        let e = ExtractError::MalformedPolygon { len: 7 };
        assert!(e.to_string().contains("7 coordinates"), "got: {e}");
    }

    #[test]
    fn service_status_display() {
        let e = ExtractError::ServiceStatus {
            service: "caption",
            status: 401,
            message: "key rejected".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("caption"));
        assert!(msg.contains("401"));
    }

    #[test]
    fn analyze_failed_display() {
        let e = ExtractError::AnalyzeFailed {
            status: "failed".into(),
        };
        assert!(e.to_string().contains("'failed'"));
    }
}
