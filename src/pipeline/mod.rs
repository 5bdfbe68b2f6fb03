//! Pipeline stages.
//!
//! Each submodule implements exactly one transformation step, so every stage
//! is independently testable and the service-facing ones accept trait
//! objects in place of real clients.
//!
//! ## Data flow
//!
//! ```text
//! input ──▶ render ──▶ figures ──▶ captions
//! (path)   (pdfium)    (layout,     (vision)
//!                       crop)
//!                 └──▶ text ──▶ reflow
//!                      (layout+OCR,  (chat)
//!                       normalize)
//! ```
//!
//! 1. [`input`]   validates the user-supplied path and PDF magic bytes
//! 2. [`render`]  rasterises every page; runs in `spawn_blocking` because
//!    pdfium is not async-safe
//! 3. [`encode`]  JPEG-encodes a `DynamicImage` for service bodies and
//!    persisted artifacts
//! 4. [`figures`] derives crop rectangles from detected regions, persists
//!    the crops, and captions each one behind the size guard
//! 5. [`text`]    normalizes recognized lines, joins them, and reflows the
//!    page text

pub mod encode;
pub mod figures;
pub mod input;
pub mod render;
pub mod text;
