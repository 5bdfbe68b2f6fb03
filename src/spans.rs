//! Character spans over the layout service's flat content stream.
//!
//! Every recognized element (word, line, formula) is located by `(offset,
//! length)` into one concatenated character stream for the analyzed input.
//! [`Span::within_any`] answers whether a word's span falls inside one of a
//! line's spans, which is how words are associated with their enclosing line.
//!
//! Neither extraction pipeline currently consults the matcher; it is exposed
//! for callers that need word-to-line grouping on the recognized output.

use serde::{Deserialize, Serialize};

/// A half-open character range: valid offsets are
/// `[offset, offset + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// One past the last valid offset.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// True iff this span lies fully inside at least one of `spans`.
    pub fn within_any(&self, spans: &[Span]) -> bool {
        spans
            .iter()
            .any(|s| self.offset >= s.offset && self.end() <= s.end())
    }
}
