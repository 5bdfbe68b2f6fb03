//! Per-page text stage: recognize lines, normalize, join, reflow.

use tracing::debug;

use crate::error::ExtractError;
use crate::normalize::normalize_line;
use crate::output::PageText;
use crate::pipeline::render::RenderedPage;
use crate::services::{LineRecognizer, TextReflow};

/// Recognize and reflow the text of one page.
///
/// Lines arrive in detection order; each is normalized, empties are dropped,
/// the survivors are space-joined, and the joined string is passed whole to
/// the reflow service.
pub async fn process_page(
    page: &RenderedPage,
    recognizer: &dyn LineRecognizer,
    reflow: &dyn TextReflow,
) -> Result<PageText, ExtractError> {
    let lines = recognizer.recognize_lines(&page.jpeg).await?;
    debug!("page {}: {} recognized line(s)", page.index, lines.len());

    let kept: Vec<String> = lines
        .iter()
        .map(|line| normalize_line(&line.content))
        .filter(|text| !text.is_empty())
        .collect();
    let source = kept.join(" ");
    debug!(
        "page {}: kept {} of {} line(s)",
        page.index,
        kept.len(),
        lines.len()
    );

    let text = reflow.reflow(&source).await?;
    Ok(PageText {
        page_index: page.index,
        source,
        text,
    })
}
