//! Prompts for the reflow service.
//!
//! Centralising the prompt here keeps the HTTP client free of wording
//! concerns and lets tests inspect the exact instruction text without a
//! network call.

/// System message for the reflow chat call.
pub const REFLOW_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Line-break rules applied by the reflow service.
///
/// The joined page text arrives as one long space-separated string; the
/// service reinserts the line structure a reader expects.
pub const REFLOW_INSTRUCTIONS: &str = "\
Reinsert line breaks into the given text and return the result.
Follow these rules precisely:
1. Break the line when a sentence ends.
2. Break the line when a clause ends with a comma.
3. Never leave two or more consecutive spaces anywhere in the text.
Return only the reformatted text, with no commentary.";

/// Build the user message for one page's joined text.
pub fn reflow_request(text: &str) -> String {
    format!("{REFLOW_INSTRUCTIONS}\n\nThe text is:\n{text}")
}
