//! Line cleanup applied to recognized text before joining.
//!
//! The layout service replaces inline formulas with a placeholder token and
//! frequently emits bare page numbers or equation numbers as their own lines.
//! Neither survives into the page text: placeholder-only and numeric-only
//! lines are dropped, and embedded placeholders are stripped.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// The token the layout service substitutes for a recognized formula region.
pub const FORMULA_PLACEHOLDER: &str = ":formula:";

/// Integer or decimal literal, optional leading minus, full-string match.
static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

/// Clean one recognized line.
///
/// A line that is exactly the formula placeholder, or that reduces to a bare
/// numeric literal once placeholders are stripped, becomes the empty string;
/// any other line is returned with placeholder occurrences removed.
pub fn normalize_line(text: &str) -> String {
    if text == FORMULA_PLACEHOLDER {
        return String::new();
    }

    let stripped: Cow<'_, str> = if text.contains(FORMULA_PLACEHOLDER) {
        Cow::Owned(text.replace(FORMULA_PLACEHOLDER, ""))
    } else {
        Cow::Borrowed(text)
    };

    if NUMERIC_LITERAL.is_match(&stripped) {
        return String::new();
    }

    stripped.into_owned()
}
