//! Text normalization applied before field extraction.
//!
//! Everything except word characters, whitespace and the amount punctuation
//! (`$`, `.`, `,`, `-`) is dropped, then whitespace runs collapse to one
//! space. Separators from locales that use other symbols are lost.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s$.,\-]").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw document text.
pub fn normalize(text: &str) -> String {
    let stripped = RE_DISALLOWED.replace_all(text, "");
    let collapsed = RE_WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}
