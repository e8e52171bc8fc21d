//! Currency amount scanning.

use once_cell::sync::Lazy;
use regex::Regex;

use super::clean_value;
use crate::locale::NumberLocale;

static RE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d+(?:,\d{3})*(?:\.\d+)?").unwrap());

/// Raw currency matches in document order, duplicates kept.
pub fn find_amounts(text: &str) -> Vec<&str> {
    RE_AMOUNT.find_iter(text).map(|m| m.as_str()).collect()
}

/// Currency amounts in document order, canonicalised with `locale`.
///
/// Amounts that fail to parse are kept as matched.
pub fn extract_amounts(text: &str, locale: &NumberLocale, sentinel: &str) -> Vec<String> {
    let amounts: Vec<String> = find_amounts(text)
        .into_iter()
        .map(|raw| clean_value(raw, sentinel))
        .map(|value| locale.format_amount_str(&value))
        .collect();

    log::debug!("found {} currency amounts", amounts.len());
    amounts
}
