//! Insurer lookup against a known-name vocabulary.

/// Known insurers, in match priority order.
///
/// Longer names precede names they contain (`AIA New Zealand` before `AIA`).
pub const DEFAULT_INSURERS: &[&str] = &[
    "Asteron",
    "Asteron life",
    "Chubb Life",
    "Partner Life",
    "AIA New Zealand",
    "AIA",
    "Accuro",
    "Fidelity Life",
    "Southern Cross",
];

/// First insurer in `insurers` whose name occurs anywhere in `text`, ignoring case.
///
/// List order decides, not position in the text.
pub fn extract_insurer<S: AsRef<str>>(text: &str, insurers: &[S], sentinel: &str) -> String {
    let haystack = text.to_lowercase();

    for name in insurers {
        let name: &str = name.as_ref();
        if !name.is_empty() && haystack.contains(&name.to_lowercase()) {
            return name.to_string();
        }
    }
    sentinel.to_string()
}
