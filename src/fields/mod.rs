//! Field heuristics run over normalized policy text.

mod amount;
mod assured;
mod insurer;

pub use amount::{extract_amounts, find_amounts};
pub use assured::extract_assured_name;
pub use insurer::{extract_insurer, DEFAULT_INSURERS};

/// Placeholder used when a field cannot be found.
pub const NOT_AVAILABLE: &str = "Not Available";

/// Lowercase and trim a value, or substitute the sentinel when it is empty.
pub fn clean_value(value: &str, sentinel: &str) -> String {
    if value.is_empty() {
        sentinel.to_string()
    } else {
        value.to_lowercase().trim().to_string()
    }
}
