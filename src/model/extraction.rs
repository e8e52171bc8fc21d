//! Output of one extraction run.

use serde::{Deserialize, Serialize};

use super::ResultTable;

/// Everything extracted from a single policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyExtraction {
    /// Text as pulled from the PDF
    pub raw_text: String,

    /// Text after normalization; all fields are extracted from this
    pub normalized_text: String,

    /// Formatted currency amounts in document order
    pub amounts: Vec<String>,

    /// First person found, or the sentinel
    pub assured_name: String,

    /// First known insurer found, or the sentinel
    pub insurer: String,

    /// The assembled table
    pub table: ResultTable,
}

impl PolicyExtraction {
    /// Whether the assured name was found.
    pub fn has_assured_name(&self, sentinel: &str) -> bool {
        self.assured_name != sentinel
    }

    /// Whether an insurer was found.
    pub fn has_insurer(&self, sentinel: &str) -> bool {
        self.insurer != sentinel
    }

    /// Word count of the raw text.
    pub fn word_count(&self) -> usize {
        self.raw_text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::NOT_AVAILABLE;
    use crate::model::TableLayout;

    fn extraction(raw_text: &str, assured_name: &str) -> PolicyExtraction {
        PolicyExtraction {
            raw_text: raw_text.to_string(),
            normalized_text: raw_text.to_string(),
            amounts: Vec::new(),
            assured_name: assured_name.to_string(),
            insurer: NOT_AVAILABLE.to_string(),
            table: ResultTable::build(assured_name, &[], NOT_AVAILABLE, &TableLayout::default()),
        }
    }

    #[test]
    fn test_word_count_ignores_layout_whitespace() {
        let result = extraction("Policy  Schedule\nLife Assured:\tMr John Smith\n", "John Smith");
        assert_eq!(result.word_count(), 7);
        assert_eq!(extraction("", NOT_AVAILABLE).word_count(), 0);
    }

    #[test]
    fn test_found_flags_compare_against_sentinel() {
        let result = extraction("", "John Smith");
        assert!(result.has_assured_name(NOT_AVAILABLE));
        assert!(!result.has_insurer(NOT_AVAILABLE));
    }
}
