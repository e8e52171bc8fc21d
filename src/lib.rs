//! # policy-extract
//!
//! Pulls the assured person, benefit amounts and insurer out of insurance
//! policy PDFs and lays them out as a fixed table ready for a spreadsheet.
//!
//! ## Quick Start
//!
//! ```no_run
//! use policy_extract::{extract_file, render};
//!
//! fn main() -> policy_extract::Result<()> {
//!     let extraction = extract_file("policy.pdf")?;
//!     println!("{}", render::to_text_table(&extraction.table));
//!     render::write_xlsx(&extraction.table, render::XLSX_FILE_NAME)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. Text is read page by page and concatenated ([`TextExtractor`]).
//! 2. The text is normalized ([`normalize()`]).
//! 3. Amounts, the assured name and the insurer are extracted ([`fields`]).
//! 4. The result table is assembled ([`ResultTable::build`]).
//!
//! Amounts are matched to benefit rows by position only: the first two
//! amounts in the document fill the first benefit, and so on.

pub mod config;
pub mod detect;
pub mod error;
pub mod fields;
pub mod locale;
pub mod model;
pub mod ner;
pub mod normalize;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use config::ExtractionConfig;
pub use detect::{is_pdf_bytes, sniff_bytes, sniff_file, PdfHeader};
pub use error::{Error, Result};
pub use fields::NOT_AVAILABLE;
pub use locale::NumberLocale;
pub use model::{PolicyExtraction, ResultTable, TableLayout, TableRow, COLUMNS};
pub use ner::{Entity, EntityLabel, EntityRecognizer, RuleBasedRecognizer};
pub use normalize::normalize;
pub use parser::{ErrorMode, ExtractOptions, TextExtractor};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Extract policy fields from a PDF file with default settings.
///
/// # Example
///
/// ```no_run
/// let extraction = policy_extract::extract_file("policy.pdf").unwrap();
/// println!("Assured: {}", extraction.assured_name);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<PolicyExtraction> {
    PolicyExtractor::new().extract_file(path)
}

/// Extract policy fields from PDF bytes with default settings.
pub fn extract_bytes(data: &[u8]) -> Result<PolicyExtraction> {
    PolicyExtractor::new().extract_bytes(data)
}

/// Extract the raw text of a PDF file, pages concatenated in order.
///
/// # Example
///
/// ```no_run
/// let text = policy_extract::extract_text("policy.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    TextExtractor::open(path)?.extract_text()
}

/// Builder for running the extraction pipeline.
///
/// # Example
///
/// ```no_run
/// use policy_extract::{ExtractionConfig, NumberLocale, PolicyExtractor};
///
/// let extraction = PolicyExtractor::new()
///     .with_config(ExtractionConfig::default().with_insurers(["Acme Mutual"]))
///     .with_locale(NumberLocale::from_env())
///     .strict()
///     .extract_file("policy.pdf")?;
/// # Ok::<(), policy_extract::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct PolicyExtractor {
    extract_options: ExtractOptions,
    config: ExtractionConfig,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
}

impl PolicyExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the extraction configuration.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number locale used for amounts.
    pub fn with_locale(mut self, locale: NumberLocale) -> Self {
        self.config.locale = locale;
        self
    }

    /// Set PDF text extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Fail when any page cannot be read.
    pub fn strict(mut self) -> Self {
        self.extract_options = self.extract_options.strict();
        self
    }

    /// Use a specific recognizer instead of the process-wide one.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    fn recognizer(&self) -> &dyn EntityRecognizer {
        match &self.recognizer {
            Some(recognizer) => recognizer.as_ref(),
            None => ner::global(),
        }
    }

    /// Run the pipeline on a PDF file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<PolicyExtraction> {
        let extractor = TextExtractor::open_with_options(path, self.extract_options.clone())?;
        Ok(self.extract_from_text(extractor.extract_text()?))
    }

    /// Run the pipeline on PDF bytes.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<PolicyExtraction> {
        let extractor = TextExtractor::from_bytes_with_options(data, self.extract_options.clone())?;
        Ok(self.extract_from_text(extractor.extract_text()?))
    }

    /// Run the pipeline on a PDF read from `reader`.
    pub fn extract_reader<R: Read>(&self, reader: R) -> Result<PolicyExtraction> {
        let extractor =
            TextExtractor::from_reader_with_options(reader, self.extract_options.clone())?;
        Ok(self.extract_from_text(extractor.extract_text()?))
    }

    /// Run the text stages of the pipeline on already-extracted document text.
    pub fn extract_from_text(&self, raw_text: impl Into<String>) -> PolicyExtraction {
        let raw_text = raw_text.into();
        let normalized_text = normalize(&raw_text);
        let sentinel = self.config.sentinel.as_str();

        let assured_name =
            fields::extract_assured_name(&normalized_text, self.recognizer(), sentinel);
        let amounts = fields::extract_amounts(&normalized_text, &self.config.locale, sentinel);
        let insurer = fields::extract_insurer(&normalized_text, &self.config.insurers, sentinel);
        let table = ResultTable::build(&assured_name, &amounts, &insurer, &self.config.layout);

        log::info!(
            "assured={:?} insurer={:?} amounts={}",
            assured_name,
            insurer,
            amounts.len()
        );

        PolicyExtraction {
            raw_text,
            normalized_text,
            amounts,
            assured_name,
            insurer,
            table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> PolicyExtractor {
        PolicyExtractor::new().with_recognizer(Arc::new(RuleBasedRecognizer::new()))
    }

    #[test]
    fn test_full_text_pipeline() {
        let raw = "POLICY SCHEDULE\nLife Assured: Mr John Smith\n\
                   Life Cover: $500,000 (premium $45.10/month)\n\
                   TPD: $250,000 - $20.5\n\
                   Income Protection: $4,000 p.m. - $61.75\n\
                   Insurer: Partner Life";
        let result = extractor().extract_from_text(raw);

        assert_eq!(result.assured_name, "John Smith");
        assert_eq!(result.insurer, "Partner Life");
        assert_eq!(
            result.amounts,
            vec!["500,000.00", "45.10", "250,000.00", "20.50", "4,000.00", "61.75"]
        );
        assert_eq!(result.table.cell(1, 2), Some("500,000.00"));
        assert_eq!(result.table.cell(3, 3), Some("61.75"));
        assert_eq!(result.table.cell(4, 4), Some("Partner Life"));
        assert!(result.has_assured_name(NOT_AVAILABLE));
    }

    #[test]
    fn test_nothing_found_uses_sentinels() {
        let result = extractor().extract_from_text("just some lowercase words without money");

        assert_eq!(result.assured_name, NOT_AVAILABLE);
        assert_eq!(result.insurer, NOT_AVAILABLE);
        assert!(result.amounts.is_empty());
        for row in 1..=3 {
            assert_eq!(result.table.cell(row, 0), Some(NOT_AVAILABLE));
            assert_eq!(result.table.cell(row, 2), Some(""));
            assert_eq!(result.table.cell(row, 3), Some(""));
            assert_eq!(result.table.cell(row, 4), Some(NOT_AVAILABLE));
        }
        assert_eq!(result.table.cell(4, 0), Some(""));
        assert_eq!(result.table.cell(4, 4), Some(NOT_AVAILABLE));
    }

    #[test]
    fn test_custom_sentinel_and_locale() {
        let config = ExtractionConfig::default().with_sentinel("-");
        let result = extractor()
            .with_config(config)
            .with_locale(NumberLocale::from_tag("de_DE").unwrap())
            .extract_from_text("amount $2,000");

        assert_eq!(result.assured_name, "-");
        assert_eq!(result.amounts, vec!["2,00"]);
    }

    #[test]
    fn test_builder_options() {
        let builder = PolicyExtractor::new().strict();
        assert_eq!(builder.extract_options.error_mode, ErrorMode::Strict);
        assert_eq!(builder.config().sentinel, NOT_AVAILABLE);
    }

    #[test]
    fn test_extract_bytes_rejects_non_pdf() {
        assert!(matches!(
            extract_bytes(b"<html></html>"),
            Err(Error::UnknownFormat)
        ));
    }
}
