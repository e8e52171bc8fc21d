//! Error types for policy-extract.

use std::io;
use thiserror::Error;

/// Result type alias for policy-extract operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting policy fields.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as a PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we cannot read.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid extraction configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Numeric locale could not be resolved.
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// The entity recognizer failed to load or run.
    #[error("Entity recognizer error: {0}")]
    Recognizer(String),

    /// A process-wide recognizer was already installed.
    #[error("An entity recognizer is already installed")]
    RecognizerAlreadyInstalled,

    /// Spreadsheet export failed.
    #[error("Export error: {0}")]
    Export(String),

    /// Error during rendering (text table, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Export(err.to_string())
    }
}
