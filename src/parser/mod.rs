//! PDF text extraction module.

mod options;
mod text_extractor;

pub use options::{ErrorMode, ExtractOptions};
pub use text_extractor::TextExtractor;
