//! Data types produced by the extraction pipeline.

mod extraction;
mod table;

pub use extraction::PolicyExtraction;
pub use table::{ResultTable, TableLayout, TableRow, COLUMNS, DEFAULT_BENEFITS, TOTAL_PREMIUMS};
