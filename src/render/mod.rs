//! Rendering the result table for display and export.

mod json;
mod text;
pub mod xlsx;

pub use json::{to_json, JsonFormat};
pub use text::to_text_table;
pub use xlsx::{to_xlsx_bytes, write_xlsx, XLSX_FILE_NAME, XLSX_MIME_TYPE, XLSX_SHEET_NAME};
