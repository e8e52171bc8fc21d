//! Spreadsheet export.
//!
//! Produces a workbook with one sheet: the header row in bold, then one row
//! per data row, columns in table order. Empty cells are left blank.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::Result;
use crate::model::{ResultTable, COLUMNS};

/// Default download name for the exported workbook.
pub const XLSX_FILE_NAME: &str = "extracted_table.xlsx";

/// MIME type of Office Open XML spreadsheets.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Name of the single worksheet.
pub const XLSX_SHEET_NAME: &str = "Sheet1";

fn fill_sheet(worksheet: &mut Worksheet, table: &ResultTable) -> Result<()> {
    worksheet.set_name(XLSX_SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (i, row) in table.body().iter().enumerate() {
        for (col, cell) in row.cells().iter().enumerate() {
            if !cell.is_empty() {
                worksheet.write_string(i as u32 + 1, col as u16, *cell)?;
            }
        }
    }

    worksheet.autofit();
    Ok(())
}

fn build_workbook(table: &ResultTable) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    fill_sheet(workbook.add_worksheet(), table)?;
    Ok(workbook)
}

/// Write the table to an `.xlsx` file.
pub fn write_xlsx<P: AsRef<Path>>(table: &ResultTable, path: P) -> Result<()> {
    let path = path.as_ref();
    build_workbook(table)?.save(path)?;
    log::debug!("wrote {} rows to {}", table.row_count(), path.display());
    Ok(())
}

/// Serialize the table to `.xlsx` bytes.
pub fn to_xlsx_bytes(table: &ResultTable) -> Result<Vec<u8>> {
    Ok(build_workbook(table)?.save_to_buffer()?)
}
