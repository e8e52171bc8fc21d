//! Plain-text grid rendering for terminals.

use crate::model::ResultTable;

/// Render the table as an aligned grid with a rule under the header.
pub fn to_text_table(table: &ResultTable) -> String {
    let rows = table.to_rows();
    let mut widths = vec![0usize; table.column_count()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = |output: &mut String| {
        output.push('+');
        for width in &widths {
            output.push_str(&"-".repeat(width + 2));
            output.push('+');
        }
        output.push('\n');
    };

    let mut output = String::new();
    border(&mut output);
    for (i, row) in rows.iter().enumerate() {
        output.push('|');
        for (cell, width) in row.iter().zip(&widths) {
            let pad = width - cell.chars().count();
            output.push_str(&format!(" {}{} |", cell, " ".repeat(pad)));
        }
        output.push('\n');
        if i == 0 {
            border(&mut output);
        }
    }
    border(&mut output);

    output
}
