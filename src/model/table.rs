//! Result table types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Column headers, in output order.
pub const COLUMNS: [&str; 5] = [
    "Assured Name",
    "Benefit Type",
    "Level",
    "Monthly Premium",
    "Insurer",
];

/// Benefit rows of the default layout.
pub const DEFAULT_BENEFITS: &[&str] = &[
    "Life Cover",
    "Standalone Total & Permanent Disablement",
    "Income Protection",
];

/// Label of the closing totals row.
pub const TOTAL_PREMIUMS: &str = "Total Premiums";

/// Which benefit rows the table carries and how the closing row is labelled.
///
/// Benefit `i` takes amounts `2i` (level) and `2i + 1` (monthly premium).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    /// Benefit type of each data row, in order
    pub benefits: Vec<String>,
    /// Benefit-type cell of the closing row
    pub total_label: String,
}

impl TableLayout {
    /// Create a layout from benefit names.
    pub fn new<I, S>(benefits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            benefits: benefits.into_iter().map(Into::into).collect(),
            total_label: TOTAL_PREMIUMS.to_string(),
        }
    }

    /// Set the closing row label.
    pub fn with_total_label(mut self, label: impl Into<String>) -> Self {
        self.total_label = label.into();
        self
    }

    /// Number of amounts the layout consumes.
    pub fn amount_slots(&self) -> usize {
        self.benefits.len() * 2
    }

    /// Reject blank benefit names.
    pub fn validate(&self) -> Result<()> {
        if let Some(pos) = self.benefits.iter().position(|b| b.trim().is_empty()) {
            return Err(Error::Config(format!("benefit #{} has an empty name", pos + 1)));
        }
        Ok(())
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::new(DEFAULT_BENEFITS.iter().copied())
    }
}

/// One data row of the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub assured_name: String,
    pub benefit_type: String,
    pub level: String,
    pub monthly_premium: String,
    pub insurer: String,
}

impl TableRow {
    /// Cells in column order.
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.assured_name,
            &self.benefit_type,
            &self.level,
            &self.monthly_premium,
            &self.insurer,
        ]
    }
}

/// The extracted policy table: a header plus one row per benefit and a totals row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Data rows (the header is [`COLUMNS`])
    pub rows: Vec<TableRow>,
}

impl ResultTable {
    /// Assemble the table from extracted fields.
    ///
    /// Amounts are assigned purely by position; slots past the end of
    /// `amounts` stay empty and amounts past the last slot are ignored.
    pub fn build(assured: &str, amounts: &[String], insurer: &str, layout: &TableLayout) -> Self {
        let amount_at = |i: usize| amounts.get(i).cloned().unwrap_or_default();

        let mut rows: Vec<TableRow> = layout
            .benefits
            .iter()
            .enumerate()
            .map(|(i, benefit)| TableRow {
                assured_name: assured.to_string(),
                benefit_type: benefit.clone(),
                level: amount_at(2 * i),
                monthly_premium: amount_at(2 * i + 1),
                insurer: insurer.to_string(),
            })
            .collect();

        rows.push(TableRow {
            assured_name: String::new(),
            benefit_type: layout.total_label.clone(),
            level: String::new(),
            monthly_premium: String::new(),
            insurer: insurer.to_string(),
        });

        if amounts.len() > layout.amount_slots() {
            log::debug!(
                "{} amounts beyond the last benefit slot were not used",
                amounts.len() - layout.amount_slots()
            );
        }

        Self { rows }
    }

    /// Header cells.
    pub fn header(&self) -> [&str; 5] {
        COLUMNS
    }

    /// Data rows, excluding the header.
    pub fn body(&self) -> &[TableRow] {
        &self.rows
    }

    /// Number of rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        COLUMNS.len()
    }

    /// Cell at `row` (0 is the header) and `col`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        if col >= COLUMNS.len() {
            return None;
        }
        match row {
            0 => Some(COLUMNS[col]),
            n => self.rows.get(n - 1).map(|r| r.cells()[col]),
        }
    }

    /// All rows including the header, as owned strings.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        std::iter::once(COLUMNS.map(String::from).to_vec())
            .chain(
                self.rows
                    .iter()
                    .map(|r| r.cells().iter().map(|c| c.to_string()).collect()),
            )
            .collect()
    }
}
