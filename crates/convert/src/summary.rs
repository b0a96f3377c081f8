//! Totals for the amount column of a processed sheet

use serde::Serialize;
use sheetfix_sheet::{CellValue, Sheet};

/// Column H, where account statements keep the net amount.
pub const DEFAULT_SUMMARY_COLUMN: usize = 7;

/// Sum of one column split by sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AmountSummary {
    pub total: f64,
    /// Sum of the positive values
    pub inflows: f64,
    /// Sum of the negative values
    pub outflows: f64,
    /// Number of cells that contributed
    pub counted: usize,
}

impl AmountSummary {
    fn add(&mut self, value: f64) {
        self.total += value;
        if value > 0.0 {
            self.inflows += value;
        } else if value < 0.0 {
            self.outflows += value;
        }
        self.counted += 1;
    }
}

/// Plain numeric value of a cell: numbers, or text that is already a
/// plain float literal. Formatted text does not count.
fn plain_number(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Int(_) | CellValue::Float(_) => cell.as_number(),
        CellValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

/// Summarize the data cells of column `index`, or `None` when the sheet
/// does not have that many columns.
#[must_use]
pub fn summarize_column(sheet: &Sheet, index: usize) -> Option<AmountSummary> {
    let values = sheet.column_values(index).ok()?;
    let mut summary = AmountSummary::default();
    for value in values.filter_map(plain_number) {
        summary.add(value);
    }
    Some(summary)
}
