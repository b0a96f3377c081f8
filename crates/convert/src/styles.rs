//! Column formats for the processed workbook

use crate::names::{is_id_column, normalize_column_name};
use sheetfix_sheet::{ColumnFormat, XlsxWriteOptions};

pub const HEADER_ROW_HEIGHT: f64 = 40.0;
pub const DEFAULT_COLUMN_WIDTH: f64 = 20.0;

pub const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";
pub const ID_NUM_FORMAT: &str = "0";
pub const MONEY_NUM_FORMAT: &str = "$ #,##0.00";

/// Normalized names of the columns written with a currency format.
pub const MONEY_COLUMNS: [&str; 4] = [
    "valor de la compra",
    "comision mas iva",
    "monto neto de operacion",
    "impuestos cobrados por retenciones iibb",
];

/// How a column is presented in the output workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStyle {
    Plain,
    Date,
    Id,
    Money,
}

impl ColumnStyle {
    /// Pick the style for a column. Money wins over ID, ID over date.
    #[must_use]
    pub fn for_column(name: &str, date_columns: &[String]) -> Self {
        let normalized = normalize_column_name(name);
        if MONEY_COLUMNS.contains(&normalized.as_str()) {
            ColumnStyle::Money
        } else if is_id_column(name) {
            ColumnStyle::Id
        } else if date_columns.iter().any(|c| c == name) {
            ColumnStyle::Date
        } else {
            ColumnStyle::Plain
        }
    }

    fn column_format(self) -> Option<ColumnFormat> {
        match self {
            ColumnStyle::Plain => None,
            ColumnStyle::Date => Some(
                ColumnFormat::default()
                    .with_num_format(DATE_NUM_FORMAT)
                    .with_width(DEFAULT_COLUMN_WIDTH),
            ),
            ColumnStyle::Id => Some(
                ColumnFormat::default()
                    .with_num_format(ID_NUM_FORMAT)
                    .with_left_align()
                    .with_width(15.0),
            ),
            ColumnStyle::Money => Some(
                ColumnFormat::default()
                    .with_num_format(MONEY_NUM_FORMAT)
                    .with_width(15.0),
            ),
        }
    }
}

/// Writer options for a processed sheet: styled header, uniform widths
/// and per-column number formats.
#[must_use]
pub fn write_options(column_names: &[String], date_columns: &[String]) -> XlsxWriteOptions {
    let mut options = XlsxWriteOptions::default()
        .with_header_style(Some(HEADER_ROW_HEIGHT))
        .with_default_column_width(DEFAULT_COLUMN_WIDTH);

    for (index, name) in column_names.iter().enumerate() {
        if let Some(format) = ColumnStyle::for_column(name, date_columns).column_format() {
            options = options.with_column(index, format);
        }
    }
    options
}
