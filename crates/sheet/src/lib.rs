//! Spreadsheet model for sheetfix.
//!
//! A [`Sheet`] is one worksheet held in memory: rows of [`CellValue`]s
//! whose first row can name the columns. Sheets are read from Excel
//! workbooks (any format calamine understands) or delimited text, and
//! written back as CSV or as a styled XLSX workbook.
//!
//! ```
//! use sheetfix_sheet::{CellValue, Sheet};
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec!["Concepto", "Monto"],
//!     vec!["Venta", "$1,234.56"],
//! ]);
//! sheet.name_columns_by_header().unwrap();
//!
//! assert_eq!(sheet.header_offset(), 1);
//! assert_eq!(
//!     sheet.get_by_name(1, "Monto").unwrap(),
//!     &CellValue::from("$1,234.56")
//! );
//! ```
//!
//! Reading the first worksheet of a workbook, header included:
//!
//! ```no_run
//! use sheetfix_sheet::{ExcelReadOptions, Sheet};
//!
//! let options = ExcelReadOptions::default().with_headers(true);
//! let sheet = Sheet::from_excel_with_options("ventas.xlsx", &options).unwrap();
//! println!("{} data rows", sheet.row_count() - sheet.header_offset());
//! ```

mod cell;
mod csv;
pub mod datetime;
mod error;
mod sheet;
mod xlsx;

pub use cell::CellValue;
pub use csv::CsvOptions;
pub use error::{Result, SheetError};
pub use sheet::Sheet;
pub use xlsx::{ColumnFormat, ExcelReadOptions, XlsxWriteOptions};
