//! # sheetfix-convert
//!
//! Finds spreadsheet columns whose numbers are stored as text and turns
//! them into real numbers.
//!
//! ```
//! use sheetfix_convert::{convert_sheet, ConvertOptions};
//! use sheetfix_sheet::{CellValue, Sheet};
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec!["Concepto", "Monto"],
//!     vec!["Venta", "$1,234.56"],
//!     vec!["Devolución", "(1.234,56)"],
//! ]);
//!
//! let report = convert_sheet(&mut sheet, &ConvertOptions::default()).unwrap();
//!
//! assert_eq!(report.converted_columns, vec!["Monto"]);
//! assert_eq!(sheet.get(2, 1).unwrap(), &CellValue::Float(-1234.56));
//! ```

pub mod columns;
pub mod dates;
mod error;
pub mod names;
pub mod numeric;
pub mod pipeline;
pub mod styles;
pub mod summary;

pub use columns::convert_text_columns_to_numbers;
pub use error::{ConvertError, Result};
pub use numeric::{convert_numeric_text, is_numeric_like, parse_numeric_text, NumericText};
pub use pipeline::{
    convert_sheet, process_file, read_input, write_output, ConversionReport, ConvertOptions,
};
pub use summary::AmountSummary;
