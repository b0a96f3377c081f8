use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("no cell at row {row}, column {col} in a {rows}x{cols} sheet")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("row {index} is past the end of the sheet ({count} rows)")]
    RowOutOfBounds { index: usize, count: usize },

    #[error("column {index} is past the end of the sheet ({count} columns)")]
    ColumnOutOfBounds { index: usize, count: usize },

    #[error("no column named {name:?}")]
    UnknownColumn { name: String },

    /// Name-based access before a header row was chosen.
    #[error("sheet has no header row: {0}")]
    NoHeader(String),

    #[error("row has {actual} cells, the sheet has {expected} columns")]
    RowLength { expected: usize, actual: usize },

    #[error("header {name:?} appears more than once")]
    DuplicateHeader { name: String },

    #[error("workbook contains no worksheets")]
    EmptyWorkbook,

    /// More rows or columns than an XLSX worksheet can address.
    #[error("sheet does not fit in a worksheet: {0}")]
    GridTooLarge(&'static str),

    #[error("cannot read workbook: {0}")]
    ExcelRead(#[from] calamine::Error),

    #[error("cannot write workbook: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
