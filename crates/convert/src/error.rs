use sheetfix_sheet::SheetError;
use thiserror::Error;

/// Errors raised while converting a workbook
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
