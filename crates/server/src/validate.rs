//! Checks run on an upload before it reaches the conversion pipeline

use sheetfix_sheet::{ExcelReadOptions, Sheet};
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

const ZIP_SIGNATURES: [&[u8]; 3] = [b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"];
const OLE2_SIGNATURE: &[u8] = b"\xd0\xcf\x11\xe0\xa1\xb1\x1a\xe1";

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("file is empty")]
    Empty,

    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("not an Excel signature: {0}")]
    BadSignature(String),

    #[error("workbook cannot be read: {0}")]
    Unreadable(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn has_excel_signature(header: &[u8]) -> bool {
    ZIP_SIGNATURES.iter().any(|sig| header.starts_with(sig)) || header.starts_with(OLE2_SIGNATURE)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Accept `path` only if it is a non-empty Excel workbook no larger than
/// `max_len` bytes that the reader can open.
pub fn validate_excel_file(path: &Path, max_len: u64) -> Result<(), ValidationError> {
    let result = check(path, max_len);
    if let Err(err) = &result {
        warn!(path = %path.display(), error = %err, "upload failed validation");
    }
    result
}

fn check(path: &Path, max_len: u64) -> Result<(), ValidationError> {
    let size = std::fs::metadata(path)?.len();
    if size == 0 {
        return Err(ValidationError::Empty);
    }
    if size > max_len {
        return Err(ValidationError::TooLarge {
            size,
            limit: max_len,
        });
    }

    let mut header = Vec::with_capacity(8);
    std::fs::File::open(path)?.take(8).read_to_end(&mut header)?;
    if !has_excel_signature(&header) {
        return Err(ValidationError::BadSignature(hex(&header)));
    }

    let bytes = std::fs::read(path)?;
    Sheet::from_excel_bytes(&bytes, &ExcelReadOptions::default())
        .map_err(|e| ValidationError::Unreadable(e.to_string()))?;
    Ok(())
}
