//! Column classifier: finds numeric-as-text columns and converts them.

use crate::names::is_id_column;
use crate::numeric::{convert_numeric_text, is_numeric_like};
use sheetfix_sheet::{CellValue, Result, Sheet, SheetError};
use tracing::debug;

/// Text form of a cell for classification. Blank text and NaN are absent.
fn cell_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::Float(f) if f.is_nan() => None,
        CellValue::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        other => Some(other.as_str()),
    }
}

/// Decide whether a column should be converted.
fn should_convert(sheet: &Sheet, index: usize, force: bool) -> Result<bool> {
    let mut has_text = false;
    let mut values = Vec::new();
    for cell in sheet.column_values(index)? {
        has_text |= matches!(cell, CellValue::String(_));
        if let Some(text) = cell_text(cell) {
            values.push(text);
        }
    }

    // Numbers, booleans, dates and empty columns already have a real type
    if !has_text {
        return Ok(false);
    }
    if force {
        return Ok(true);
    }
    if values.is_empty() {
        return Ok(false);
    }
    Ok(values.iter().all(|v| is_numeric_like(v)))
}

/// Convert numeric-like text columns of `sheet` into numbers.
///
/// The sheet's columns must be named by its header row. ID columns are
/// converted regardless of content, with unparseable cells emptied.
/// Returns the converted column names in column order.
pub fn convert_text_columns_to_numbers(sheet: &mut Sheet) -> Result<Vec<String>> {
    let Some(names) = sheet.column_names().cloned() else {
        return Err(SheetError::NoHeader(
            "the header row names the columns to classify".to_string(),
        ));
    };

    let mut converted = Vec::new();
    for (index, name) in names.iter().enumerate() {
        let force = is_id_column(name);
        if !should_convert(sheet, index, force)? {
            continue;
        }

        sheet.column_map(index, |cell| {
            convert_numeric_text(cell).map_or(CellValue::Null, CellValue::Float)
        })?;
        debug!(column = %name, forced = force, "converted text column to numbers");
        converted.push(name.clone());
    }

    Ok(converted)
}
