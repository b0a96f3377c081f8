//! End-to-end conversion of one spreadsheet file

use crate::columns::convert_text_columns_to_numbers;
use crate::dates::{coerce_date_columns, DATE_KEYWORDS};
use crate::error::{ConvertError, Result};
use crate::styles::write_options;
use crate::summary::{summarize_column, AmountSummary, DEFAULT_SUMMARY_COLUMN};
use serde::Serialize;
use sheetfix_sheet::{CsvOptions, ExcelReadOptions, Sheet};
use std::path::Path;
use tracing::info;

const EXCEL_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Options for converting a sheet
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Column to summarize; `None` disables the summary
    pub summary_column: Option<usize>,
    /// Keywords that mark date columns
    pub date_keywords: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            summary_column: Some(DEFAULT_SUMMARY_COLUMN),
            date_keywords: DATE_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

impl ConvertOptions {
    #[must_use]
    pub fn with_summary_column(mut self, column: Option<usize>) -> Self {
        self.summary_column = column;
        self
    }
}

/// What a conversion changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Data rows, header excluded
    pub rows: usize,
    pub converted_columns: Vec<String>,
    pub date_columns: Vec<String>,
    pub summary: Option<AmountSummary>,
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Read the first worksheet of an Excel file, or a CSV/TSV file, with the
/// first row as header.
pub fn read_input(path: &Path) -> Result<Sheet> {
    let ext = extension(path);
    let sheet = match ext.as_str() {
        e if EXCEL_EXTENSIONS.contains(&e) => Sheet::from_excel_with_options(
            path,
            &ExcelReadOptions::default().with_headers(true),
        )?,
        "csv" => Sheet::from_csv_with_options(path, &CsvOptions::default().with_headers(true))?,
        "tsv" => Sheet::from_csv_with_options(path, &CsvOptions::tsv().with_headers(true))?,
        _ => return Err(ConvertError::UnsupportedFormat(path.display().to_string())),
    };
    Ok(sheet)
}

/// Convert numeric-as-text columns, coerce date columns and summarize.
pub fn convert_sheet(sheet: &mut Sheet, options: &ConvertOptions) -> Result<ConversionReport> {
    if sheet.column_names().is_none() {
        if sheet.is_empty() {
            return Ok(ConversionReport::default());
        }
        sheet.name_columns_by_header()?;
    }

    let converted_columns = convert_text_columns_to_numbers(sheet)?;
    let date_columns = coerce_date_columns(sheet, &options.date_keywords)?;
    let summary = options
        .summary_column
        .and_then(|index| summarize_column(sheet, index));

    Ok(ConversionReport {
        rows: sheet.row_count().saturating_sub(sheet.header_offset()),
        converted_columns,
        date_columns,
        summary,
    })
}

/// Write a converted sheet. `.xlsx` output gets the styled layout; `.csv`
/// output is plain.
pub fn write_output(sheet: &Sheet, path: &Path, report: &ConversionReport) -> Result<()> {
    match extension(path).as_str() {
        "xlsx" => {
            let names = sheet.column_names().cloned().unwrap_or_default();
            let options = write_options(&names, &report.date_columns);
            sheet.save_as_xlsx_with_options(path, &options)?;
        }
        "csv" => sheet.save_as_csv(path)?,
        _ => return Err(ConvertError::UnsupportedFormat(path.display().to_string())),
    }
    Ok(())
}

/// Read `input`, convert it and write the result to `output`.
pub fn process_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    info!(input = %input.display(), "starting processing");
    let mut sheet = read_input(input)?;
    let report = convert_sheet(&mut sheet, options)?;
    write_output(&sheet, output, &report)?;
    info!(
        output = %output.display(),
        rows = report.rows,
        converted = report.converted_columns.len(),
        dates = report.date_columns.len(),
        "processed file saved"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetfix_sheet::CellValue;

    #[test]
    fn test_convert_sheet_names_header_when_needed() {
        let mut sheet = Sheet::from_data(vec![
            vec![CellValue::from("monto"), CellValue::from("monto")],
            vec![CellValue::from("$1,00"), CellValue::from("texto")],
        ]);

        let report = convert_sheet(&mut sheet, &ConvertOptions::default()).unwrap();

        assert_eq!(report.rows, 1);
        assert_eq!(report.converted_columns, vec!["monto"]);
        assert_eq!(sheet.get(1, 0).unwrap(), &CellValue::Float(1.0));
        assert_eq!(report.summary, None);
    }

    #[test]
    fn test_empty_sheet_converts_to_empty_report() {
        let mut sheet = Sheet::new();
        let report = convert_sheet(&mut sheet, &ConvertOptions::default()).unwrap();
        assert_eq!(report, ConversionReport::default());
    }

    #[test]
    fn test_unsupported_extensions() {
        let err = read_input(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));

        let sheet = Sheet::new();
        let err = write_output(&sheet, Path::new("out.pdf"), &ConversionReport::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));
    }
}
