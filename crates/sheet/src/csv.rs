use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::Sheet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// How delimited text is split into cells.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Clean up the first row and name the columns by it.
    pub has_headers: bool,
    /// Turn plain numbers and booleans into typed cells. When off every
    /// non-empty field stays text.
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            has_headers: false,
            infer_types: true,
        }
    }
}

impl CsvOptions {
    /// Tab separated.
    #[must_use]
    pub fn tsv() -> Self {
        Self::default().with_delimiter(b'\t')
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    #[must_use]
    pub fn with_infer_types(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }

    fn cell(&self, field: &str) -> CellValue {
        match field {
            _ if self.infer_types => CellValue::infer(field),
            "" => CellValue::Null,
            text => CellValue::from(text),
        }
    }
}

impl Sheet {
    pub fn from_csv_with_options<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(BufReader::new(file), options)
    }

    pub fn from_csv_str(content: &str, options: &CsvOptions) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes(), options)
    }

    /// Read delimited text into a sheet named `Sheet1`.
    ///
    /// Records may have different lengths; short ones are filled with
    /// `Null` up to the longest record.
    pub fn from_csv_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Self> {
        let mut records = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in records.records() {
            let row: Vec<CellValue> = record?.iter().map(|field| options.cell(field)).collect();
            rows.push(row);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or_default();
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }

        let mut sheet = Sheet::new();
        *sheet.data_mut() = rows;
        if options.has_headers {
            sheet.name_columns_by_header()?;
        }
        Ok(sheet)
    }

    /// Write every row, header included, as comma separated text.
    pub fn save_as_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file), &CsvOptions::default())
    }

    pub fn write_csv<W: Write>(&self, writer: W, options: &CsvOptions) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .from_writer(writer);
        for row in self.data() {
            out.write_record(row.iter().map(CellValue::as_str))?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_quoted_amounts_stay_text() {
        let csv = "concepto,monto\nVenta,\"$1,234.56\"\nAjuste,25";
        let sheet = Sheet::from_csv_str(csv, &CsvOptions::default()).unwrap();

        assert_eq!((sheet.row_count(), sheet.col_count()), (3, 2));
        assert_eq!(sheet.get(1, 1).unwrap(), &CellValue::from("$1,234.56"));
        assert_eq!(sheet.get(2, 1).unwrap(), &CellValue::Int(25));
    }

    #[test]
    fn test_header_row_is_cleaned() {
        let csv = "monto,,monto\nVenta,30,NYC";
        let options = CsvOptions::default().with_headers(true);
        let sheet = Sheet::from_csv_str(csv, &options).unwrap();

        assert_eq!(
            sheet.column_names().unwrap(),
            &vec!["monto", "Unnamed: 1", "monto.1"]
        );
        assert_eq!(sheet.get_by_name(1, "Unnamed: 1").unwrap(), &CellValue::Int(30));
    }

    #[test]
    fn test_short_records_are_filled() {
        let sheet = Sheet::from_csv_str("a,b,c\n1\n1,2", &CsvOptions::default()).unwrap();

        assert_eq!(sheet.col_count(), 3);
        assert!(sheet.get(1, 1).unwrap().is_null());
        assert!(sheet.get(2, 2).unwrap().is_null());
    }

    #[test]
    fn test_without_inference_keeps_leading_zeros() {
        let options = CsvOptions::default()
            .with_headers(true)
            .with_infer_types(false);
        let sheet = Sheet::from_csv_str("id,nota\n000123,\n", &options).unwrap();

        assert_eq!(sheet.get(1, 0).unwrap().as_text(), Some("000123"));
        assert!(sheet.get(1, 1).unwrap().is_null());
    }

    #[test]
    fn test_semicolon_delimiter() {
        let options = CsvOptions::default().with_delimiter(b';');
        let sheet = Sheet::from_csv_str("monto;fecha\n1.234,56;2024-01-02", &options).unwrap();
        assert_eq!(sheet.get(1, 0).unwrap().as_text(), Some("1.234,56"));
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("montos.csv");

        Sheet::from_data(vec![vec![1, 2], vec![3, 4]])
            .save_as_csv(&path)
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,2\n3,4\n");
        let loaded = Sheet::from_csv_with_options(&path, &CsvOptions::default()).unwrap();
        assert_eq!(loaded.get(1, 1).unwrap(), &CellValue::Int(4));
    }
}
