use crate::cell::CellValue;
use crate::datetime::datetime_to_excel_serial;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

/// Number format for date cells in columns without their own format.
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Which worksheet to load and whether its first row is a header.
#[derive(Debug, Clone, Default)]
pub struct ExcelReadOptions {
    pub has_headers: bool,
    /// First worksheet when `None`.
    pub sheet_name: Option<String>,
}

impl ExcelReadOptions {
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    #[must_use]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }
}

/// Look of one column in a written workbook. The number format and
/// alignment apply to data cells only, never to the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnFormat {
    /// Excel number format code, e.g. `yyyy-mm-dd` or `$ #,##0.00`
    pub num_format: Option<String>,
    /// Character units
    pub width: Option<f64>,
    pub align_left: bool,
}

impl ColumnFormat {
    #[must_use]
    pub fn with_num_format(mut self, num_format: impl Into<String>) -> Self {
        self.num_format = Some(num_format.into());
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_left_align(mut self) -> Self {
        self.align_left = true;
        self
    }

    fn cell_format(&self) -> Option<Format> {
        if self.num_format.is_none() && !self.align_left {
            return None;
        }
        let mut format = Format::new();
        if let Some(code) = &self.num_format {
            format = format.set_num_format(code);
        }
        if self.align_left {
            format = format.set_align(FormatAlign::Left);
        }
        Some(format)
    }
}

/// Layout of a written workbook.
#[derive(Debug, Clone, Default)]
pub struct XlsxWriteOptions {
    /// Bold, wrapped and centered first row.
    pub header_style: bool,
    /// Only used together with `header_style`.
    pub header_row_height: Option<f64>,
    /// Width of columns whose `ColumnFormat` has none.
    pub default_column_width: Option<f64>,
    /// Keyed by 0-based column position.
    pub columns: HashMap<usize, ColumnFormat>,
}

impl XlsxWriteOptions {
    #[must_use]
    pub fn with_header_style(mut self, height: Option<f64>) -> Self {
        self.header_style = true;
        self.header_row_height = height;
        self
    }

    #[must_use]
    pub fn with_default_column_width(mut self, width: f64) -> Self {
        self.default_column_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_column(mut self, index: usize, format: ColumnFormat) -> Self {
        self.columns.insert(index, format);
        self
    }

    fn width_of(&self, column: usize) -> Option<f64> {
        self.columns
            .get(&column)
            .and_then(|format| format.width)
            .or(self.default_column_width)
    }
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        // durations are plain day counts, not points in time
        Data::DateTime(excel) if excel.is_duration() => CellValue::Float(excel.as_f64()),
        // calamine knows the workbook's date system (1900 or 1904)
        Data::DateTime(excel) => excel
            .as_datetime()
            .map_or_else(|| CellValue::Float(excel.as_f64()), CellValue::DateTime),
        Data::DateTimeIso(s) => {
            iso_datetime(s).map_or_else(|| CellValue::String(s.clone()), CellValue::DateTime)
        }
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}

fn iso_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0))
}

/// Rows of a used range. Calamine trims empty leading columns; they are
/// put back so position 7 is still column H.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let blank_columns = range.start().map_or(0, |(_, col)| col as usize);
    range
        .rows()
        .map(|row| {
            let mut cells = vec![CellValue::Null; blank_columns];
            cells.extend(row.iter().map(cell_from_data));
            cells
        })
        .collect()
}

fn read_workbook(bytes: Vec<u8>, options: &ExcelReadOptions) -> Result<Sheet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_name = match &options.sheet_name {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(SheetError::EmptyWorkbook)?,
    };
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut sheet = Sheet::with_name(&sheet_name);
    *sheet.data_mut() = range_to_rows(&range);
    if options.has_headers {
        sheet.name_columns_by_header()?;
    }
    Ok(sheet)
}

fn write_number(
    worksheet: &mut Worksheet,
    (row, col): (u32, u16),
    value: f64,
    format: Option<&Format>,
) -> Result<()> {
    match format {
        Some(format) => worksheet.write_number_with_format(row, col, value, format)?,
        None => worksheet.write_number(row, col, value)?,
    };
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    at: (u32, u16),
    cell: &CellValue,
    format: Option<&Format>,
    datetime_format: &Format,
) -> Result<()> {
    let (row, col) = at;
    match cell {
        CellValue::Null => {}
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        // exact up to 2^53; Excel has no integer cells
        CellValue::Int(i) => write_number(worksheet, at, *i as f64, format)?,
        CellValue::Float(f) if f.is_finite() => write_number(worksheet, at, *f, format)?,
        CellValue::Float(_) => {}
        CellValue::String(s) => {
            match format {
                Some(format) => worksheet.write_string_with_format(row, col, s.as_str(), format)?,
                None => worksheet.write_string(row, col, s.as_str())?,
            };
        }
        CellValue::DateTime(dt) => {
            let format = format.unwrap_or(datetime_format);
            worksheet.write_number_with_format(row, col, datetime_to_excel_serial(dt), format)?;
        }
    }
    Ok(())
}

impl Sheet {
    /// Load the first worksheet of a workbook on disk.
    ///
    /// `.xlsx`, `.xlsm`, `.xls`, `.xlsb` and `.ods` are accepted. The
    /// format comes from the file content, not its extension.
    ///
    /// # Errors
    ///
    /// `SheetError::Io` when the file cannot be read, `SheetError::ExcelRead`
    /// when it is not a workbook.
    pub fn from_excel<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_excel_with_options(path, &ExcelReadOptions::default())
    }

    /// # Errors
    ///
    /// As [`Sheet::from_excel`], plus `SheetError::ExcelRead` when the
    /// requested worksheet does not exist.
    pub fn from_excel_with_options<P: AsRef<Path>>(
        path: P,
        options: &ExcelReadOptions,
    ) -> Result<Self> {
        read_workbook(std::fs::read(path.as_ref())?, options)
    }

    /// Same as [`Sheet::from_excel_with_options`] for a workbook already
    /// in memory, such as an upload.
    ///
    /// # Errors
    ///
    /// `SheetError::ExcelRead` when the bytes are not a readable workbook.
    pub fn from_excel_bytes(bytes: &[u8], options: &ExcelReadOptions) -> Result<Self> {
        read_workbook(bytes.to_vec(), options)
    }

    /// # Errors
    ///
    /// `SheetError::ExcelWrite` when the workbook cannot be saved.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_as_xlsx_with_options(path, &XlsxWriteOptions::default())
    }

    /// Write a one-worksheet workbook laid out by `options`.
    ///
    /// # Errors
    ///
    /// `SheetError::ExcelWrite` when the workbook cannot be saved,
    /// `SheetError::GridTooLarge` past Excel's row or column limits.
    pub fn save_as_xlsx_with_options<P: AsRef<Path>>(
        &self,
        path: P,
        options: &XlsxWriteOptions,
    ) -> Result<()> {
        self.build_workbook(options)?.save(path.as_ref())?;
        Ok(())
    }

    /// The workbook [`Sheet::save_as_xlsx_with_options`] would write, as
    /// bytes.
    ///
    /// # Errors
    ///
    /// As [`Sheet::save_as_xlsx_with_options`].
    pub fn to_xlsx_buffer(&self, options: &XlsxWriteOptions) -> Result<Vec<u8>> {
        Ok(self.build_workbook(options)?.save_to_buffer()?)
    }

    fn build_workbook(&self, options: &XlsxWriteOptions) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        self.fill_worksheet(workbook.add_worksheet(), options)?;
        Ok(workbook)
    }

    fn fill_worksheet(&self, worksheet: &mut Worksheet, options: &XlsxWriteOptions) -> Result<()> {
        worksheet.set_name(self.name())?;

        let width = u16::try_from(self.col_count())
            .map_err(|_| SheetError::GridTooLarge("too many columns"))?;
        for col in 0..width {
            if let Some(chars) = options.width_of(usize::from(col)) {
                worksheet.set_column_width(col, chars)?;
            }
        }

        let formats: HashMap<usize, Format> = options
            .columns
            .iter()
            .filter_map(|(&index, column)| Some((index, column.cell_format()?)))
            .collect();
        let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);
        let header_format = Format::new()
            .set_bold()
            .set_text_wrap()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        let mut rows = self.data().iter().enumerate();
        if options.header_style {
            if let Some((_, header)) = rows.next() {
                if let Some(height) = options.header_row_height {
                    worksheet.set_row_height(0, height)?;
                }
                for (col, label) in (0..width).zip(header) {
                    worksheet.write_string_with_format(0, col, label.as_str(), &header_format)?;
                }
            }
        }

        for (index, row) in rows {
            let row_num =
                u32::try_from(index).map_err(|_| SheetError::GridTooLarge("too many rows"))?;
            for (col, cell) in (0..width).zip(row) {
                let format = formats.get(&usize::from(col));
                write_cell(worksheet, (row_num, col), cell, format, &datetime_format)?;
            }
        }
        Ok(())
    }
}
