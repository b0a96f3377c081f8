use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use std::collections::{HashMap, HashSet};

/// Column names taken from a header row, with their positions.
#[derive(Debug, Clone)]
struct Header {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    fn from_cells(cells: &[CellValue]) -> Result<Self> {
        let names: Vec<String> = cells.iter().map(CellValue::as_str).collect();
        let mut positions = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), position).is_some() {
                return Err(SheetError::DuplicateHeader { name: name.clone() });
            }
        }
        Ok(Header { names, positions })
    }
}

/// Blank labels become `Unnamed: <position>`; a label seen before gets
/// `.1`, `.2`, ... in order of appearance.
fn unique_labels(cells: &[CellValue]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(cells.len());
    let mut suffixes: HashMap<String, usize> = HashMap::new();

    cells
        .iter()
        .enumerate()
        .map(|(position, cell)| {
            let text = cell.as_str();
            let base = match text.trim() {
                "" => format!("Unnamed: {position}"),
                label => label.to_string(),
            };
            let mut label = base.clone();
            while used.contains(&label) {
                let n = suffixes.entry(base.clone()).or_default();
                *n += 1;
                label = format!("{base}.{n}");
            }
            used.insert(label.clone());
            label
        })
        .collect()
}

/// A worksheet held in memory.
///
/// Cells are stored row by row. Once a header row is chosen the columns
/// can be addressed by name, and the column helpers (`column_values`,
/// `column_map`) leave that row alone.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
    header: Option<Header>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Sheet {
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            rows: Vec::new(),
            header: None,
        }
    }

    /// Build an unnamed-column sheet from rows of anything convertible
    /// into a cell.
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(rows: Vec<Vec<T>>) -> Self {
        let mut sheet = Self::new();
        sheet.rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        sheet
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    /// Rows including the header row, if any.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first data row: 1 once a header row names the
    /// columns, 0 before.
    #[must_use]
    pub fn header_offset(&self) -> usize {
        usize::from(self.header.is_some())
    }

    fn cell_error(&self, row: usize, col: usize) -> SheetError {
        SheetError::CellOutOfBounds {
            row,
            col,
            rows: self.row_count(),
            cols: self.col_count(),
        }
    }

    fn check_column(&self, index: usize) -> Result<()> {
        if index < self.col_count() {
            Ok(())
        } else {
            Err(SheetError::ColumnOutOfBounds {
                index,
                count: self.col_count(),
            })
        }
    }

    /// Cell at a 0-based row and column. Row 0 is the header row when
    /// one is set.
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .ok_or_else(|| self.cell_error(row, col))
    }

    pub fn set<T: Into<CellValue>>(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let error = self.cell_error(row, col);
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(error)?;
        *cell = value.into();
        Ok(())
    }

    pub fn get_by_name(&self, row: usize, column: &str) -> Result<&CellValue> {
        self.get(row, self.position_of(column)?)
    }

    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.rows.get(index).ok_or(SheetError::RowOutOfBounds {
            index,
            count: self.row_count(),
        })
    }

    /// Add a row at the bottom. Its length must match the existing rows.
    pub fn row_append<T: Into<CellValue>>(&mut self, cells: Vec<T>) -> Result<()> {
        let width = self.col_count();
        if !self.is_empty() && cells.len() != width {
            return Err(SheetError::RowLength {
                expected: width,
                actual: cells.len(),
            });
        }
        self.rows.push(cells.into_iter().map(Into::into).collect());
        Ok(())
    }

    /// Data cells of column `index`, top to bottom, header excluded.
    pub fn column_values(&self, index: usize) -> Result<impl Iterator<Item = &CellValue>> {
        self.check_column(index)?;
        Ok(self
            .rows
            .iter()
            .skip(self.header_offset())
            .filter_map(move |row| row.get(index)))
    }

    /// Data cells of the column called `name`.
    pub fn column_by_name(&self, name: &str) -> Result<Vec<&CellValue>> {
        let index = self.position_of(name)?;
        Ok(self.column_values(index)?.collect())
    }

    /// Replace every data cell of column `index` with `f(cell)`.
    pub fn column_map<F>(&mut self, index: usize, f: F) -> Result<()>
    where
        F: Fn(&CellValue) -> CellValue,
    {
        self.check_column(index)?;
        let skip = self.header_offset();
        for cell in self
            .rows
            .iter_mut()
            .skip(skip)
            .filter_map(|row| row.get_mut(index))
        {
            *cell = f(cell);
        }
        Ok(())
    }

    pub fn column_map_by_name<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: Fn(&CellValue) -> CellValue,
    {
        let index = self.position_of(name)?;
        self.column_map(index, f)
    }

    /// Take the labels of row `row_index` as column names, unchanged.
    ///
    /// # Errors
    ///
    /// `SheetError::DuplicateHeader` when two labels are equal.
    pub fn name_columns_by_row(&mut self, row_index: usize) -> Result<()> {
        self.header = Some(Header::from_cells(self.row(row_index)?)?);
        Ok(())
    }

    /// Clean up the first row so every label is trimmed, non-blank and
    /// unique, then name the columns by it. Does nothing on an empty
    /// sheet.
    pub fn name_columns_by_header(&mut self) -> Result<()> {
        let Some(first) = self.rows.first_mut() else {
            return Ok(());
        };
        let labels = unique_labels(first);
        for (cell, label) in first.iter_mut().zip(labels) {
            *cell = CellValue::String(label);
        }
        self.name_columns_by_row(0)
    }

    #[must_use]
    pub fn column_names(&self) -> Option<&Vec<String>> {
        self.header.as_ref().map(|header| &header.names)
    }

    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.header.as_ref()?.positions.get(name).copied()
    }

    fn position_of(&self, name: &str) -> Result<usize> {
        let header = self.header.as_ref().ok_or_else(|| {
            SheetError::NoHeader(format!("cannot look up column {name:?} by name"))
        })?;
        header
            .positions
            .get(name)
            .copied()
            .ok_or_else(|| SheetError::UnknownColumn {
                name: name.to_string(),
            })
    }

    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.rows
    }

    /// Raw access to the rows. Forgets the header, since the caller may
    /// replace it; name the columns again afterwards.
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        self.header = None;
        &mut self.rows
    }
}
