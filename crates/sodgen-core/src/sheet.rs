//! Sheet type

use crate::error::{Error, Result};
use crate::row::Row;
use crate::value::CellValue;

/// A named sheet: an ordered column list and rows laid out against it
///
/// Every row carries exactly one value per column; missing values are
/// [`CellValue::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    /// Sheet name
    name: String,
    /// Column names, in order
    columns: Vec<String>,
    /// Rows, in order
    rows: Vec<Row>,
}

impl Sheet {
    /// Create a new sheet with no columns and no rows
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Create a new sheet with the given columns and no rows
    pub fn with_columns<S, I, C>(name: S, columns: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from a header row and raw data records
    ///
    /// The column count is the widest of the header and the records. Blank
    /// header cells become `Unnamed: <index>` and a repeated name gets a
    /// `.1`, `.2`, ... suffix. Records are padded with empties.
    pub fn from_records<S: Into<String>>(
        name: S,
        header: Vec<CellValue>,
        records: Vec<Vec<CellValue>>,
    ) -> Self {
        let width = records
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let mut columns: Vec<String> = Vec::with_capacity(width);
        for index in 0..width {
            let base = match header.get(index).map(|v| v.to_text()) {
                Some(text) if !text.trim().is_empty() => text,
                _ => format!("Unnamed: {}", index),
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while columns.contains(&candidate) {
                candidate = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            columns.push(candidate);
        }

        let mut sheet = Self {
            name: name.into(),
            columns,
            rows: Vec::with_capacity(records.len()),
        };
        for record in records {
            sheet.push_padded(record);
        }
        sheet
    }

    /// A sheet with this sheet's name and columns but no rows
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Columns ===

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check if the sheet has a column
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Fail with [`Error::Schema`] naming every required column that is absent
    pub fn require_columns(&self, required: &[&str]) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Schema {
                sheet: self.name.clone(),
                missing,
            })
        }
    }

    /// Check whether both sheets have the same set of column names
    ///
    /// Order is not significant.
    pub fn same_column_set(&self, other: &Sheet) -> bool {
        self.columns.len() == other.columns.len()
            && self.columns.iter().all(|c| other.has_column(c))
    }

    /// Append a column, filling existing rows with [`CellValue::Empty`]
    ///
    /// Returns the position of the column; an existing column is not duplicated.
    pub fn add_column<S: Into<String>>(&mut self, name: S) -> usize {
        let name = name.into();
        if let Some(index) = self.column_index(&name) {
            return index;
        }
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(CellValue::Empty);
        }
        self.columns.len() - 1
    }

    // === Rows ===

    /// Rows in order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get a row by position
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sheet has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if the sheet has at least one column and one row
    pub fn has_data(&self) -> bool {
        !self.columns.is_empty() && !self.rows.is_empty()
    }

    /// Append a row, which must carry one value per column
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::RowWidth {
                sheet: self.name.clone(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a row, padding with empties or truncating to the column count
    pub fn push_padded<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = CellValue>,
    {
        let mut values: Vec<CellValue> = values.into_iter().take(self.columns.len()).collect();
        values.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(Row::new(values));
    }

    /// Append several rows, each checked like [`push_row`](Self::push_row)
    pub fn extend_rows<I: IntoIterator<Item = Row>>(&mut self, rows: I) -> Result<()> {
        for row in rows {
            self.push_row(row)?;
        }
        Ok(())
    }

    /// Remove all rows, keeping the columns
    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    /// Consume the sheet, returning its rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    // === Values ===

    /// Get a value by row position and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterate over the values of one column, top to bottom
    pub fn column_values<'a>(
        &'a self,
        column: &str,
    ) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let col = self.column_index(column)?;
        Some(self.rows.iter().filter_map(move |r| r.get(col)))
    }

    /// Re-lay a row of this sheet against another column list
    ///
    /// Values are matched by column name; target columns this sheet does not
    /// have become [`CellValue::Empty`].
    pub fn project_row(&self, row: &Row, target: &[String]) -> Row {
        target
            .iter()
            .map(|name| {
                self.column_index(name)
                    .and_then(|i| row.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    }
}
