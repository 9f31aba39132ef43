//! Tabular document type - the main container

use std::fmt;

use crate::error::{Error, Result};
use crate::sheet::Sheet;

/// A tabular document: sheets keyed by name, in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularDocument {
    sheets: Vec<Sheet>,
}

/// Picks one sheet out of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// 0-based position in the document
    Index(usize),
    /// Exact sheet name
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl From<usize> for SheetSelector {
    fn from(index: usize) -> Self {
        SheetSelector::Index(index)
    }
}

impl From<&str> for SheetSelector {
    fn from(name: &str) -> Self {
        SheetSelector::Name(name.to_string())
    }
}

impl From<String> for SheetSelector {
    fn from(name: String) -> Self {
        SheetSelector::Name(name)
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "#{}", i),
            SheetSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl TabularDocument {
    /// Create an empty document with no sheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the document has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Check if at least one sheet has columns and rows
    pub fn has_data(&self) -> bool {
        self.sheets.iter().any(Sheet::has_data)
    }

    /// Get a sheet by index
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    /// Get a sheet by name
    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Get a mutable sheet by name
    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name() == name)
    }

    /// Get the index of a sheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name() == name)
    }

    /// Check if a sheet with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.sheet_index(name).is_some()
    }

    /// Resolve a [`SheetSelector`] to a sheet
    pub fn select(&self, selector: &SheetSelector) -> Result<&Sheet> {
        match selector {
            SheetSelector::Index(i) => self
                .sheets
                .get(*i)
                .ok_or(Error::SheetOutOfBounds(*i, self.sheets.len())),
            SheetSelector::Name(name) => self
                .sheet_by_name(name)
                .ok_or_else(|| Error::SheetNotFound(name.clone())),
        }
    }

    /// Remove and return the sheet a [`SheetSelector`] points at
    pub fn take(&mut self, selector: &SheetSelector) -> Result<Sheet> {
        let index = match selector {
            SheetSelector::Index(i) if *i < self.sheets.len() => *i,
            SheetSelector::Index(i) => {
                return Err(Error::SheetOutOfBounds(*i, self.sheets.len()))
            }
            SheetSelector::Name(name) => self
                .sheet_index(name)
                .ok_or_else(|| Error::SheetNotFound(name.clone()))?,
        };
        Ok(self.sheets.remove(index))
    }

    /// First sheet whose name satisfies a predicate
    pub fn find_sheet<P>(&self, mut predicate: P) -> Option<&Sheet>
    where
        P: FnMut(&str) -> bool,
    {
        self.sheets.iter().find(|s| predicate(s.name()))
    }

    /// Iterate over all sheets
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Iterate over all sheets mutably
    pub fn sheets_mut(&mut self) -> impl Iterator<Item = &mut Sheet> {
        self.sheets.iter_mut()
    }

    /// Sheet names in order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(Sheet::name)
    }

    /// Add a sheet at the end; its name must be new
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<usize> {
        Self::validate_sheet_name(sheet.name())?;
        if self.contains(sheet.name()) {
            return Err(Error::DuplicateSheetName(sheet.name().to_string()));
        }
        let index = self.sheets.len();
        self.sheets.push(sheet);
        Ok(index)
    }

    /// Add a sheet, replacing a same-named sheet in place
    ///
    /// A replaced sheet keeps its position; a new one is appended.
    pub fn insert_or_replace(&mut self, sheet: Sheet) -> Result<usize> {
        Self::validate_sheet_name(sheet.name())?;
        match self.sheet_index(sheet.name()) {
            Some(index) => {
                self.sheets[index] = sheet;
                Ok(index)
            }
            None => {
                self.sheets.push(sheet);
                Ok(self.sheets.len() - 1)
            }
        }
    }

    /// Remove a sheet by name
    pub fn remove_sheet(&mut self, name: &str) -> Option<Sheet> {
        let index = self.sheet_index(name)?;
        Some(self.sheets.remove(index))
    }

    /// Consume the document, returning its sheets in order
    pub fn into_sheets(self) -> Vec<Sheet> {
        self.sheets
    }

    fn validate_sheet_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        Ok(())
    }
}

impl TryFrom<Vec<Sheet>> for TabularDocument {
    type Error = Error;

    fn try_from(sheets: Vec<Sheet>) -> Result<Self> {
        let mut doc = TabularDocument::new();
        for sheet in sheets {
            doc.add_sheet(sheet)?;
        }
        Ok(doc)
    }
}
