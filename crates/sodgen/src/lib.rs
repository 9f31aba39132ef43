//! # sodgen
//!
//! Expand templated spreadsheets into one row per project, cross-reference
//! risks against their owners, and merge the result into earlier output.
//!
//! ## Features
//!
//! - Template rows marked with a placeholder (`$project` by default) are
//!   repeated once per project
//! - A `Risks-Owners` sheet pairs every risk with its project's owners
//! - Delta mode appends only rows missing from a previous output file
//! - Read XLSX and CSV, write XLSX and CSV
//!
//! ## Example
//!
//! ```rust
//! use sodgen::prelude::*;
//! use sodgen::row;
//!
//! let mut tasks = Sheet::with_columns("Tasks", ["NAME"]);
//! tasks.push_row(row!["Review $project"]).unwrap();
//!
//! let mut projects = Sheet::with_columns("Projects", ["PROJECT"]);
//! projects.push_row(row!["Apollo"]).unwrap();
//! projects.push_row(row!["Zeus"]).unwrap();
//!
//! let owners = Sheet::with_columns("Owners", ["PROJECT", "OWNER TYPE", "OWNER NAME", "RANK"]);
//!
//! let generation = generate(
//!     GenerationInputs {
//!         template: TabularDocument::try_from(vec![tasks]).unwrap(),
//!         projects,
//!         owners,
//!         baseline: Baseline::Absent,
//!     },
//!     &GenerateOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(generation.report.mode, GenerationMode::Full);
//! assert_eq!(generation.document.sheet(0).unwrap().row_count(), 2);
//! ```

pub mod cross_ref;
pub mod expand;
pub mod generator;
pub mod merge;
pub mod options;
pub mod prelude;
pub mod projects;

pub use cross_ref::{
    build_cross_reference, find_risks_sheet, is_risks_sheet_name, project_token, OwnersTable,
};
pub use expand::{expand_document, expand_sheet, RowKind};
pub use generator::{
    generate, generate_files, Baseline, GeneratePaths, Generation, GenerationInputs,
    GenerationMode, GenerationReport, Stage,
};
pub use merge::{merge, MergeOrigin, MergeOutcome, SheetMerge};
pub use options::{GenerateOptions, DEFAULT_CROSS_REFERENCE_SHEET, DEFAULT_PLACEHOLDER};
pub use projects::ProjectList;

// Re-export core types
pub use sodgen_core::{
    row, CellValue, Error, Result, Row, SharedString, Sheet, SheetSelector, TabularDocument,
};

// Re-export I/O types
pub use sodgen_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
pub use sodgen_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Extension trait for TabularDocument to add file I/O
///
/// The format follows the file extension: `.xlsx`/`.xlsm` for workbooks,
/// `.csv` for a single sheet named after the file stem.
pub trait DocumentExt: Sized {
    /// Open a document from a file
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &CsvReadOptions::default())
    }

    /// Open a document, using `csv` when the file is CSV
    fn open_with<P: AsRef<Path>>(path: P, csv: &CsvReadOptions) -> Result<Self>;

    /// Save the document to a file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_with(path, &CsvWriteOptions::default())
    }

    /// Save the document, using `csv` when the file is CSV
    fn save_with<P: AsRef<Path>>(&self, path: P, csv: &CsvWriteOptions) -> Result<()>;
}

/// Check whether a path names a CSV file
pub fn is_csv_path(path: &Path) -> bool {
    extension(path).as_deref() == Some("csv")
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

impl DocumentExt for TabularDocument {
    fn open_with<P: AsRef<Path>>(path: P, csv: &CsvReadOptions) -> Result<TabularDocument> {
        let path = path.as_ref();
        let unreadable = |e: &dyn std::fmt::Display| {
            Error::unreadable(format!("{}: {}", path.display(), e))
        };

        match extension(path).as_deref() {
            Some("xlsx") | Some("xlsm") => XlsxReader::read_file(path).map_err(|e| unreadable(&e)),
            Some("csv") => {
                let sheet = CsvReader::read_file(path, csv).map_err(|e| unreadable(&e))?;
                TabularDocument::try_from(vec![sheet])
            }
            _ => Err(unreadable(&"unsupported file format")),
        }
    }

    fn save_with<P: AsRef<Path>>(&self, path: P, csv: &CsvWriteOptions) -> Result<()> {
        let path = path.as_ref();

        match extension(path).as_deref() {
            Some("xlsx") => XlsxWriter::write_file(self, path)
                .map_err(|e| Error::other(format!("Failed to write '{}': {}", path.display(), e))),
            Some("csv") => {
                let sheet = self
                    .sheet(0)
                    .ok_or_else(|| Error::other("No sheets to save"))?;
                CsvWriter::write_file(sheet, path, csv)
                    .map_err(|e| Error::other(format!("Failed to write '{}': {}", path.display(), e)))
            }
            _ => Err(Error::other(format!(
                "Unsupported file format: {}",
                path.display()
            ))),
        }
    }
}
