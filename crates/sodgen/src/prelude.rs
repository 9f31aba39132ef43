//! Prelude module - common imports for sodgen users
//!
//! ```rust
//! use sodgen::prelude::*;
//! ```

pub use crate::{
    // Orchestration
    generate,
    generate_files,
    Baseline,
    // Cell and document types
    CellValue,
    // I/O types
    CsvReader,
    CsvWriter,
    // Extension traits
    DocumentExt,
    // Error types
    Error,
    GenerateOptions,
    GeneratePaths,
    GenerationInputs,
    GenerationMode,
    GenerationReport,
    ProjectList,
    Result,
    Row,
    Sheet,
    SheetSelector,
    TabularDocument,
    XlsxReader,
    XlsxWriter,
};
