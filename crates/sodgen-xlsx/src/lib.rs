//! # sodgen-xlsx
//!
//! XLSX (Office Open XML) reader and writer for sodgen.
//!
//! Each worksheet maps to one [`Sheet`](sodgen_core::Sheet): the first
//! populated row supplies the column names, the rows below it the data.

pub mod error;
pub mod reader;
pub mod writer;

mod cell_ref;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
