//! # sodgen-csv
//!
//! CSV reader and writer for sodgen. A CSV file holds exactly one sheet.

mod reader;
mod writer;
mod options;
mod error;

pub use reader::CsvReader;
pub use writer::CsvWriter;
pub use options::{CsvReadOptions, CsvWriteOptions};
pub use error::{CsvError, CsvResult};
