//! # sodgen-core
//!
//! Tabular document model for the sodgen sheet generator.
//!
//! This crate provides the fundamental types used throughout sodgen:
//! - [`CellValue`] - A scalar value (string, number, boolean or empty)
//! - [`Row`] - One positional row of values
//! - [`Sheet`] - An ordered column list plus rows laid out against it
//! - [`TabularDocument`] - Named sheets in insertion order
//!
//! ## Example
//!
//! ```rust
//! use sodgen_core::{row, Sheet, TabularDocument};
//!
//! let mut owners = Sheet::with_columns("Owners", ["PROJECT", "OWNER NAME"]);
//! owners.push_row(row!["Apollo", "J. Smith"]).unwrap();
//!
//! let mut doc = TabularDocument::new();
//! doc.add_sheet(owners).unwrap();
//!
//! assert_eq!(doc.sheet(0).unwrap().value(0, "PROJECT").unwrap().to_text(), "Apollo");
//! ```

pub mod document;
pub mod error;
pub mod row;
pub mod sheet;
pub mod value;

// Re-exports for convenience
pub use document::{SheetSelector, TabularDocument};
pub use error::{Error, Result};
pub use row::Row;
pub use sheet::Sheet;
pub use value::{CellValue, SharedString};
