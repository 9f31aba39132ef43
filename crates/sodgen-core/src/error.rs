//! Error types for sodgen-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or transforming tabular documents
#[derive(Debug, Error)]
pub enum Error {
    /// Required column(s) missing from a sheet
    #[error("Sheet '{sheet}' is missing required column(s): {}", missing.join(", "))]
    Schema {
        /// Name of the offending sheet
        sheet: String,
        /// Columns that were required but not found
        missing: Vec<String>,
    },

    /// An input resolved to no usable entries
    #[error("No entries found in {0}")]
    EmptyInput(String),

    /// Content is not a validly structured tabular document
    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    /// Sheet index out of bounds
    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Row does not carry one value per column
    #[error("Row has {actual} values but sheet '{sheet}' has {expected} columns")]
    RowWidth {
        sheet: String,
        expected: usize,
        actual: usize,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create an "unreadable document" error
    pub fn unreadable<S: Into<String>>(reason: S) -> Self {
        Error::UnreadableDocument(reason.into())
    }

    /// Check if this is a missing-column error
    pub fn is_schema(&self) -> bool {
        matches!(self, Error::Schema { .. })
    }

    /// Check if this error signals content that could not be parsed
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Error::UnreadableDocument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_message_lists_columns() {
        let err = Error::Schema {
            sheet: "Owners".into(),
            missing: vec!["RANK".into(), "OWNER NAME".into()],
        };
        assert_eq!(
            err.to_string(),
            "Sheet 'Owners' is missing required column(s): RANK, OWNER NAME"
        );
        assert!(err.is_schema());
        assert!(!err.is_unreadable());
    }
}
