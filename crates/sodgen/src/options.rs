//! Generation options

use sodgen_core::SheetSelector;
use sodgen_csv::{CsvReadOptions, CsvWriteOptions};

/// Placeholder token replaced by each project name
pub const DEFAULT_PLACEHOLDER: &str = "$project";

/// Name of the derived risk/owner sheet
pub const DEFAULT_CROSS_REFERENCE_SHEET: &str = "Risks-Owners";

/// Options for one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// Literal token marking template rows (default: `$project`)
    pub placeholder: String,
    /// Name of the cross-reference sheet (default: `Risks-Owners`)
    pub cross_reference_sheet: String,
    /// Only merge into a baseline that has at least one sheet with columns
    /// and rows (default: true)
    pub require_baseline_content: bool,
    /// Sheet of the projects document holding the PROJECT column
    pub projects_sheet: SheetSelector,
    /// Sheet of the owners document holding the owners table
    pub owners_sheet: SheetSelector,
    /// Field delimiter of CSV inputs and outputs (default: comma)
    pub csv_delimiter: u8,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            cross_reference_sheet: DEFAULT_CROSS_REFERENCE_SHEET.to_string(),
            require_baseline_content: true,
            projects_sheet: SheetSelector::Index(0),
            owners_sheet: SheetSelector::Index(0),
            csv_delimiter: b',',
        }
    }
}

impl GenerateOptions {
    /// Set the placeholder token
    pub fn with_placeholder<S: Into<String>>(mut self, placeholder: S) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// CSV read options derived from these options
    pub fn csv_read_options(&self) -> CsvReadOptions {
        CsvReadOptions {
            delimiter: self.csv_delimiter,
        }
    }

    /// CSV write options derived from these options
    pub fn csv_write_options(&self) -> CsvWriteOptions {
        CsvWriteOptions {
            delimiter: self.csv_delimiter,
        }
    }

    /// Set the cross-reference sheet name
    pub fn with_cross_reference_sheet<S: Into<String>>(mut self, name: S) -> Self {
        self.cross_reference_sheet = name.into();
        self
    }
}
