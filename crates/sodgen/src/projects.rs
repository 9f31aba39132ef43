//! Project list loading

use ahash::AHashSet;
use sodgen_core::{Error, Result, Sheet};

/// Column holding project identifiers
pub const PROJECT_COLUMN: &str = "PROJECT";

/// Ordered, deduplicated project names
///
/// Names are trimmed and non-empty; the first occurrence of a name fixes its
/// position. A list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectList {
    projects: Vec<String>,
}

impl ProjectList {
    /// Load the PROJECT column of a sheet
    ///
    /// Values are compared in their text form, so a numeric project id `7`
    /// and the string `"7"` are the same project.
    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        sheet.require_columns(&[PROJECT_COLUMN])?;

        let values = sheet
            .column_values(PROJECT_COLUMN)
            .into_iter()
            .flatten()
            .map(|v| v.to_text());

        Self::collect(values).ok_or_else(|| {
            Error::EmptyInput(format!(
                "column {} of sheet '{}'",
                PROJECT_COLUMN,
                sheet.name()
            ))
        })
    }

    /// Build a list from names directly
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::collect(names.into_iter().map(|s| s.as_ref().to_string()))
            .ok_or_else(|| Error::EmptyInput("project list".into()))
    }

    fn collect<I: Iterator<Item = String>>(values: I) -> Option<Self> {
        let mut seen = AHashSet::new();
        let mut projects = Vec::new();

        for value in values {
            let name = value.trim();
            if name.is_empty() || seen.contains(name) {
                continue;
            }
            seen.insert(name.to_string());
            projects.push(name.to_string());
        }

        (!projects.is_empty()).then_some(Self { projects })
    }

    /// Number of projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Check if the list has no projects; never true for a loaded list
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Iterate over project names in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(String::as_str)
    }

    /// Project names in order
    pub fn as_slice(&self) -> &[String] {
        &self.projects
    }
}

impl<'a> IntoIterator for &'a ProjectList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.projects.iter()
    }
}
