//! Template expansion
//!
//! A row whose string values contain the placeholder is a template row. Each
//! sheet expands to its static rows, in their original order, followed by one
//! copy of every template row per project:
//!
//! ```text
//! for project in projects {
//!     for template in template_rows {
//!         emit(template with placeholder -> project)
//!     }
//! }
//! ```

use sodgen_core::{CellValue, Result, Row, Sheet, TabularDocument};

use crate::projects::ProjectList;

/// How a row takes part in expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Copied once, unchanged
    Static,
    /// Copied once per project with the placeholder substituted
    Template,
}

impl RowKind {
    /// Classify a row by scanning its string values for the placeholder
    ///
    /// An empty placeholder matches nothing.
    pub fn classify(row: &Row, placeholder: &str) -> Self {
        let is_template = !placeholder.is_empty()
            && row
                .values()
                .iter()
                .any(|v| v.as_string().is_some_and(|s| s.contains(placeholder)));

        if is_template {
            RowKind::Template
        } else {
            RowKind::Static
        }
    }
}

/// Expand one sheet for every project
pub fn expand_sheet(sheet: &Sheet, projects: &ProjectList, placeholder: &str) -> Sheet {
    let (templates, statics): (Vec<&Row>, Vec<&Row>) = sheet
        .rows()
        .iter()
        .partition(|row| RowKind::classify(row, placeholder) == RowKind::Template);

    let mut expanded = sheet.empty_like();
    for row in &statics {
        expanded.push_padded(row.values().iter().cloned());
    }
    for project in projects.iter() {
        for template in &templates {
            expanded.push_padded(substitute(template, placeholder, project).into_values());
        }
    }

    tracing::debug!(
        sheet = sheet.name(),
        static_rows = statics.len(),
        template_rows = templates.len(),
        rows = expanded.row_count(),
        "expanded sheet"
    );

    expanded
}

/// Expand every sheet of a document, keeping sheet order
pub fn expand_document(
    document: &TabularDocument,
    projects: &ProjectList,
    placeholder: &str,
) -> Result<TabularDocument> {
    let mut expanded = TabularDocument::new();
    for sheet in document.sheets() {
        expanded.add_sheet(expand_sheet(sheet, projects, placeholder))?;
    }
    Ok(expanded)
}

/// Copy a row, replacing every occurrence of the placeholder in string values
fn substitute(row: &Row, placeholder: &str, project: &str) -> Row {
    row.values()
        .iter()
        .map(|value| match value.as_string() {
            Some(s) if s.contains(placeholder) => CellValue::string(s.replace(placeholder, project)),
            _ => value.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_PLACEHOLDER;
    use pretty_assertions::assert_eq;
    use sodgen_core::row;

    fn tasks() -> Sheet {
        let mut sheet = Sheet::with_columns("Tasks", ["NAME", "DAYS", "NOTE"]);
        sheet.push_row(row!["Kickoff", 1, CellValue::Empty]).unwrap();
        sheet.push_row(row!["Plan $project", 2, "for $project/$project"]).unwrap();
        sheet.push_row(row!["Close", 3, "done"]).unwrap();
        sheet.push_row(row!["Review $project", 4, CellValue::Empty]).unwrap();
        sheet
    }

    fn projects() -> ProjectList {
        ProjectList::from_names(["Apollo", "Zeus"]).unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(RowKind::classify(&row!["a $project b"], "$project"), RowKind::Template);
        assert_eq!(RowKind::classify(&row!["$Project"], "$project"), RowKind::Static);
        assert_eq!(RowKind::classify(&row![1, true], "$project"), RowKind::Static);
        assert_eq!(RowKind::classify(&row!["$project"], ""), RowKind::Static);
    }

    #[test]
    fn test_static_rows_first_then_projects_outer() {
        let expanded = expand_sheet(&tasks(), &projects(), DEFAULT_PLACEHOLDER);

        let names: Vec<String> = expanded
            .column_values("NAME")
            .unwrap()
            .map(CellValue::to_text)
            .collect();
        assert_eq!(
            names,
            vec![
                "Kickoff",
                "Close",
                "Plan Apollo",
                "Review Apollo",
                "Plan Zeus",
                "Review Zeus",
            ]
        );
        assert_eq!(expanded.columns(), tasks().columns());
    }

    #[test]
    fn test_replaces_every_occurrence_and_keeps_other_values() {
        let expanded = expand_sheet(&tasks(), &projects(), DEFAULT_PLACEHOLDER);
        assert_eq!(expanded.row(2).unwrap(), &row!["Plan Apollo", 2, "for Apollo/Apollo"]);
        assert_eq!(expanded.row(3).unwrap(), &row!["Review Apollo", 4, CellValue::Empty]);
    }

    #[test]
    fn test_no_template_rows_is_identity() {
        let mut sheet = Sheet::with_columns("Static", ["A", "B"]);
        sheet.push_row(row!["x", 1]).unwrap();
        sheet.push_row(row![CellValue::Empty, "y"]).unwrap();

        assert_eq!(expand_sheet(&sheet, &projects(), DEFAULT_PLACEHOLDER), sheet);
    }

    #[test]
    fn test_empty_sheet_keeps_columns() {
        let sheet = Sheet::with_columns("Empty", ["A"]);
        let expanded = expand_sheet(&sheet, &projects(), DEFAULT_PLACEHOLDER);
        assert_eq!(expanded.columns(), &["A"]);
        assert!(expanded.is_empty());
    }

    #[test]
    fn test_custom_placeholder() {
        let mut sheet = Sheet::with_columns("S", ["A"]);
        sheet.push_row(row!["{{p}} and $project"]).unwrap();
        let expanded = expand_sheet(&sheet, &projects(), "{{p}}");
        assert_eq!(expanded.row(1).unwrap(), &row!["Zeus and $project"]);
    }

    #[test]
    fn test_expand_document_keeps_order() {
        let mut doc = TabularDocument::new();
        doc.add_sheet(tasks()).unwrap();
        doc.add_sheet(Sheet::with_columns("Risks", ["RISK NAME"])).unwrap();

        let expanded = expand_document(&doc, &projects(), DEFAULT_PLACEHOLDER).unwrap();
        assert_eq!(expanded.sheet_names().collect::<Vec<_>>(), vec!["Tasks", "Risks"]);
        assert_eq!(expanded.sheet(0).unwrap().row_count(), 6);
    }
}
