//! Delta merge of freshly generated sheets into a baseline document
//!
//! Sheets are matched by name. For a sheet present on both sides, every new
//! row that does not equal some baseline row is appended after the baseline
//! rows. Sheets found on only one side are carried over unchanged; new-only
//! sheets follow the baseline sheets.
//!
//! Baseline rows are bucketed by [`Row::fingerprint`] and candidates are
//! confirmed with [`Row::same_as`], so lookups are near constant time unless
//! many rows collide.

use std::fmt;

use ahash::AHashMap;
use sodgen_core::{Result, Row, Sheet, TabularDocument};

/// Where a merged sheet came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOrigin {
    /// Present in both documents
    Merged,
    /// Present only in the baseline
    BaselineOnly,
    /// Present only in the new document
    NewOnly,
}

impl fmt::Display for MergeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOrigin::Merged => write!(f, "merged"),
            MergeOrigin::BaselineOnly => write!(f, "baseline only"),
            MergeOrigin::NewOnly => write!(f, "new only"),
        }
    }
}

/// Merge result for one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetMerge {
    /// Sheet name
    pub name: String,
    /// Rows added on top of the baseline; every row for a new-only sheet
    pub appended: usize,
    /// Which side(s) the sheet came from
    pub origin: MergeOrigin,
}

/// Merged document plus a per-sheet summary in document order
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub document: TabularDocument,
    pub sheets: Vec<SheetMerge>,
}

impl MergeOutcome {
    /// Total number of rows appended across all sheets
    pub fn appended_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.appended).sum()
    }
}

/// Merge a freshly generated document into a baseline
pub fn merge(baseline: TabularDocument, new: &TabularDocument) -> Result<MergeOutcome> {
    let mut document = TabularDocument::new();
    let mut sheets = Vec::with_capacity(baseline.sheet_count() + new.sheet_count());

    for existing in baseline.into_sheets() {
        let summary = match new.sheet_by_name(existing.name()) {
            Some(fresh) => {
                let (merged, appended) = merge_sheet(existing, fresh);
                let summary = SheetMerge {
                    name: merged.name().to_string(),
                    appended,
                    origin: MergeOrigin::Merged,
                };
                document.add_sheet(merged)?;
                summary
            }
            None => {
                let summary = SheetMerge {
                    name: existing.name().to_string(),
                    appended: 0,
                    origin: MergeOrigin::BaselineOnly,
                };
                document.add_sheet(existing)?;
                summary
            }
        };

        tracing::debug!(
            sheet = %summary.name,
            appended = summary.appended,
            origin = %summary.origin,
            "merged sheet"
        );
        sheets.push(summary);
    }

    for fresh in new.sheets() {
        if document.contains(fresh.name()) {
            continue;
        }
        sheets.push(SheetMerge {
            name: fresh.name().to_string(),
            appended: fresh.row_count(),
            origin: MergeOrigin::NewOnly,
        });
        tracing::debug!(sheet = fresh.name(), rows = fresh.row_count(), "added new sheet");
        document.add_sheet(fresh.clone())?;
    }

    Ok(MergeOutcome { document, sheets })
}

/// Append the rows of `new` missing from `existing`
///
/// Returns the merged sheet and the number of rows appended. Sheets with
/// different column sets share no equal rows, so every new row is appended
/// and new-only columns are added after the baseline columns.
fn merge_sheet(mut existing: Sheet, new: &Sheet) -> (Sheet, usize) {
    let comparable = existing.same_column_set(new);
    let index = if comparable {
        RowIndex::build(existing.rows())
    } else {
        RowIndex::default()
    };
    let baseline_rows = existing.row_count();

    for column in new.columns() {
        existing.add_column(column.clone());
    }
    let layout = existing.columns().to_vec();
    let same_layout = layout.as_slice() == new.columns();

    let mut appended = 0;
    for row in new.rows() {
        let row = if same_layout {
            row.clone()
        } else {
            new.project_row(row, &layout)
        };

        if comparable && index.contains(&existing.rows()[..baseline_rows], &row) {
            continue;
        }
        existing.push_padded(row.into_values());
        appended += 1;
    }

    (existing, appended)
}

/// Baseline row positions bucketed by fingerprint
#[derive(Debug, Default)]
struct RowIndex {
    buckets: AHashMap<u64, Vec<usize>>,
}

impl RowIndex {
    fn build(rows: &[Row]) -> Self {
        let mut buckets: AHashMap<u64, Vec<usize>> = AHashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            buckets.entry(row.fingerprint()).or_default().push(i);
        }
        Self { buckets }
    }

    fn contains(&self, rows: &[Row], candidate: &Row) -> bool {
        self.buckets
            .get(&candidate.fingerprint())
            .is_some_and(|bucket| bucket.iter().any(|&i| rows[i].same_as(candidate)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sodgen_core::{row, CellValue};

    fn sheet(name: &str, columns: &[&str], rows: Vec<Row>) -> Sheet {
        let mut sheet = Sheet::with_columns(name, columns.iter().copied());
        sheet.extend_rows(rows).unwrap();
        sheet
    }

    fn doc(sheets: Vec<Sheet>) -> TabularDocument {
        TabularDocument::try_from(sheets).unwrap()
    }

    #[test]
    fn test_appends_only_missing_rows_in_order() {
        let baseline = doc(vec![sheet(
            "Tasks",
            &["NAME", "DAYS"],
            vec![row!["Plan Apollo", 1], row!["Plan Zeus", 1]],
        )]);
        let new = doc(vec![sheet(
            "Tasks",
            &["NAME", "DAYS"],
            vec![
                row!["Plan Hera", 1],
                row!["Plan Apollo", 1],
                row!["Plan Zeus", 2],
            ],
        )]);

        let outcome = merge(baseline, &new).unwrap();
        let tasks = outcome.document.sheet_by_name("Tasks").unwrap();
        assert_eq!(
            tasks.rows(),
            &[
                row!["Plan Apollo", 1],
                row!["Plan Zeus", 1],
                row!["Plan Hera", 1],
                row!["Plan Zeus", 2],
            ]
        );
        assert_eq!(
            outcome.sheets,
            vec![SheetMerge {
                name: "Tasks".into(),
                appended: 2,
                origin: MergeOrigin::Merged,
            }]
        );
    }

    #[test]
    fn test_empties_match_only_empties() {
        let baseline = doc(vec![sheet("S", &["A", "B"], vec![row!["x", CellValue::Empty]])]);
        let new = doc(vec![sheet(
            "S",
            &["A", "B"],
            vec![row!["x", f64::NAN], row!["x", ""], row!["x", 0]],
        )]);

        let outcome = merge(baseline, &new).unwrap();
        assert_eq!(outcome.appended_rows(), 2);
    }

    #[test]
    fn test_type_sensitive() {
        let baseline = doc(vec![sheet("S", &["A"], vec![row![1]])]);
        let new = doc(vec![sheet("S", &["A"], vec![row!["1"], row![1]])]);

        let outcome = merge(baseline, &new).unwrap();
        assert_eq!(outcome.document.sheet(0).unwrap().rows(), &[row![1], row!["1"]]);
    }

    #[test]
    fn test_sheet_order_and_origins() {
        let baseline = doc(vec![
            sheet("Old", &["A"], vec![row![1]]),
            sheet("Tasks", &["A"], vec![row![1]]),
        ]);
        let new = doc(vec![
            sheet("Fresh", &["A"], vec![row![1], row![2]]),
            sheet("Tasks", &["A"], vec![row![1]]),
        ]);

        let outcome = merge(baseline, &new).unwrap();
        assert_eq!(
            outcome.document.sheet_names().collect::<Vec<_>>(),
            vec!["Old", "Tasks", "Fresh"]
        );
        let origins: Vec<_> = outcome.sheets.iter().map(|s| (s.origin, s.appended)).collect();
        assert_eq!(
            origins,
            vec![
                (MergeOrigin::BaselineOnly, 0),
                (MergeOrigin::Merged, 0),
                (MergeOrigin::NewOnly, 2),
            ]
        );
    }

    #[test]
    fn test_reordered_columns_compare_by_name() {
        let baseline = doc(vec![sheet("S", &["A", "B"], vec![row!["a", "b"]])]);
        let new = doc(vec![sheet("S", &["B", "A"], vec![row!["b", "a"], row!["c", "d"]])]);

        let outcome = merge(baseline, &new).unwrap();
        let merged = outcome.document.sheet(0).unwrap();
        assert_eq!(merged.columns(), &["A", "B"]);
        assert_eq!(merged.rows(), &[row!["a", "b"], row!["d", "c"]]);
    }

    #[test]
    fn test_different_columns_append_everything() {
        let baseline = doc(vec![sheet("S", &["A", "B"], vec![row!["a", "b"]])]);
        let new = doc(vec![sheet("S", &["A", "C"], vec![row!["a", "c"]])]);

        let outcome = merge(baseline, &new).unwrap();
        let merged = outcome.document.sheet(0).unwrap();
        assert_eq!(merged.columns(), &["A", "B", "C"]);
        assert_eq!(
            merged.rows(),
            &[
                row!["a", "b", CellValue::Empty],
                row!["a", CellValue::Empty, "c"],
            ]
        );
        assert_eq!(outcome.appended_rows(), 1);
    }

    #[test]
    fn test_duplicates_within_new_are_kept() {
        let baseline = doc(vec![sheet("S", &["A"], vec![row!["a"]])]);
        let new = doc(vec![sheet("S", &["A"], vec![row!["b"], row!["b"]])]);

        let outcome = merge(baseline, &new).unwrap();
        assert_eq!(outcome.appended_rows(), 2);
    }

    #[test]
    fn test_self_merge_appends_nothing() {
        let base = doc(vec![sheet(
            "S",
            &["A", "B"],
            vec![row!["a", 1], row![CellValue::Empty, true], row!["a", 1]],
        )]);

        let outcome = merge(base.clone(), &base).unwrap();
        assert_eq!(outcome.appended_rows(), 0);
        assert_eq!(outcome.document, base);
    }
}
