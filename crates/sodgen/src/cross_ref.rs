//! Risk/owner cross-reference
//!
//! Every risk names its project in trailing parentheses, e.g.
//! `Outage Risk (Apollo)`. The cross-reference sheet pairs each risk with
//! every owner listed for that project.

use ahash::AHashMap;
use sodgen_core::{CellValue, Result, Sheet, TabularDocument};

use crate::projects::PROJECT_COLUMN;

/// Risk name column of the risks sheet
pub const RISK_NAME: &str = "RISK NAME";
/// Owner type column of the owners table
pub const OWNER_TYPE: &str = "OWNER TYPE";
/// Owner name column of the owners table
pub const OWNER_NAME: &str = "OWNER NAME";
/// Rank column of the owners table
pub const RANK: &str = "RANK";

/// Columns of the cross-reference sheet, in order
pub const CROSS_REFERENCE_COLUMNS: [&str; 4] = [RISK_NAME, OWNER_TYPE, OWNER_NAME, RANK];

/// Owners table indexed by trimmed project
#[derive(Debug, Clone)]
pub struct OwnersTable {
    sheet: Sheet,
    by_project: AHashMap<String, Vec<usize>>,
    columns: [usize; 3],
}

impl OwnersTable {
    /// Validate and index an owners sheet
    ///
    /// The sheet must carry PROJECT, OWNER TYPE, OWNER NAME and RANK.
    pub fn new(sheet: Sheet) -> Result<Self> {
        sheet.require_columns(&[PROJECT_COLUMN, OWNER_TYPE, OWNER_NAME, RANK])?;

        let position = |name: &str| sheet.column_index(name).unwrap_or_default();
        let project_col = position(PROJECT_COLUMN);
        let columns = [position(OWNER_TYPE), position(OWNER_NAME), position(RANK)];

        let mut by_project: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (index, row) in sheet.rows().iter().enumerate() {
            let project = row.get(project_col).map(CellValue::to_text).unwrap_or_default();
            by_project
                .entry(project.trim().to_string())
                .or_default()
                .push(index);
        }

        Ok(Self {
            sheet,
            by_project,
            columns,
        })
    }

    /// Underlying sheet
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Number of owner rows
    pub fn len(&self) -> usize {
        self.sheet.row_count()
    }

    /// Check if the table has no owner rows
    pub fn is_empty(&self) -> bool {
        self.sheet.is_empty()
    }

    /// `[OWNER TYPE, OWNER NAME, RANK]` of every owner of a project, in table order
    ///
    /// Matching is exact and case-sensitive against the trimmed PROJECT text.
    pub fn owners_of<'a>(
        &'a self,
        project: &str,
    ) -> impl Iterator<Item = [&'a CellValue; 3]> + 'a {
        let rows = self.by_project.get(project).map(Vec::as_slice).unwrap_or(&[]);
        rows.iter().filter_map(move |&i| {
            let row = self.sheet.row(i)?;
            let [t, n, r] = self.columns;
            Some([row.get(t)?, row.get(n)?, row.get(r)?])
        })
    }
}

/// Check whether a sheet name denotes the risks sheet
///
/// Matches `risks` after trimming, lowercasing and dropping spaces and hyphens,
/// so `Risks`, ` RISKS ` and `Ri-sks` all qualify.
pub fn is_risks_sheet_name(name: &str) -> bool {
    let normalized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();
    normalized == "risks"
}

/// First risks sheet of a document, in document order
pub fn find_risks_sheet(document: &TabularDocument) -> Option<&Sheet> {
    document.find_sheet(is_risks_sheet_name)
}

/// Project named by a risk: the trimmed text between the last `(` and the
/// first `)` after it
///
/// Returns `None` when there is no such pair or the text is blank.
pub fn project_token(risk_name: &str) -> Option<&str> {
    let open = risk_name.rfind('(')?;
    let rest = &risk_name[open + 1..];
    let close = rest.find(')')?;
    let token = rest[..close].trim();
    (!token.is_empty()).then_some(token)
}

/// Build the cross-reference sheet from an expanded risks sheet
///
/// Risk rows whose RISK NAME is not a string, or names no project, are
/// skipped. The result always has the four cross-reference columns.
pub fn build_cross_reference(
    risks: &Sheet,
    owners: &OwnersTable,
    sheet_name: &str,
) -> Result<Sheet> {
    risks.require_columns(&[RISK_NAME])?;

    let mut sheet = Sheet::with_columns(sheet_name, CROSS_REFERENCE_COLUMNS);
    let mut skipped = 0usize;

    for risk in risks.column_values(RISK_NAME).into_iter().flatten() {
        let Some(project) = risk.as_string().and_then(project_token) else {
            skipped += 1;
            continue;
        };

        for [owner_type, owner_name, rank] in owners.owners_of(project) {
            sheet.push_padded([
                risk.clone(),
                owner_type.clone(),
                owner_name.clone(),
                rank.clone(),
            ]);
        }
    }

    tracing::debug!(
        risks_sheet = risks.name(),
        rows = sheet.row_count(),
        skipped,
        "built cross-reference"
    );

    Ok(sheet)
}
