//! Generation orchestrator
//!
//! One run walks these stages in order:
//!
//! ```text
//! Loading -> Expanding -> CrossReferencing -> ModeDecision -> Merging     -> Done
//!                                                          \-> Passthrough -/
//! ```
//!
//! [`generate`] is pure and works on in-memory documents. [`generate_files`]
//! wraps it with file reading and writing.

use std::fmt;
use std::path::PathBuf;

use sodgen_core::{Result, Sheet, TabularDocument};

use crate::cross_ref::{build_cross_reference, find_risks_sheet, OwnersTable, RISK_NAME};
use crate::expand::expand_document;
use crate::merge::{merge, SheetMerge};
use crate::options::GenerateOptions;
use crate::projects::ProjectList;
use crate::{is_csv_path, DocumentExt};

/// Stage of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Expanding,
    CrossReferencing,
    ModeDecision,
    Merging,
    Passthrough,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loading => "loading",
            Stage::Expanding => "expanding",
            Stage::CrossReferencing => "cross-referencing",
            Stage::ModeDecision => "mode decision",
            Stage::Merging => "merging",
            Stage::Passthrough => "passthrough",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// How the final document was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Freshly generated document written as-is
    Full,
    /// Fresh rows merged into the baseline
    Delta,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Full => write!(f, "full"),
            GenerationMode::Delta => write!(f, "delta"),
        }
    }
}

/// Prior output to merge into
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Baseline {
    /// No prior output
    #[default]
    Absent,
    /// Prior output exists but could not be read
    Unreadable(String),
    /// Prior output read successfully
    Parsed(TabularDocument),
}

impl From<Result<TabularDocument>> for Baseline {
    fn from(result: Result<TabularDocument>) -> Self {
        match result {
            Ok(doc) => Baseline::Parsed(doc),
            Err(e) => Baseline::Unreadable(e.to_string()),
        }
    }
}

/// Everything a run reads
#[derive(Debug, Clone)]
pub struct GenerationInputs {
    /// Template document; every sheet is expanded
    pub template: TabularDocument,
    /// Sheet carrying the PROJECT column
    pub projects: Sheet,
    /// Owners table
    pub owners: Sheet,
    /// Prior output
    pub baseline: Baseline,
}

/// Summary of a run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Full or delta
    pub mode: GenerationMode,
    /// Number of distinct projects expanded
    pub project_count: usize,
    /// Rows in the cross-reference sheet, if one was built
    pub cross_reference_rows: Option<usize>,
    /// Per-sheet merge results; empty in full mode
    pub sheets: Vec<SheetMerge>,
    /// Non-fatal problems, e.g. an unreadable baseline
    pub warnings: Vec<String>,
    /// Stages visited, in order
    pub stages: Vec<Stage>,
}

/// Final document plus its report
#[derive(Debug, Clone)]
pub struct Generation {
    pub document: TabularDocument,
    pub report: GenerationReport,
}

/// Tracks the current stage and records transitions
struct Run {
    stage: Stage,
    stages: Vec<Stage>,
}

impl Run {
    fn start() -> Self {
        tracing::debug!(stage = %Stage::Loading, "entering stage");
        Self {
            stage: Stage::Loading,
            stages: vec![Stage::Loading],
        }
    }

    fn enter(&mut self, next: Stage) {
        tracing::debug!(from = %self.stage, to = %next, "entering stage");
        self.stage = next;
        self.stages.push(next);
    }
}

/// Run one generation over in-memory inputs
///
/// Fails with a schema or empty-input error before any expansion happens.
/// An unreadable baseline is not an error: the run falls back to full mode
/// and records a warning.
pub fn generate(inputs: GenerationInputs, options: &GenerateOptions) -> Result<Generation> {
    let span = tracing::info_span!("generate");
    let _enter = span.enter();

    let GenerationInputs {
        template,
        projects,
        owners,
        baseline,
    } = inputs;

    let mut run = Run::start();
    let projects = ProjectList::from_sheet(&projects)?;
    let owners = OwnersTable::new(owners)?;
    if let Some(risks) = find_risks_sheet(&template) {
        risks.require_columns(&[RISK_NAME])?;
    }
    tracing::info!(
        template_sheets = template.sheet_count(),
        projects = projects.len(),
        owners = owners.len(),
        "loaded inputs"
    );

    run.enter(Stage::Expanding);
    let mut document = expand_document(&template, &projects, &options.placeholder)?;
    tracing::info!(sheets = document.sheet_count(), "expanded template");

    run.enter(Stage::CrossReferencing);
    let cross_reference = match find_risks_sheet(&document) {
        Some(risks) => Some(build_cross_reference(
            risks,
            &owners,
            &options.cross_reference_sheet,
        )?),
        None => None,
    };
    let cross_reference_rows = match cross_reference {
        Some(sheet) => {
            let rows = sheet.row_count();
            document.insert_or_replace(sheet)?;
            tracing::info!(rows, sheet = %options.cross_reference_sheet, "built cross-reference");
            Some(rows)
        }
        None => {
            tracing::info!("no risks sheet, skipping cross-reference");
            None
        }
    };

    run.enter(Stage::ModeDecision);
    let mut warnings = Vec::new();
    let baseline = match baseline {
        Baseline::Parsed(doc) if doc.has_data() || !options.require_baseline_content => Some(doc),
        Baseline::Parsed(_) => {
            tracing::info!("baseline has no data, generating in full");
            None
        }
        Baseline::Unreadable(reason) => {
            tracing::warn!(%reason, "baseline unreadable, generating in full");
            warnings.push(format!(
                "Baseline could not be read ({}); output was generated without merging",
                reason
            ));
            None
        }
        Baseline::Absent => None,
    };

    let (document, mode, sheets) = match baseline {
        Some(existing) => {
            run.enter(Stage::Merging);
            let outcome = merge(existing, &document)?;
            tracing::info!(
                appended = outcome.appended_rows(),
                sheets = outcome.document.sheet_count(),
                "merged into baseline"
            );
            (outcome.document, GenerationMode::Delta, outcome.sheets)
        }
        None => {
            run.enter(Stage::Passthrough);
            (document, GenerationMode::Full, Vec::new())
        }
    };

    run.enter(Stage::Done);
    tracing::info!(%mode, sheets = document.sheet_count(), "generation done");

    Ok(Generation {
        document,
        report: GenerationReport {
            mode,
            project_count: projects.len(),
            cross_reference_rows,
            sheets,
            warnings,
            stages: run.stages,
        },
    })
}

/// File locations for [`generate_files`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratePaths {
    pub template: PathBuf,
    pub projects: PathBuf,
    pub owners: PathBuf,
    /// Prior output; may be the same file as `output`
    pub baseline: Option<PathBuf>,
    pub output: PathBuf,
}

/// Read inputs from disk, run [`generate`] and write the result
///
/// Nothing is written when any step fails.
///
/// A CSV baseline holds a single sheet named after its file stem; it is
/// renamed to the template's first sheet so that sheet merges against it.
pub fn generate_files(paths: &GeneratePaths, options: &GenerateOptions) -> Result<GenerationReport> {
    let csv = options.csv_read_options();
    let template = TabularDocument::open_with(&paths.template, &csv)?;
    let projects =
        TabularDocument::open_with(&paths.projects, &csv)?.take(&options.projects_sheet)?;
    let owners = TabularDocument::open_with(&paths.owners, &csv)?.take(&options.owners_sheet)?;

    let baseline = match &paths.baseline {
        None => Baseline::Absent,
        Some(path) if !path.exists() => {
            tracing::info!(path = %path.display(), "baseline not found, generating in full");
            Baseline::Absent
        }
        Some(path) => {
            let mut opened = TabularDocument::open_with(path, &csv);
            if let (true, Ok(doc), Some(first)) =
                (is_csv_path(path), opened.as_mut(), template.sheet(0))
            {
                if let Some(sheet) = doc.sheets_mut().next() {
                    sheet.set_name(first.name());
                }
            }
            Baseline::from(opened)
        }
    };

    let Generation { document, report } = generate(
        GenerationInputs {
            template,
            projects,
            owners,
            baseline,
        },
        options,
    )?;

    document.save_with(&paths.output, &options.csv_write_options())?;
    tracing::info!(path = %paths.output.display(), "wrote output");

    Ok(report)
}
