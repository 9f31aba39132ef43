//! End-to-end tests for generation from files on disk

use pretty_assertions::assert_eq;
use sodgen::prelude::*;
use sodgen::{row, MergeOrigin};
use std::fs;
use std::path::{Path, PathBuf};

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Self { dir };

        let mut tasks = Sheet::with_columns("Tasks", ["NAME", "DAYS"]);
        tasks.push_row(row!["Kickoff", 1]).unwrap();
        tasks.push_row(row!["Plan $project", 2]).unwrap();
        let mut risks = Sheet::with_columns("Risks", ["RISK NAME", "SEVERITY"]);
        risks.push_row(row!["Outage Risk ($project)", "High"]).unwrap();
        TabularDocument::try_from(vec![tasks, risks])
            .unwrap()
            .save(fixture.path("template.xlsx"))
            .unwrap();

        fs::write(fixture.path("projects.csv"), "PROJECT\nApollo\n Apollo \nZeus\n").unwrap();
        fs::write(
            fixture.path("owners.csv"),
            "PROJECT,OWNER TYPE,OWNER NAME,RANK\nApollo,Lead,J. Smith,1\nZeus,Lead,A. Jones,1\n",
        )
        .unwrap();

        fixture
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn paths(&self, output: &str, baseline: Option<&str>) -> GeneratePaths {
        GeneratePaths {
            template: self.path("template.xlsx"),
            projects: self.path("projects.csv"),
            owners: self.path("owners.csv"),
            baseline: baseline.map(|b| self.path(b)),
            output: self.path(output),
        }
    }
}

fn names(path: &Path) -> Vec<String> {
    let doc = TabularDocument::open(path).unwrap();
    doc.sheet_by_name("Tasks")
        .unwrap()
        .column_values("NAME")
        .unwrap()
        .map(CellValue::to_text)
        .collect()
}

#[test]
fn test_full_run_writes_expanded_workbook() {
    let fx = Fixture::new();
    let report = generate_files(&fx.paths("out.xlsx", None), &GenerateOptions::default()).unwrap();

    assert_eq!(report.mode, GenerationMode::Full);
    assert_eq!(report.project_count, 2);

    let doc = TabularDocument::open(fx.path("out.xlsx")).unwrap();
    assert_eq!(
        doc.sheet_names().collect::<Vec<_>>(),
        vec!["Tasks", "Risks", "Risks-Owners"]
    );
    assert_eq!(names(&fx.path("out.xlsx")), vec!["Kickoff", "Plan Apollo", "Plan Zeus"]);
    assert_eq!(
        doc.sheet_by_name("Risks-Owners").unwrap().rows(),
        &[
            row!["Outage Risk (Apollo)", "Lead", "J. Smith", 1],
            row!["Outage Risk (Zeus)", "Lead", "A. Jones", 1],
        ]
    );
}

#[test]
fn test_missing_baseline_file_is_full_mode() {
    let fx = Fixture::new();
    let report = generate_files(
        &fx.paths("out.xlsx", Some("out.xlsx")),
        &GenerateOptions::default(),
    )
    .unwrap();

    assert_eq!(report.mode, GenerationMode::Full);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_rerun_into_own_output_is_idempotent() {
    let fx = Fixture::new();
    let paths = fx.paths("out.xlsx", Some("out.xlsx"));

    generate_files(&paths, &GenerateOptions::default()).unwrap();
    let first = TabularDocument::open(fx.path("out.xlsx")).unwrap();

    let report = generate_files(&paths, &GenerateOptions::default()).unwrap();
    assert_eq!(report.mode, GenerationMode::Delta);
    assert!(report.sheets.iter().all(|s| s.appended == 0));
    assert_eq!(TabularDocument::open(fx.path("out.xlsx")).unwrap(), first);
}

#[test]
fn test_new_project_is_appended() {
    let fx = Fixture::new();
    let paths = fx.paths("out.xlsx", Some("out.xlsx"));
    generate_files(&paths, &GenerateOptions::default()).unwrap();

    fs::write(fx.path("projects.csv"), "PROJECT\nApollo\nZeus\nHera\n").unwrap();
    let report = generate_files(&paths, &GenerateOptions::default()).unwrap();

    assert_eq!(
        names(&fx.path("out.xlsx")),
        vec!["Kickoff", "Plan Apollo", "Plan Zeus", "Plan Hera"]
    );
    let tasks = report.sheets.iter().find(|s| s.name == "Tasks").unwrap();
    assert_eq!((tasks.origin, tasks.appended), (MergeOrigin::Merged, 1));
}

#[test]
fn test_corrupt_baseline_is_a_warning() {
    let fx = Fixture::new();
    fs::write(fx.path("old.xlsx"), b"definitely not a zip archive").unwrap();

    let report = generate_files(
        &fx.paths("out.xlsx", Some("old.xlsx")),
        &GenerateOptions::default(),
    )
    .unwrap();

    assert_eq!(report.mode, GenerationMode::Full);
    assert_eq!(report.warnings.len(), 1);
    assert!(fx.path("out.xlsx").exists());
}

#[test]
fn test_schema_error_writes_nothing() {
    let fx = Fixture::new();
    fs::write(fx.path("owners.csv"), "PROJECT,OWNER TYPE,OWNER NAME\nApollo,Lead,J. Smith\n").unwrap();

    let err = generate_files(&fx.paths("out.xlsx", None), &GenerateOptions::default()).unwrap_err();
    assert!(err.is_schema());
    assert!(!fx.path("out.xlsx").exists());
}

#[test]
fn test_unreadable_template_is_fatal() {
    let fx = Fixture::new();
    fs::write(fx.path("template.xlsx"), b"garbage").unwrap();

    let err = generate_files(&fx.paths("out.xlsx", None), &GenerateOptions::default()).unwrap_err();
    assert!(err.is_unreadable());
    assert!(!fx.path("out.xlsx").exists());
}

#[test]
fn test_csv_output_holds_first_sheet() {
    let fx = Fixture::new();
    generate_files(&fx.paths("tasks.csv", None), &GenerateOptions::default()).unwrap();

    let text = fs::read_to_string(fx.path("tasks.csv")).unwrap();
    assert_eq!(text, "NAME,DAYS\nKickoff,1\nPlan Apollo,2\nPlan Zeus,2\n");
}

#[test]
fn test_unsupported_extension() {
    let fx = Fixture::new();
    fs::write(fx.path("template.ods"), b"").unwrap();

    let err = TabularDocument::open(fx.path("template.ods")).unwrap_err();
    assert!(err.is_unreadable());
}

#[test]
fn test_csv_output_merges_into_itself() {
    let fx = Fixture::new();
    let paths = fx.paths("out.csv", Some("out.csv"));
    generate_files(&paths, &GenerateOptions::default()).unwrap();

    fs::write(fx.path("projects.csv"), "PROJECT\nApollo\nZeus\nHera\n").unwrap();
    let report = generate_files(&paths, &GenerateOptions::default()).unwrap();

    assert_eq!(report.mode, GenerationMode::Delta);
    let tasks = report.sheets.iter().find(|s| s.name == "Tasks").unwrap();
    assert_eq!((tasks.origin, tasks.appended), (MergeOrigin::Merged, 1));

    let text = fs::read_to_string(fx.path("out.csv")).unwrap();
    assert_eq!(
        text,
        "NAME,DAYS\nKickoff,1\nPlan Apollo,2\nPlan Zeus,2\nPlan Hera,2\n"
    );

    let report = generate_files(&paths, &GenerateOptions::default()).unwrap();
    assert!(report.sheets.iter().all(|s| s.appended == 0 || s.origin == MergeOrigin::NewOnly));
    assert_eq!(fs::read_to_string(fx.path("out.csv")).unwrap(), text);
}

#[test]
fn test_csv_delimiter_applies_to_inputs_and_output() {
    let fx = Fixture::new();
    fs::write(fx.path("projects.csv"), "PROJECT;REGION\nApollo;EU\nZeus;US\n").unwrap();
    fs::write(
        fx.path("owners.csv"),
        "PROJECT;OWNER TYPE;OWNER NAME;RANK\nApollo;Lead;Smith, J.;1\n",
    )
    .unwrap();
    let options = GenerateOptions {
        csv_delimiter: b';',
        ..Default::default()
    };

    let report = generate_files(&fx.paths("tasks.csv", None), &options).unwrap();
    assert_eq!(report.project_count, 2);
    assert_eq!(report.cross_reference_rows, Some(1));

    let text = fs::read_to_string(fx.path("tasks.csv")).unwrap();
    assert_eq!(text, "NAME;DAYS\nKickoff;1\nPlan Apollo;2\nPlan Zeus;2\n");
}
