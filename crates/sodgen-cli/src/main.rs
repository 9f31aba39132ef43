//! sodgen CLI - expand project sheets and merge them into earlier output

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sodgen::prelude::*;
use sodgen::{MergeOrigin, DEFAULT_CROSS_REFERENCE_SHEET, DEFAULT_PLACEHOLDER};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sodgen")]
#[command(
    author,
    version,
    about = "Expand templated sheets per project and merge them into prior output"
)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true, env = "SODGEN_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an output workbook from a template, projects and owners
    Generate {
        /// Template spreadsheet (xlsx, csv)
        #[arg(short, long, env = "SODGEN_TEMPLATE")]
        template: PathBuf,

        /// Spreadsheet with a PROJECT column
        #[arg(short, long, env = "SODGEN_PROJECTS")]
        projects: PathBuf,

        /// Owners table (PROJECT, OWNER TYPE, OWNER NAME, RANK)
        #[arg(long, env = "SODGEN_OWNERS")]
        owners: PathBuf,

        /// Earlier output to merge into; often the same file as --output
        #[arg(short, long, env = "SODGEN_BASELINE")]
        baseline: Option<PathBuf>,

        /// Output file (xlsx, csv)
        #[arg(short, long, env = "SODGEN_OUTPUT")]
        output: PathBuf,

        /// Token replaced by each project name
        #[arg(long, default_value = DEFAULT_PLACEHOLDER, env = "SODGEN_PLACEHOLDER")]
        placeholder: String,

        /// Name of the risk/owner cross-reference sheet
        #[arg(long, default_value = DEFAULT_CROSS_REFERENCE_SHEET, env = "SODGEN_CROSS_REFERENCE_SHEET")]
        cross_reference_sheet: String,

        /// Merge into a baseline even when none of its sheets has data
        #[arg(long, env = "SODGEN_MERGE_EMPTY_BASELINE")]
        merge_empty_baseline: bool,

        /// Field delimiter of CSV inputs and output (default: comma)
        #[arg(short, long, default_value = ",", env = "SODGEN_CSV_DELIMITER")]
        delimiter: char,
    },

    /// List all sheets in a spreadsheet
    Sheets {
        /// Input spreadsheet file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Generate {
            template,
            projects,
            owners,
            baseline,
            output,
            placeholder,
            cross_reference_sheet,
            merge_empty_baseline,
            delimiter,
        } => {
            let paths = GeneratePaths {
                template,
                projects,
                owners,
                baseline,
                output,
            };
            let options = GenerateOptions {
                require_baseline_content: !merge_empty_baseline,
                csv_delimiter: csv_delimiter(delimiter)?,
                ..GenerateOptions::default()
            }
            .with_placeholder(placeholder)
            .with_cross_reference_sheet(cross_reference_sheet);

            run_generate(&paths, &options)
        }
        Commands::Sheets { input } => list_sheets(&input),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn csv_delimiter(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("Delimiter '{}' is not a single ASCII character", delimiter))
}

fn run_generate(paths: &GeneratePaths, options: &GenerateOptions) -> Result<()> {
    let report = generate_files(paths, options)
        .with_context(|| format!("Failed to generate '{}'", paths.output.display()))?;

    eprintln!(
        "Wrote '{}' ({} mode, {} projects)",
        paths.output.display(),
        report.mode,
        report.project_count
    );
    if let Some(rows) = report.cross_reference_rows {
        eprintln!("  {}: {} rows", options.cross_reference_sheet, rows);
    }
    for sheet in &report.sheets {
        match sheet.origin {
            MergeOrigin::Merged => {
                eprintln!("  {}: {} rows appended", sheet.name, sheet.appended)
            }
            MergeOrigin::BaselineOnly => eprintln!("  {}: kept from baseline", sheet.name),
            MergeOrigin::NewOnly => {
                eprintln!("  {}: new sheet, {} rows", sheet.name, sheet.appended)
            }
        }
    }
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }

    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let document = TabularDocument::open(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;
    tracing::debug!(path = %input.display(), sheets = document.sheet_count(), "opened document");

    for (i, sheet) in document.sheets().enumerate() {
        println!(
            "{}\t{}\t{} columns\t{} rows",
            i,
            sheet.name(),
            sheet.column_count(),
            sheet.row_count()
        );
    }

    Ok(())
}
