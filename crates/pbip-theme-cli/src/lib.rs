//! Command-line driver for `pbip-theme`.
//!
//! ```text
//! pbip-theme demo/custom_manual
//!   reads  demo/custom_manual.Report/report.json
//!   writes demo/custom_manual_theme_json/{config,theme}_<page>_<n>_<type>.json
//! ```
//!
//! Argument parsing lives in [`Cli`]; [`run`] does the work and reports
//! progress to the writer it is given, so both are testable in-process.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use pbip_theme::{export_report, write_artifacts, ExportOptions, Report};

/// Directory suffix of a PBIP report folder.
const REPORT_DIR_SUFFIX: &str = ".Report";

/// Report definition file inside the report folder.
const REPORT_FILE: &str = "report.json";

/// Suffix of the default output directory.
const OUTPUT_DIR_SUFFIX: &str = "_theme_json";

/// Extract per-visual theme fragments from a PBIP report.
#[derive(Debug, Clone, Parser)]
#[command(name = "pbip-theme", version)]
pub struct Cli {
    /// PBIP project base path, without the `.Report` suffix.
    pub project: PathBuf,

    /// Report definition to read [default: <PROJECT>.Report/report.json]
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Directory to write into [default: <PROJECT>_theme_json]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Export visuals that declare no type under this name instead of skipping them
    #[arg(long, value_name = "NAME")]
    pub unknown_visual_type: Option<String>,

    /// List the files that would be written without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The report file to read.
    pub fn report_path(&self) -> PathBuf {
        match &self.report {
            Some(path) => path.clone(),
            None => with_suffix(&self.project, REPORT_DIR_SUFFIX).join(REPORT_FILE),
        }
    }

    /// The directory to write into.
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => with_suffix(&self.project, OUTPUT_DIR_SUFFIX),
        }
    }

    /// Log level selected by `-v` flags.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Export options selected by the flags.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            unknown_visual_type: self.unknown_visual_type.clone(),
            ..ExportOptions::default()
        }
    }
}

/// Append `suffix` to the last component of `path`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut joined = OsString::from(path.as_os_str());
    joined.push(suffix);
    PathBuf::from(joined)
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub exported: usize,
    pub skipped: usize,
    /// Files written; empty on a dry run.
    pub written: Vec<PathBuf>,
}

/// Read the report, export every visual and write the results.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<RunSummary> {
    let report_path = cli.report_path();
    let output_dir = cli.output_dir();

    let report = Report::from_path(&report_path)
        .with_context(|| format!("failed to load report {}", report_path.display()))?;
    let summary = export_report(&report, &cli.export_options())
        .context("failed to render theme documents")?;

    let written = if cli.dry_run {
        Vec::new()
    } else {
        write_artifacts(&output_dir, &summary.artifacts)
            .with_context(|| format!("failed to write to {}", output_dir.display()))?
    };

    let verb = if cli.dry_run { "Would save" } else { "Saved" };
    for artifact in &summary.artifacts {
        writeln!(
            out,
            "{verb}: {} and {} to {}",
            artifact.names.config,
            artifact.names.theme,
            output_dir.display()
        )?;
    }
    writeln!(
        out,
        "{} visual(s) exported, {} container(s) skipped",
        summary.artifacts.len(),
        summary.skipped.len()
    )?;

    Ok(RunSummary {
        output_dir,
        exported: summary.artifacts.len(),
        skipped: summary.skipped.len(),
        written,
    })
}
