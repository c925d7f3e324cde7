//! Command-line interface module for mediasweep.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading and merging
//! - Running the sweep
//! - Printing every outcome and the closing summary

use crate::config::{ConfigFile, Overrides};
use crate::output::OutputFormatter;
use crate::report::{Outcome, PhaseReport};
use crate::sweep::{PruneStatus, RelocationStatus, SweepOptions, SweepReport, run_sweep};
use clap::Parser;
use std::path::PathBuf;

/// Prune a directory tree by keyword, collect its media files, empty the rest.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "mediasweep", version, about)]
pub struct Cli {
    /// TOML configuration file (default: .mediasweeprc.toml or ~/.config/mediasweep/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-delimited keyword file; every field is one keyword
    #[arg(short, long, value_name = "FILE")]
    pub keywords: Option<PathBuf>,

    /// Directory tree to prune and empty
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Directory that collects the media files
    #[arg(short, long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Media extension to collect; repeat for several (replaces the built-in list)
    #[arg(short = 'e', long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Show what would happen without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Also write the full report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            keywords: self.keywords.clone(),
            source: self.source.clone(),
            destination: self.destination.clone(),
            extensions: self.extensions.clone(),
        }
    }
}

/// Runs the CLI application with parsed arguments.
///
/// Only configuration problems are returned as errors. Failures while
/// sweeping are printed and do not make the run fail.
///
/// # Examples
///
/// ```no_run
/// use mediasweep::cli::{Cli, run_cli};
/// use std::path::PathBuf;
///
/// let cli = Cli {
///     source: Some(PathBuf::from("/data/inbox")),
///     destination: Some(PathBuf::from("/data/media")),
///     ..Cli::default()
/// };
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<SweepReport, String> {
    let config = ConfigFile::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?
        .resolve(cli.overrides())
        .map_err(|e| format!("Error in configuration: {}", e))?;
    let options = SweepOptions {
        dry_run: cli.dry_run,
    };

    if options.dry_run {
        OutputFormatter::dry_run_notice("No files will be deleted or moved.");
    }
    OutputFormatter::info(&format!(
        "Sweeping {} into {}",
        config.source.display(),
        config.destination.display()
    ));

    let spinner = OutputFormatter::create_spinner("Working...");
    let report = run_sweep(&config, options);
    spinner.finish_and_clear();

    print_report(&report);

    if let Some(path) = &cli.report {
        match report.save(path) {
            Ok(()) => OutputFormatter::info(&format!("Report written to {}", path.display())),
            Err(e) => OutputFormatter::warning(&format!(
                "Could not write report {}: {}",
                path.display(),
                e
            )),
        }
    }

    Ok(report)
}

/// Prints every outcome of a sweep, one line each, then a summary table.
pub fn print_report(report: &SweepReport) {
    if let Some(warning) = &report.keyword_warning {
        OutputFormatter::warning(&warning.to_string());
    }

    OutputFormatter::header("Keyword pruning");
    match &report.prune {
        PruneStatus::Completed(phase) => print_phase(phase),
        PruneStatus::SkippedNoKeywords => {
            OutputFormatter::warning("No keywords loaded; skipping keyword pruning.")
        }
        PruneStatus::Aborted(e) => OutputFormatter::error(&format!("Pruning aborted: {}", e)),
    }

    match &report.relocation {
        RelocationStatus::Completed(relocation) => {
            for phase in relocation.phases() {
                OutputFormatter::header(&capitalize(phase.phase.label()));
                print_phase(phase);
            }
        }
        RelocationStatus::Aborted(e) => {
            OutputFormatter::header("Media relocation");
            OutputFormatter::error(&format!("Relocation aborted: {}", e));
        }
    }

    OutputFormatter::summary_table(&summary_rows(report));

    if report.is_clean() {
        OutputFormatter::success("Sweep complete.");
    } else {
        OutputFormatter::warning("Sweep finished with errors. Please review the messages above.");
    }
}

fn print_phase(phase: &PhaseReport) {
    if phase.outcomes.is_empty() {
        OutputFormatter::info("Nothing to do.");
        return;
    }

    for outcome in &phase.outcomes {
        let line = outcome.describe(phase.dry_run);
        match outcome {
            Outcome::Failed(_) => OutputFormatter::error(&line),
            _ if phase.dry_run => OutputFormatter::dry_run_notice(&line),
            Outcome::CreatedDirectory { .. } => OutputFormatter::info(&line),
            _ => OutputFormatter::success(&line),
        }
    }
}

fn summary_rows(report: &SweepReport) -> Vec<(&'static str, usize)> {
    let pruned = match &report.prune {
        PruneStatus::Completed(phase) => phase.deleted_count(),
        _ => 0,
    };
    let (moved, residual) = match &report.relocation {
        RelocationStatus::Completed(relocation) => (
            relocation.moves.moved_count(),
            relocation.residual_files.deleted_count()
                + relocation.residual_directories.deleted_count(),
        ),
        RelocationStatus::Aborted(_) => (0, 0),
    };

    vec![
        ("Pruned", pruned),
        ("Moved", moved),
        ("Cleaned up", residual),
        ("Failed", report.failure_count()),
    ]
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
