//! Orchestration of a complete sweep.
//!
//! Loads keywords, prunes the source tree by keyword (skipped when there are
//! no keywords), then relocates media files and empties the source. A stage
//! that aborts is recorded and the next stage still runs.

use crate::config::SweepConfig;
use crate::keywords::{KeywordError, KeywordSet};
use crate::pruner::KeywordPruner;
use crate::relocator::{RelocationReport, Relocator};
use crate::report::{PhaseReport, SweepError};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Run-time switches for a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOptions {
    /// Report every action without changing the filesystem.
    pub dry_run: bool,
}

/// What happened to the keyword pruning stage.
#[derive(Debug)]
pub enum PruneStatus {
    Completed(PhaseReport),
    /// No keywords were loaded, so nothing was pruned.
    SkippedNoKeywords,
    Aborted(SweepError),
}

/// What happened to the relocation stage.
#[derive(Debug)]
pub enum RelocationStatus {
    Completed(RelocationReport),
    Aborted(SweepError),
}

/// Everything that happened during one sweep.
#[derive(Debug)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Number of keywords that were loaded.
    pub keyword_count: usize,
    /// Why the keyword file could not be used, if it couldn't.
    pub keyword_warning: Option<KeywordError>,
    pub prune: PruneStatus,
    pub relocation: RelocationStatus,
}

impl SweepReport {
    /// Every phase report that ran, in execution order.
    pub fn phases(&self) -> Vec<&PhaseReport> {
        let mut phases = Vec::new();
        if let PruneStatus::Completed(report) = &self.prune {
            phases.push(report);
        }
        if let RelocationStatus::Completed(report) = &self.relocation {
            phases.extend(report.phases());
        }
        phases
    }

    pub fn failure_count(&self) -> usize {
        self.phases().iter().map(|p| p.failure_count()).sum()
    }

    /// True if no stage aborted and no individual action failed.
    pub fn is_clean(&self) -> bool {
        !matches!(self.prune, PruneStatus::Aborted(_))
            && !matches!(self.relocation, RelocationStatus::Aborted(_))
            && self.failure_count() == 0
    }

    pub fn to_json(&self) -> Value {
        let prune = match &self.prune {
            PruneStatus::Completed(report) => json!({
                "status": "completed",
                "report": report.to_json(),
            }),
            PruneStatus::SkippedNoKeywords => json!({ "status": "skipped" }),
            PruneStatus::Aborted(e) => json!({ "status": "aborted", "error": e.to_string() }),
        };
        let relocation = match &self.relocation {
            RelocationStatus::Completed(report) => json!({
                "status": "completed",
                "phases": report.phases().iter().map(|p| p.to_json()).collect::<Vec<_>>(),
            }),
            RelocationStatus::Aborted(e) => {
                json!({ "status": "aborted", "error": e.to_string() })
            }
        };

        json!({
            "started_at": self.started_at.to_rfc3339(),
            "dry_run": self.dry_run,
            "source": self.source.to_string_lossy(),
            "destination": self.destination.to_string_lossy(),
            "keywords": self.keyword_count,
            "keyword_warning": self.keyword_warning.as_ref().map(|w| w.to_string()),
            "prune": prune,
            "relocation": relocation,
        })
    }

    /// Writes the report to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json_string = serde_json::to_string_pretty(&self.to_json()).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json_string)
    }
}

/// Runs a full sweep: load keywords, prune, relocate.
///
/// Never fails as a whole; every problem ends up in the returned report.
///
/// # Examples
///
/// ```no_run
/// use mediasweep::config::SweepConfig;
/// use mediasweep::sweep::{SweepOptions, run_sweep};
///
/// let config = SweepConfig::new("keywords.csv", "/data/inbox", "/data/media");
/// let report = run_sweep(&config, SweepOptions::default());
/// println!("{} failures", report.failure_count());
/// ```
pub fn run_sweep(config: &SweepConfig, options: SweepOptions) -> SweepReport {
    let started_at = Utc::now();
    let (keywords, keyword_warning) = KeywordSet::load_or_empty(&config.keyword_file);

    let prune = if keywords.is_empty() {
        PruneStatus::SkippedNoKeywords
    } else {
        match KeywordPruner::new(&keywords)
            .dry_run(options.dry_run)
            .prune(&config.source)
        {
            Ok(report) => PruneStatus::Completed(report),
            Err(e) => PruneStatus::Aborted(e),
        }
    };

    // A dry-run prune removed nothing, so tell the relocator what would be gone.
    let pruned: HashSet<PathBuf> = match &prune {
        PruneStatus::Completed(report) if options.dry_run => {
            report.deleted().map(Path::to_path_buf).collect()
        }
        _ => HashSet::new(),
    };

    let relocation = match Relocator::new(&config.extensions)
        .dry_run(options.dry_run)
        .assume_removed(pruned)
        .relocate(&config.source, &config.destination)
    {
        Ok(report) => RelocationStatus::Completed(report),
        Err(e) => RelocationStatus::Aborted(e),
    };

    SweepReport {
        started_at,
        dry_run: options.dry_run,
        source: config.source.clone(),
        destination: config.destination.clone(),
        keyword_count: keywords.len(),
        keyword_warning,
        prune,
        relocation,
    }
}
