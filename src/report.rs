/// Outcomes of the filesystem actions taken during a sweep.
///
/// Every traversal records one [`Outcome`] per attempted action rather than
/// only printing it, so callers can inspect exactly what was deleted, moved,
/// or left behind after a failure.
use serde_json::{Value, json};
use std::fmt;
use std::fs::FileType;
use std::io;
use std::path::{Path, PathBuf};

/// Whether a filesystem entry is a plain file or a directory.
///
/// Symlinks are never followed and count as files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Classifies an entry from its (non-followed) file type.
    pub fn of(file_type: FileType) -> Self {
        if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

/// The action that was attempted on an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Delete(EntryKind),
    Move,
    Enumerate,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Delete(kind) => write!(f, "delete {}", kind.as_str()),
            Action::Move => write!(f, "move"),
            Action::Enumerate => write!(f, "read"),
        }
    }
}

/// A single action that failed on a single entry.
///
/// Failures never stop a traversal; they are recorded and the walk moves on.
#[derive(Debug)]
pub struct EntryFailure {
    /// The entry the action was attempted on.
    pub path: PathBuf,
    /// What was being attempted.
    pub action: Action,
    /// The underlying filesystem error.
    pub source: io::Error,
}

impl EntryFailure {
    pub fn new(path: impl Into<PathBuf>, action: Action, source: io::Error) -> Self {
        Self {
            path: path.into(),
            action,
            source,
        }
    }
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to {} {}: {}",
            self.action,
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for EntryFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// The result of one attempted action.
#[derive(Debug)]
pub enum Outcome {
    /// An entry was removed (or would be, in a dry run).
    Deleted { path: PathBuf, kind: EntryKind },
    /// A file was moved into the destination.
    Moved { from: PathBuf, to: PathBuf },
    /// The destination directory had to be created.
    CreatedDirectory { path: PathBuf },
    /// The action failed; see the contained failure.
    Failed(EntryFailure),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Renders the outcome as a single console line.
    pub fn describe(&self, dry_run: bool) -> String {
        match (self, dry_run) {
            (Outcome::Deleted { path, kind }, false) => {
                format!("Deleted {}: {}", kind.as_str(), path.display())
            }
            (Outcome::Deleted { path, kind }, true) => {
                format!("Would delete {}: {}", kind.as_str(), path.display())
            }
            (Outcome::Moved { from, to }, false) => {
                format!("Moved {} -> {}", from.display(), to.display())
            }
            (Outcome::Moved { from, to }, true) => {
                format!("Would move {} -> {}", from.display(), to.display())
            }
            (Outcome::CreatedDirectory { path }, false) => {
                format!("Created directory: {}", path.display())
            }
            (Outcome::CreatedDirectory { path }, true) => {
                format!("Would create directory: {}", path.display())
            }
            (Outcome::Failed(failure), _) => failure.to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Outcome::Deleted { path, kind } => json!({
                "status": "ok",
                "action": "delete",
                "kind": kind.as_str(),
                "path": path.to_string_lossy(),
            }),
            Outcome::Moved { from, to } => json!({
                "status": "ok",
                "action": "move",
                "from": from.to_string_lossy(),
                "to": to.to_string_lossy(),
            }),
            Outcome::CreatedDirectory { path } => json!({
                "status": "ok",
                "action": "create_directory",
                "path": path.to_string_lossy(),
            }),
            Outcome::Failed(failure) => json!({
                "status": "failed",
                "action": failure.action.to_string(),
                "path": failure.path.to_string_lossy(),
                "error": failure.source.to_string(),
            }),
        }
    }
}

/// Identifies which traversal produced a [`PhaseReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Prune,
    Move,
    ResidualFiles,
    ResidualDirectories,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Prune => "keyword pruning",
            Phase::Move => "media relocation",
            Phase::ResidualFiles => "residual file cleanup",
            Phase::ResidualDirectories => "residual directory cleanup",
        }
    }
}

/// Every outcome of one traversal phase, in the order they happened.
#[derive(Debug)]
pub struct PhaseReport {
    pub phase: Phase,
    pub dry_run: bool,
    pub outcomes: Vec<Outcome>,
}

impl PhaseReport {
    pub fn new(phase: Phase, dry_run: bool) -> Self {
        Self {
            phase,
            dry_run,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Paths that were deleted successfully.
    pub fn deleted(&self) -> impl Iterator<Item = &Path> + '_ {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            Outcome::Deleted { path, .. } => Some(path.as_path()),
            _ => None,
        })
    }

    /// `(from, to)` pairs of successful moves.
    pub fn moves(&self) -> impl Iterator<Item = (&Path, &Path)> + '_ {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            Outcome::Moved { from, to } => Some((from.as_path(), to.as_path())),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryFailure> + '_ {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            Outcome::Failed(failure) => Some(failure),
            _ => None,
        })
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted().count()
    }

    pub fn moved_count(&self) -> usize {
        self.moves().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Returns true if no action in this phase failed.
    pub fn is_clean(&self) -> bool {
        !self.outcomes.iter().any(Outcome::is_failure)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "phase": self.phase.label(),
            "outcomes": self.outcomes.iter().map(Outcome::to_json).collect::<Vec<_>>(),
        })
    }
}

/// Errors that abort a whole phase before it touches anything.
#[derive(Debug)]
pub enum SweepError {
    /// The root of the traversal could not be enumerated.
    RootUnreadable { path: PathBuf, source: io::Error },
    /// The destination directory is missing and could not be created.
    DestinationUnavailable { path: PathBuf, source: io::Error },
    /// The destination resolves to the source root itself.
    DestinationIsSource { path: PathBuf },
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::RootUnreadable { path, source } => {
                write!(f, "Cannot read directory {}: {}", path.display(), source)
            }
            SweepError::DestinationUnavailable { path, source } => {
                write!(
                    f,
                    "Cannot create destination {}: {}",
                    path.display(),
                    source
                )
            }
            SweepError::DestinationIsSource { path } => {
                write!(
                    f,
                    "Destination {} is the source directory itself",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::RootUnreadable { source, .. }
            | SweepError::DestinationUnavailable { source, .. } => Some(source),
            SweepError::DestinationIsSource { .. } => None,
        }
    }
}

/// Result type for phase-level sweep operations.
pub type SweepResult<T> = Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_report_counts() {
        let mut report = PhaseReport::new(Phase::Prune, false);
        report.record(Outcome::Deleted {
            path: PathBuf::from("/tmp/a/draft.txt"),
            kind: EntryKind::File,
        });
        report.record(Outcome::Failed(EntryFailure::new(
            "/tmp/a/locked",
            Action::Delete(EntryKind::Directory),
            io::Error::from(io::ErrorKind::PermissionDenied),
        )));

        assert_eq!(report.deleted_count(), 1);
        assert_eq!(report.moved_count(), 0);
        assert_eq!(report.failure_count(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_failure_message_names_action_and_path() {
        let failure = EntryFailure::new(
            "/tmp/a/clip.mp4",
            Action::Move,
            io::Error::from(io::ErrorKind::NotFound),
        );
        let message = failure.to_string();
        assert!(message.starts_with("Failed to move /tmp/a/clip.mp4"));
    }

    #[test]
    fn test_describe_dry_run_wording() {
        let outcome = Outcome::Deleted {
            path: PathBuf::from("project"),
            kind: EntryKind::Directory,
        };
        assert_eq!(outcome.describe(false), "Deleted directory: project");
        assert_eq!(outcome.describe(true), "Would delete directory: project");
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = Outcome::Moved {
            from: PathBuf::from("src/photo.jpg"),
            to: PathBuf::from("dst/photo.jpg"),
        };
        let value = outcome.to_json();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["action"], "move");
        assert_eq!(value["to"], "dst/photo.jpg");
    }
}
