/// Media relocation and source cleanup.
///
/// Collects every allow-listed file below a source root into one flat
/// destination directory, then removes everything else left in the source.
/// The phases run strictly in order:
///
/// 1. ensure the destination exists
/// 2. move matching files, walking top-down
/// 3. delete every remaining file
/// 4. delete every remaining directory, walking bottom-up
///
/// The source root itself is kept; only its contents go.
use crate::extensions::ExtensionAllowList;
use crate::report::{
    Action, EntryFailure, EntryKind, Outcome, Phase, PhaseReport, SweepError, SweepResult,
};
use crate::tree;
use rand::Rng;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Range the collision suffix is drawn from; always five decimal digits.
pub const SUFFIX_RANGE: RangeInclusive<u32> = 10_000..=99_999;

/// How many suffixes are tried before a file is reported as unmovable.
const MAX_RENAME_ATTEMPTS: usize = 16;

/// Reports for the three traversal phases of a relocation.
#[derive(Debug)]
pub struct RelocationReport {
    /// Destination creation and file moves.
    pub moves: PhaseReport,
    /// Deletion of files left in the source.
    pub residual_files: PhaseReport,
    /// Deletion of directories left in the source.
    pub residual_directories: PhaseReport,
}

impl RelocationReport {
    fn new(dry_run: bool) -> Self {
        Self {
            moves: PhaseReport::new(Phase::Move, dry_run),
            residual_files: PhaseReport::new(Phase::ResidualFiles, dry_run),
            residual_directories: PhaseReport::new(Phase::ResidualDirectories, dry_run),
        }
    }

    /// The phase reports in execution order.
    pub fn phases(&self) -> [&PhaseReport; 3] {
        [&self.moves, &self.residual_files, &self.residual_directories]
    }

    pub fn failure_count(&self) -> usize {
        self.phases().iter().map(|p| p.failure_count()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.phases().iter().all(|p| p.is_clean())
    }
}

/// Moves allow-listed files into a destination and empties the source.
pub struct Relocator<'a> {
    allow_list: &'a ExtensionAllowList,
    dry_run: bool,
    removed: HashSet<PathBuf>,
}

impl<'a> Relocator<'a> {
    pub fn new(allow_list: &'a ExtensionAllowList) -> Self {
        Self {
            allow_list,
            dry_run: false,
            removed: HashSet::new(),
        }
    }

    /// In a dry run, every phase reports what it would do and nothing changes.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Treats these paths (and anything below them) as already gone.
    ///
    /// Lets a dry run follow on from a dry-run prune as if the prune had
    /// really happened.
    pub fn assume_removed<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.removed.extend(paths);
        self
    }

    /// Relocates media files from `source` into `destination`.
    ///
    /// Directory structure is flattened: each file lands directly in
    /// `destination` under its base name. A name that is already taken gets
    /// a random five-digit suffix between stem and extension, so
    /// `photo.jpg` becomes e.g. `photo_48213.jpg`. Existing files are never
    /// overwritten.
    ///
    /// If `destination` lies inside `source`, its subtree is left alone.
    /// A media file that cannot be moved is kept in the source, along with
    /// the directories that contain it.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::DestinationUnavailable` if the destination cannot
    /// be created, `SweepError::RootUnreadable` if the source cannot be
    /// enumerated and `SweepError::DestinationIsSource` if both are the same
    /// directory. Nothing is created, moved or deleted in those cases.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mediasweep::extensions::ExtensionAllowList;
    /// use mediasweep::relocator::Relocator;
    /// use std::path::Path;
    ///
    /// let allow_list = ExtensionAllowList::default();
    /// let report = Relocator::new(&allow_list)
    ///     .relocate(Path::new("/path/to/inbox"), Path::new("/path/to/media"));
    ///
    /// match report {
    ///     Ok(report) => println!("Moved {} files", report.moves.moved_count()),
    ///     Err(e) => eprintln!("Relocation aborted: {}", e),
    /// }
    /// ```
    pub fn relocate(&self, source: &Path, destination: &Path) -> SweepResult<RelocationReport> {
        let mut report = RelocationReport::new(self.dry_run);

        // Create nothing until the source is known to exist, or a nested
        // destination would bring a missing source root back into being.
        tree::check_readable(source).map_err(|source_error| SweepError::RootUnreadable {
            path: source.to_path_buf(),
            source: source_error,
        })?;
        self.ensure_destination(destination, &mut report.moves)?;
        let nested = nested_destination(source, destination)?;

        let mut skip = self.removed.clone();
        let mut protected: Vec<PathBuf> = Vec::new();
        if let Some(nested) = nested {
            skip.insert(nested.clone());
            protected.push(nested);
        }

        let kept = self.move_phase(source, destination, &mut skip, &mut report.moves);
        protected.extend(kept.iter().cloned());

        self.residual_file_phase(source, &skip, &kept, &mut report.residual_files);
        self.residual_directory_phase(
            source,
            &skip,
            &protected,
            &mut report.residual_directories,
        );

        Ok(report)
    }

    fn ensure_destination(&self, destination: &Path, report: &mut PhaseReport) -> SweepResult<()> {
        if destination.is_dir() {
            return Ok(());
        }

        if !self.dry_run {
            fs::create_dir_all(destination).map_err(|source| {
                SweepError::DestinationUnavailable {
                    path: destination.to_path_buf(),
                    source,
                }
            })?;
        }

        report.record(Outcome::CreatedDirectory {
            path: destination.to_path_buf(),
        });
        Ok(())
    }

    /// Moves matching files top-down and returns the files that failed to move.
    ///
    /// In a dry run, planned moves are added to `skip` so later phases do not
    /// report them again.
    fn move_phase(
        &self,
        source: &Path,
        destination: &Path,
        skip: &mut HashSet<PathBuf>,
        report: &mut PhaseReport,
    ) -> HashSet<PathBuf> {
        let listing = tree::top_down(source, skip);
        for failure in listing.errors {
            report.record(Outcome::Failed(failure));
        }

        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut kept: HashSet<PathBuf> = HashSet::new();

        for entry in &listing.entries {
            if entry.file_type().is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            if !self.allow_list.matches(&file_name.to_string_lossy()) {
                continue;
            }

            let from = entry.path();
            let result = claim_target(destination, file_name, &mut claimed).and_then(|to| {
                if !self.dry_run {
                    move_file(from, &to)?;
                }
                Ok(to)
            });

            match result {
                Ok(to) => {
                    if self.dry_run {
                        skip.insert(from.to_path_buf());
                    }
                    report.record(Outcome::Moved {
                        from: from.to_path_buf(),
                        to,
                    });
                }
                Err(e) => {
                    kept.insert(from.to_path_buf());
                    report.record(Outcome::Failed(EntryFailure::new(from, Action::Move, e)));
                }
            }
        }

        kept
    }

    fn residual_file_phase(
        &self,
        source: &Path,
        skip: &HashSet<PathBuf>,
        kept: &HashSet<PathBuf>,
        report: &mut PhaseReport,
    ) {
        let listing = tree::top_down(source, skip);
        for failure in listing.errors {
            report.record(Outcome::Failed(failure));
        }

        for entry in &listing.entries {
            if entry.file_type().is_dir() || kept.contains(entry.path()) {
                continue;
            }
            report.record(tree::remove_entry(
                entry.path(),
                EntryKind::File,
                self.dry_run,
            ));
        }
    }

    fn residual_directory_phase(
        &self,
        source: &Path,
        skip: &HashSet<PathBuf>,
        protected: &[PathBuf],
        report: &mut PhaseReport,
    ) {
        let listing = tree::bottom_up(source, skip);
        for failure in listing.errors {
            report.record(Outcome::Failed(failure));
        }

        for entry in &listing.entries {
            if !entry.file_type().is_dir() {
                continue;
            }
            let dir = entry.path();
            if protected.iter().any(|path| path.starts_with(dir)) {
                continue;
            }
            report.record(tree::remove_entry(dir, EntryKind::Directory, self.dry_run));
        }
    }
}

/// Inserts `_<suffix>` between a file name's stem and its extension.
///
/// `photo.jpg` with suffix `12345` becomes `photo_12345.jpg`; a name without
/// an extension just gets the suffix appended.
pub fn suffixed_name(file_name: &OsStr, suffix: u32) -> OsString {
    let path = Path::new(file_name);
    let stem = path.file_stem().unwrap_or(file_name);

    let mut name = stem.to_os_string();
    name.push(format!("_{}", suffix));
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    name
}

/// Picks a free destination path for `file_name` and reserves it.
fn claim_target(
    destination: &Path,
    file_name: &OsStr,
    claimed: &mut HashSet<PathBuf>,
) -> io::Result<PathBuf> {
    let direct = destination.join(file_name);
    if !is_taken(&direct, claimed) {
        claimed.insert(direct.clone());
        return Ok(direct);
    }

    let mut rng = rand::rng();
    for _ in 0..MAX_RENAME_ATTEMPTS {
        let suffix = rng.random_range(SUFFIX_RANGE);
        let candidate = destination.join(suffixed_name(file_name, suffix));
        if !is_taken(&candidate, claimed) {
            claimed.insert(candidate.clone());
            return Ok(candidate);
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "no free name for {} in {}",
            file_name.to_string_lossy(),
            destination.display()
        ),
    ))
}

fn is_taken(path: &Path, claimed: &HashSet<PathBuf>) -> bool {
    claimed.contains(path) || path.symlink_metadata().is_ok()
}

/// Renames `from` to `to`, copying and deleting when they are on different filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

/// Returns the destination as a path inside `source`, if it lies within it.
fn nested_destination(source: &Path, destination: &Path) -> SweepResult<Option<PathBuf>> {
    let resolved_source = tree::resolve(source);
    let resolved_destination = tree::resolve(destination);

    match resolved_destination.strip_prefix(&resolved_source) {
        Ok(relative) if relative.as_os_str().is_empty() => Err(SweepError::DestinationIsSource {
            path: destination.to_path_buf(),
        }),
        Ok(relative) => Ok(Some(source.join(relative))),
        Err(_) => Ok(None),
    }
}
