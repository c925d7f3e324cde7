/// Keyword-based pruning of a directory tree.
///
/// Deletes every file and directory below a root whose base name contains
/// any keyword, ignoring case. Entries are visited bottom-up so a directory
/// is only evaluated once everything inside it has been.
use crate::keywords::KeywordSet;
use crate::report::{EntryKind, Outcome, Phase, PhaseReport, SweepError, SweepResult};
use crate::tree;
use std::collections::HashSet;
use std::path::Path;

/// Removes entries whose names match a [`KeywordSet`].
pub struct KeywordPruner<'a> {
    keywords: &'a KeywordSet,
    dry_run: bool,
}

impl<'a> KeywordPruner<'a> {
    pub fn new(keywords: &'a KeywordSet) -> Self {
        Self {
            keywords,
            dry_run: false,
        }
    }

    /// In a dry run, matches are reported as deleted but nothing is removed.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Prunes everything below `root`; the root itself is never removed.
    ///
    /// Matched files are removed individually and matched directories
    /// recursively. A failure on one entry is recorded in the report and the
    /// walk carries on with the next.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::RootUnreadable` if `root` cannot be enumerated,
    /// in which case nothing is touched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mediasweep::keywords::KeywordSet;
    /// use mediasweep::pruner::KeywordPruner;
    /// use std::path::Path;
    ///
    /// let keywords = KeywordSet::new(["draft", "project"]);
    /// match KeywordPruner::new(&keywords).prune(Path::new("/path/to/inbox")) {
    ///     Ok(report) => println!("Deleted {} entries", report.deleted_count()),
    ///     Err(e) => eprintln!("Pruning aborted: {}", e),
    /// }
    /// ```
    pub fn prune(&self, root: &Path) -> SweepResult<PhaseReport> {
        tree::check_readable(root).map_err(|source| SweepError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let mut report = PhaseReport::new(Phase::Prune, self.dry_run);
        let listing = tree::bottom_up(root, &HashSet::new());

        for failure in listing.errors {
            report.record(Outcome::Failed(failure));
        }

        for entry in &listing.entries {
            let name = entry.file_name().to_string_lossy();
            if !self.keywords.matches(&name) {
                continue;
            }

            let kind = EntryKind::of(entry.file_type());
            report.record(tree::remove_entry(entry.path(), kind, self.dry_run));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree(root: &Path) {
        fs::write(root.join("draft_notes.txt"), "notes").expect("Failed to write file");
        fs::write(root.join("final.txt"), "final").expect("Failed to write file");
        fs::create_dir(root.join("project")).expect("Failed to create dir");
        fs::write(root.join("project/old.log"), "log").expect("Failed to write file");
    }

    #[test]
    fn test_prune_files_and_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        sample_tree(root);

        let keywords = KeywordSet::new(["project", "draft"]);
        let report = KeywordPruner::new(&keywords)
            .prune(root)
            .expect("Pruning failed");

        assert!(report.is_clean());
        assert_eq!(report.deleted_count(), 2);
        assert!(!root.join("draft_notes.txt").exists());
        assert!(!root.join("project").exists());
        assert!(root.join("final.txt").exists());
    }

    #[test]
    fn test_prune_is_case_insensitive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("My_DRAFT.docx"), "x").expect("Failed to write file");

        let keywords = KeywordSet::new(["Draft"]);
        KeywordPruner::new(&keywords)
            .prune(root)
            .expect("Pruning failed");

        assert!(!root.join("My_DRAFT.docx").exists());
    }

    #[test]
    fn test_nested_matches_deleted_before_parent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("tmp_outer/tmp_inner")).expect("Failed to create dirs");
        fs::write(root.join("tmp_outer/tmp_inner/tmp.txt"), "x").expect("Failed to write file");

        let keywords = KeywordSet::new(["tmp"]);
        let report = KeywordPruner::new(&keywords)
            .prune(root)
            .expect("Pruning failed");

        assert!(report.is_clean());
        let deleted: Vec<_> = report.deleted().map(Path::to_path_buf).collect();
        assert_eq!(
            deleted,
            vec![
                root.join("tmp_outer/tmp_inner/tmp.txt"),
                root.join("tmp_outer/tmp_inner"),
                root.join("tmp_outer"),
            ]
        );
        assert!(!root.join("tmp_outer").exists());
    }

    #[test]
    fn test_root_name_is_never_matched() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("draft_root");
        fs::create_dir(&root).expect("Failed to create dir");
        fs::write(root.join("keep.txt"), "x").expect("Failed to write file");

        let keywords = KeywordSet::new(["draft"]);
        let report = KeywordPruner::new(&keywords)
            .prune(&root)
            .expect("Pruning failed");

        assert_eq!(report.deleted_count(), 0);
        assert!(root.join("keep.txt").exists());
    }

    #[test]
    fn test_second_run_is_noop() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        sample_tree(root);

        let keywords = KeywordSet::new(["project", "draft"]);
        let pruner = KeywordPruner::new(&keywords);
        let first = pruner.prune(root).expect("Pruning failed");
        assert!(first.is_clean());

        let second = pruner.prune(root).expect("Pruning failed");
        assert!(second.outcomes.is_empty());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        sample_tree(root);

        let keywords = KeywordSet::new(["project", "draft"]);
        let report = KeywordPruner::new(&keywords)
            .dry_run(true)
            .prune(root)
            .expect("Pruning failed");

        assert!(report.dry_run);
        assert_eq!(report.deleted_count(), 2);
        assert!(root.join("draft_notes.txt").exists());
        assert!(root.join("project/old.log").exists());
    }

    #[test]
    fn test_unreadable_root_aborts() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let keywords = KeywordSet::new(["x"]);
        let result = KeywordPruner::new(&keywords).prune(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(SweepError::RootUnreadable { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_on_one_entry_does_not_stop_walk() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let locked = root.join("locked");
        fs::create_dir(&locked).expect("Failed to create dir");
        fs::write(locked.join("draft_a.txt"), "x").expect("Failed to write file");
        fs::write(root.join("draft_b.txt"), "x").expect("Failed to write file");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555))
            .expect("Failed to set permissions");

        // Root ignores permission bits, so only check when they are enforced.
        let enforced = fs::write(locked.join("probe"), "x").is_err();

        let keywords = KeywordSet::new(["draft"]);
        let report = KeywordPruner::new(&keywords)
            .prune(root)
            .expect("Pruning failed");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))
            .expect("Failed to restore permissions");

        assert!(!root.join("draft_b.txt").exists());
        if enforced {
            assert_eq!(report.failure_count(), 1);
            assert!(locked.join("draft_a.txt").exists());
        }
    }
}
