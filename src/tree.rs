//! Directory traversal and removal helpers shared by the pruner and relocator.
//!
//! Listings are collected up front so that mutating the tree while acting on
//! them never invalidates an open directory iterator.

use crate::report::{Action, EntryFailure, EntryKind, Outcome};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Entries found under a root, plus any entries that could not be read.
#[derive(Debug, Default)]
pub(crate) struct Listing {
    pub entries: Vec<DirEntry>,
    pub errors: Vec<EntryFailure>,
}

/// Lists every entry below `root` with each directory before its contents.
///
/// The root itself is not listed. Entries whose path is in `skip` are left
/// out together with everything beneath them.
pub(crate) fn top_down(root: &Path, skip: &HashSet<PathBuf>) -> Listing {
    let mut listing = Listing::default();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !skip.contains(entry.path()));

    for item in walker {
        match item {
            Ok(entry) => listing.entries.push(entry),
            Err(err) => listing.errors.push(enumerate_failure(root, err)),
        }
    }

    listing
}

/// Lists every entry below `root` with each directory after its contents.
///
/// Reversing a pre-order listing puts every descendant ahead of its
/// ancestors, which is the order deletions must happen in.
pub(crate) fn bottom_up(root: &Path, skip: &HashSet<PathBuf>) -> Listing {
    let mut listing = top_down(root, skip);
    listing.entries.reverse();
    listing
}

/// Fails fast if `root` cannot be enumerated at all.
pub(crate) fn check_readable(root: &Path) -> io::Result<()> {
    fs::read_dir(root).map(|_| ())
}

/// Removes a single entry, recursively for directories.
///
/// In a dry run nothing is touched and success is reported.
pub(crate) fn remove_entry(path: &Path, kind: EntryKind, dry_run: bool) -> Outcome {
    let result = if dry_run {
        Ok(())
    } else {
        match kind {
            EntryKind::File => fs::remove_file(path),
            EntryKind::Directory => fs::remove_dir_all(path),
        }
    };

    match result {
        Ok(()) => Outcome::Deleted {
            path: path.to_path_buf(),
            kind,
        },
        Err(e) => Outcome::Failed(EntryFailure::new(path, Action::Delete(kind), e)),
    }
}

/// Best-effort absolute form of `path`, following symlinks when it exists.
pub(crate) fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn enumerate_failure(root: &Path, err: walkdir::Error) -> EntryFailure {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    EntryFailure::new(path, Action::Enumerate, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("a/b")).expect("Failed to create dirs");
        fs::write(root.join("a/b/deep.txt"), "deep").expect("Failed to write file");
        fs::write(root.join("a/mid.txt"), "mid").expect("Failed to write file");
        fs::write(root.join("top.txt"), "top").expect("Failed to write file");
    }

    fn position(listing: &Listing, path: &Path) -> usize {
        listing
            .entries
            .iter()
            .position(|e| e.path() == path)
            .expect("entry missing from listing")
    }

    #[test]
    fn test_top_down_lists_parents_first() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        build_tree(root);

        let listing = top_down(root, &HashSet::new());
        assert_eq!(listing.entries.len(), 5);
        assert!(listing.errors.is_empty());
        assert!(position(&listing, &root.join("a")) < position(&listing, &root.join("a/b")));
        assert!(
            position(&listing, &root.join("a/b")) < position(&listing, &root.join("a/b/deep.txt"))
        );
    }

    #[test]
    fn test_bottom_up_lists_children_first() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        build_tree(root);

        let listing = bottom_up(root, &HashSet::new());
        assert!(
            position(&listing, &root.join("a/b/deep.txt")) < position(&listing, &root.join("a/b"))
        );
        assert!(position(&listing, &root.join("a/mid.txt")) < position(&listing, &root.join("a")));
        assert!(position(&listing, &root.join("a/b")) < position(&listing, &root.join("a")));
    }

    #[test]
    fn test_skip_excludes_whole_subtree() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        build_tree(root);

        let skip: HashSet<PathBuf> = [root.join("a")].into_iter().collect();
        let listing = top_down(root, &skip);
        let paths: Vec<_> = listing.entries.iter().map(|e| e.path().to_path_buf()).collect();
        assert_eq!(paths, vec![root.join("top.txt")]);
    }

    #[test]
    fn test_remove_entry_dry_run_leaves_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("keep.txt");
        fs::write(&file, "x").expect("Failed to write file");

        let outcome = remove_entry(&file, EntryKind::File, true);
        assert!(!outcome.is_failure());
        assert!(file.exists());
    }

    #[test]
    fn test_remove_entry_missing_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let outcome = remove_entry(&temp_dir.path().join("gone.txt"), EntryKind::File, false);
        assert!(outcome.is_failure());
    }
}
