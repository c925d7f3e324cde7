//! Media extension allow-list.
//!
//! Decides which files the relocator collects. Matching is a case-insensitive
//! suffix test on the file's base name, so `photo.JPG` matches `.jpg`.
//!
//! # Examples
//!
//! ```
//! use mediasweep::extensions::ExtensionAllowList;
//!
//! let allow_list = ExtensionAllowList::default();
//! assert!(allow_list.matches("clip.MP4"));
//! assert!(!allow_list.matches("notes.txt"));
//! ```

use crate::config::ConfigError;

/// Extensions collected when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 6] = [".mp4", ".mov", ".mkv", ".avi", ".jpg", ".png"];

/// An ordered list of lower-case suffixes, each starting with a dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAllowList {
    suffixes: Vec<String>,
}

impl ExtensionAllowList {
    /// Builds an allow-list, normalising every entry.
    ///
    /// Entries are trimmed, lower-cased and given a leading dot if missing,
    /// so `"MP4"`, `"mp4"` and `".mp4"` are equivalent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidExtension` for an empty entry or one that
    /// is only a dot.
    pub fn new<I, S>(extensions: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = extensions
            .into_iter()
            .map(|ext| normalize(ext.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { suffixes })
    }

    /// Returns true if `file_name` ends with any allowed suffix, ignoring case.
    pub fn matches(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.suffixes.iter().map(String::as_str)
    }
}

impl Default for ExtensionAllowList {
    fn default() -> Self {
        Self {
            suffixes: DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

fn normalize(extension: &str) -> Result<String, ConfigError> {
    let trimmed = extension.trim().to_lowercase();
    let bare = trimmed.trim_start_matches('.');
    if bare.is_empty() {
        return Err(ConfigError::InvalidExtension(extension.to_string()));
    }
    Ok(format!(".{}", bare))
}
