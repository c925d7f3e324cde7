//! Keyword loading and matching.
//!
//! Keywords come from a comma-delimited text file. Every field of every row is
//! one keyword; rows and columns carry no meaning. Matching is a
//! case-insensitive substring test against an entry's base name.
//!
//! # Examples
//!
//! ```
//! use mediasweep::keywords::KeywordSet;
//!
//! let keywords = KeywordSet::from_reader("project,draft\n".as_bytes()).unwrap();
//! assert!(keywords.matches("Draft_notes.txt"));
//! assert!(!keywords.matches("final.txt"));
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a keyword file.
#[derive(Debug)]
pub enum KeywordError {
    /// The keyword file does not exist.
    NotFound(PathBuf),
    /// The keyword file exists but could not be opened.
    Read { path: PathBuf, source: io::Error },
    /// The keyword file could not be parsed as comma-delimited text.
    Parse { path: PathBuf, reason: String },
}

impl fmt::Display for KeywordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordError::NotFound(path) => {
                write!(f, "Keyword file not found: {}", path.display())
            }
            KeywordError::Read { path, source } => {
                write!(f, "Failed to read keyword file {}: {}", path.display(), source)
            }
            KeywordError::Parse { path, reason } => {
                write!(f, "Failed to parse keyword file {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for KeywordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KeywordError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for keyword loading.
pub type KeywordResult<T> = Result<T, KeywordError>;

/// An ordered set of keywords, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
    folded: Vec<String>,
}

impl KeywordSet {
    /// Builds a set from raw tokens, keeping their order.
    ///
    /// Empty tokens are dropped, so a row such as `,` or `draft,` contributes
    /// no empty keyword. A plain CSV reader would keep `""` and match every
    /// name with it; here such a row means no keyword at all.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = tokens
            .into_iter()
            .map(Into::into)
            .filter(|token| !token.is_empty())
            .collect();
        let folded = keywords.iter().map(|k| k.to_lowercase()).collect();
        Self { keywords, folded }
    }

    /// Parses comma-delimited text, flattening every field of every row.
    ///
    /// No header row is assumed and rows may have different lengths.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut tokens = Vec::new();
        for record in reader.records() {
            let record = record?;
            tokens.extend(record.iter().map(str::to_string));
        }

        Ok(Self::new(tokens))
    }

    /// Loads keywords from a file.
    ///
    /// # Errors
    ///
    /// Returns `KeywordError::NotFound` if the file does not exist,
    /// `KeywordError::Read` if it cannot be opened and
    /// `KeywordError::Parse` if its content is not valid delimited text.
    pub fn load(path: &Path) -> KeywordResult<Self> {
        let file = File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                KeywordError::NotFound(path.to_path_buf())
            } else {
                KeywordError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_reader(file).map_err(|e| KeywordError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Loads keywords, degrading any failure to an empty set.
    ///
    /// The failure is handed back so the caller can report it.
    pub fn load_or_empty(path: &Path) -> (Self, Option<KeywordError>) {
        match Self::load(path) {
            Ok(keywords) => (keywords, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Returns true if any keyword occurs in `name`, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.folded.iter().any(|keyword| name.contains(keyword.as_str()))
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Iterates the keywords as they were read.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.keywords.iter().map(String::as_str)
    }
}
