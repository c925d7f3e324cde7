//! Sweep configuration.
//!
//! A sweep needs three paths (the keyword file, the source root and the
//! destination root) plus the media extension allow-list. They can come from a
//! TOML configuration file, from command-line arguments, or both; arguments
//! win over file values.
//!
//! # Configuration File Format
//!
//! ```toml
//! keywords = "keywords.csv"
//! source = "/data/inbox"
//! destination = "/data/media"
//! extensions = [".mp4", ".mov", ".mkv", ".avi", ".jpg", ".png"]
//! ```

use crate::extensions::ExtensionAllowList;
use crate::tree;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keyword file used when neither the file nor the arguments name one.
pub const DEFAULT_KEYWORD_FILE: &str = "keywords.csv";

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
    /// A required setting was given neither in the file nor on the command line.
    MissingSetting(&'static str),
    /// An extension entry is empty once normalised.
    InvalidExtension(String),
    /// Destination and source resolve to the same directory.
    DestinationIsSource(PathBuf),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
            ConfigError::MissingSetting(name) => {
                write!(
                    f,
                    "Missing setting '{}': pass --{} or set it in the configuration file",
                    name, name
                )
            }
            ConfigError::InvalidExtension(ext) => {
                write!(f, "Invalid extension '{}': expected something like .mp4", ext)
            }
            ConfigError::DestinationIsSource(path) => {
                write!(
                    f,
                    "Destination {} must not be the source directory",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings as they appear in a configuration file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to the comma-delimited keyword file.
    pub keywords: Option<PathBuf>,
    /// Directory tree to prune and empty.
    pub source: Option<PathBuf>,
    /// Directory that collects the media files.
    pub destination: Option<PathBuf>,
    /// Media extensions to collect. Empty means the built-in list.
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// Values taken from the command line, applied over a [`ConfigFile`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub keywords: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub extensions: Vec<String>,
}

impl ConfigFile {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.mediasweeprc.toml` in the current directory
    /// 3. Look for `~/.config/mediasweep/config.toml` in home directory
    /// 4. Fall back to an empty configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any file that is found fails to parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".mediasweeprc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("mediasweep")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Merges command-line values over this file and validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSetting` if no source or destination is known,
    /// `ConfigError::InvalidExtension` for a malformed extension and
    /// `ConfigError::DestinationIsSource` if both roots are the same directory.
    pub fn resolve(self, overrides: Overrides) -> Result<SweepConfig, ConfigError> {
        let keyword_file = overrides
            .keywords
            .or(self.keywords)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEYWORD_FILE));
        let source = overrides
            .source
            .or(self.source)
            .ok_or(ConfigError::MissingSetting("source"))?;
        let destination = overrides
            .destination
            .or(self.destination)
            .ok_or(ConfigError::MissingSetting("destination"))?;

        let extensions = if !overrides.extensions.is_empty() {
            ExtensionAllowList::new(&overrides.extensions)?
        } else if !self.extensions.is_empty() {
            ExtensionAllowList::new(&self.extensions)?
        } else {
            ExtensionAllowList::default()
        };

        let config = SweepConfig {
            keyword_file,
            source,
            destination,
            extensions,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Everything a sweep needs, passed explicitly to [`crate::sweep::run_sweep`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Comma-delimited keyword file.
    pub keyword_file: PathBuf,
    /// Root of the tree to prune and empty. The root itself is kept.
    pub source: PathBuf,
    /// Flat directory that receives the media files.
    pub destination: PathBuf,
    /// Which files count as media.
    pub extensions: ExtensionAllowList,
}

impl SweepConfig {
    /// Creates a configuration with the default extension allow-list.
    pub fn new(
        keyword_file: impl Into<PathBuf>,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            keyword_file: keyword_file.into(),
            source: source.into(),
            destination: destination.into(),
            extensions: ExtensionAllowList::default(),
        }
    }

    pub fn with_extensions(mut self, extensions: ExtensionAllowList) -> Self {
        self.extensions = extensions;
        self
    }

    /// Checks that the destination is not the source root itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if tree::resolve(&self.source) == tree::resolve(&self.destination) {
            return Err(ConfigError::DestinationIsSource(self.destination.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_file() {
        let toml_str = r#"
keywords = "words.csv"
source = "/data/inbox"
destination = "/data/media"
extensions = ["mp3", ".FLAC"]
"#;
        let file = ConfigFile::from_toml(toml_str).expect("Failed to parse config");
        assert_eq!(file.keywords, Some(PathBuf::from("words.csv")));
        assert_eq!(file.extensions, vec!["mp3", ".FLAC"]);

        let config = file
            .resolve(Overrides::default())
            .expect("Failed to resolve config");
        assert_eq!(config.source, PathBuf::from("/data/inbox"));
        let exts: Vec<_> = config.extensions.iter().collect();
        assert_eq!(exts, vec![".mp3", ".flac"]);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = ConfigFile::from_toml("").expect("Failed to parse config");
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ConfigFile::from_toml("sourse = \"/tmp\"\n");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_overrides_win() {
        let file = ConfigFile {
            keywords: Some(PathBuf::from("file.csv")),
            source: Some(PathBuf::from("/from/file")),
            destination: Some(PathBuf::from("/dest/file")),
            extensions: vec![".mp4".to_string()],
        };
        let overrides = Overrides {
            source: Some(PathBuf::from("/from/args")),
            extensions: vec!["png".to_string()],
            ..Overrides::default()
        };

        let config = file.resolve(overrides).expect("Failed to resolve config");
        assert_eq!(config.keyword_file, PathBuf::from("file.csv"));
        assert_eq!(config.source, PathBuf::from("/from/args"));
        assert_eq!(config.destination, PathBuf::from("/dest/file"));
        assert!(config.extensions.matches("a.png"));
        assert!(!config.extensions.matches("a.mp4"));
    }

    #[test]
    fn test_default_keyword_file_and_extensions() {
        let overrides = Overrides {
            source: Some(PathBuf::from("/in")),
            destination: Some(PathBuf::from("/out")),
            ..Overrides::default()
        };
        let config = ConfigFile::default()
            .resolve(overrides)
            .expect("Failed to resolve config");
        assert_eq!(config.keyword_file, PathBuf::from(DEFAULT_KEYWORD_FILE));
        assert_eq!(config.extensions, ExtensionAllowList::default());
    }

    #[test]
    fn test_missing_source() {
        let overrides = Overrides {
            destination: Some(PathBuf::from("/out")),
            ..Overrides::default()
        };
        let result = ConfigFile::default().resolve(overrides);
        assert!(matches!(result, Err(ConfigError::MissingSetting("source"))));
    }

    #[test]
    fn test_destination_same_as_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let overrides = Overrides {
            source: Some(temp_dir.path().to_path_buf()),
            destination: Some(temp_dir.path().join(".")),
            ..Overrides::default()
        };
        let result = ConfigFile::default().resolve(overrides);
        assert!(matches!(result, Err(ConfigError::DestinationIsSource(_))));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = ConfigFile::load(Some(&temp_dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("sweep.toml");
        fs::write(&path, "source = \"in\"\ndestination = \"out\"\n")
            .expect("Failed to write config");

        let file = ConfigFile::load(Some(&path)).expect("Failed to load config");
        assert_eq!(file.source, Some(PathBuf::from("in")));
        assert_eq!(file.destination, Some(PathBuf::from("out")));
    }
}
