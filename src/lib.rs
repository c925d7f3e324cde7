//! mediasweep - keyword pruning and media collection for directory trees
//!
//! This library loads a keyword list, deletes every file and directory whose
//! name contains one of the keywords, moves the remaining media files into a
//! single destination directory and then empties the source tree. Every
//! action is recorded as an outcome so callers can see exactly what happened.

pub mod cli;
pub mod config;
pub mod extensions;
pub mod keywords;
pub mod output;
pub mod pruner;
pub mod relocator;
pub mod report;
pub mod sweep;
mod tree;

pub use config::{ConfigError, ConfigFile, Overrides, SweepConfig};
pub use extensions::ExtensionAllowList;
pub use keywords::{KeywordError, KeywordSet};
pub use pruner::KeywordPruner;
pub use relocator::{RelocationReport, Relocator};
pub use report::{EntryFailure, EntryKind, Outcome, Phase, PhaseReport, SweepError};
pub use sweep::{PruneStatus, RelocationStatus, SweepOptions, SweepReport, run_sweep};

pub use cli::{Cli, run_cli};
