//! Runner error types.

use crate::convert::ConvertError;
use crate::github::SyncError;
use crate::ledger::LedgerError;
use crate::mapping::ConfigError;
use std::path::PathBuf;

/// Errors that can occur while running a migration.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Mappings file loading errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The export could not be converted.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The ledger could not be read.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Synchronization with GitHub failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// The XML export could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The GitHub API URL is not a valid URL.
    #[error("Invalid GitHub API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The export contains the same bug ID more than once.
    #[error("Bug IDs appear more than once in the export: {ids:?} (use --allow-duplicates to keep the last)")]
    DuplicateBugs { ids: Vec<u64> },
}
