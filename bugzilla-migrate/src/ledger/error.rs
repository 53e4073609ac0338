//! Ledger error types.

use thiserror::Error;

/// Errors that can occur while reading or appending to the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Failed to read or write the ledger file.
    #[error("Failed to access ledger '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A ledger line did not start with a bug ID.
    #[error("Malformed ledger line {line} in '{path}': '{content}'")]
    Malformed {
        path: String,
        line: usize,
        content: String,
    },
}
