//! Append-only log of imported bugs.
//!
//! Each line records `bugID, issueNumber` for one confirmed import. On the
//! next run every recorded bug is skipped, so re-running the whole migration
//! never submits the same bug twice.

mod error;

pub use error::LedgerError;

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Default ledger file name, relative to the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "bugzilla2github.log";

/// Imported `(bug ID, issue number)` pairs backed by a file.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    entries: BTreeMap<u64, String>,
}

impl Ledger {
    /// Reads the ledger at `path`; a missing file yields an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the file cannot be read or a line has no
    /// numeric bug ID.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No ledger found, not skipping any bug");
                return Ok(Self {
                    path,
                    entries: BTreeMap::new(),
                });
            }
            Err(e) => {
                return Err(LedgerError::IoError {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        let mut entries = BTreeMap::new();
        for (i, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.splitn(2, ',');
            let bug_id = fields
                .next()
                .and_then(|field| field.trim().parse::<u64>().ok())
                .ok_or_else(|| LedgerError::Malformed {
                    path: path.display().to_string(),
                    line: i + 1,
                    content: line.to_string(),
                })?;
            let issue = fields.next().map(str::trim).unwrap_or_default().to_string();
            entries.insert(bug_id, issue);
        }

        if !entries.is_empty() {
            warn!(
                path = %path.display(),
                count = entries.len(),
                "Skipping already imported bugs"
            );
        }
        Ok(Self { path, entries })
    }

    /// Returns true if the bug has already been imported.
    #[must_use]
    pub fn contains(&self, bug_id: u64) -> bool {
        self.entries.contains_key(&bug_id)
    }

    /// Issue number recorded for a bug.
    #[must_use]
    pub fn issue_for(&self, bug_id: u64) -> Option<&str> {
        self.entries.get(&bug_id).map(String::as_str)
    }

    /// Number of recorded imports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been imported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a confirmed import, appending one line to the file.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::IoError`] if the file cannot be written.
    pub fn append(&mut self, bug_id: u64, issue_number: u64) -> Result<(), LedgerError> {
        let io_error = |e| LedgerError::IoError {
            path: self.path.display().to_string(),
            source: e,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error)?;
        writeln!(file, "{bug_id}, {issue_number}").map_err(io_error)?;

        debug!(bug_id, issue_number, "Recorded import");
        self.entries.insert(bug_id, issue_number.to_string());
        Ok(())
    }
}
