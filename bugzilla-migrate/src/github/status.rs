//! Import outcome types.

use serde::Serialize;

/// Result of submitting one converted bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// The issue was created on GitHub and recorded in the ledger.
    Imported {
        /// Bugzilla bug ID.
        bug_id: u64,
        /// GitHub issue number.
        number: u64,
    },

    /// The import was not submitted.
    Skipped {
        /// Bugzilla bug ID.
        bug_id: u64,
        /// Reason for skipping.
        reason: String,
    },
}

/// What happened to a label during the label check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    /// Already present on GitHub.
    Exists,

    /// Created by this run.
    Created,

    /// Missing and not created (dry run).
    Missing,
}
