//! Sync error types.

use crate::ledger::LedgerError;
use thiserror::Error;

/// Errors that stop the synchronization with GitHub.
#[derive(Debug, Error)]
pub enum SyncError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// A request could not be built.
    #[error("Invalid request to '{url}': {message}")]
    InvalidRequest { url: String, message: String },

    /// A response body did not have the expected shape.
    #[error("Unexpected response from '{url}': {message}")]
    UnexpectedResponse { url: String, message: String },

    /// The import endpoint rejected the issue.
    #[error("Error importing bug {bug_id} on GitHub (HTTP {status}): {body}")]
    ImportRejected {
        bug_id: u64,
        status: u16,
        body: String,
    },

    /// The import job finished in a state other than `imported`.
    #[error("Error importing bug {bug_id} on GitHub: {body}")]
    ImportFailed { bug_id: u64, body: String },

    /// The import job did not finish within the polling budget.
    #[error("Import of bug {bug_id} still pending after {attempts} polls")]
    ImportTimedOut { bug_id: u64, attempts: u32 },

    /// The imported issue number could not be read from the job status.
    #[error("Error while parsing issue number for bug {bug_id} from '{issue_url}'")]
    UnparsableIssueUrl { bug_id: u64, issue_url: String },

    /// An assignee does not exist on GitHub.
    #[error("Assignee '{login}' does not exist on GitHub")]
    UnknownAssignee { login: String },

    /// Creating a label failed.
    #[error("Error creating label '{label}' (HTTP {status})")]
    LabelCreateFailed { label: String, status: u16 },

    /// Recording the import failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
