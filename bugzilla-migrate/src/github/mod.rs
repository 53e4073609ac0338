//! Synchronization with the GitHub issue import API.
//!
//! [`IssueTracker`] is the thin HTTP surface the migration needs;
//! [`SyncClient`] layers the dry-run gate, label and assignee checks, import
//! polling and the ledger on top of it.

mod client;
mod error;
mod import;
mod status;
mod sync;

pub use client::GitHubClient;
pub use error::SyncError;
pub use import::{ImportRequest, ImportState, ImportStatus, IMPORT_MEDIA_TYPE};
pub use status::{ImportOutcome, LabelStatus};
pub use sync::{LabelReport, SyncClient, LABEL_COLOR};

use crate::rate_limit::RateLimitInfo;
use async_trait::async_trait;

/// Remote operations against the target repository.
///
/// Every call is a single request without retries.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Whether the label exists in the repository.
    async fn label_exists(&self, name: &str) -> Result<bool, SyncError>;

    /// Whether the GitHub user exists.
    async fn user_exists(&self, login: &str) -> Result<bool, SyncError>;

    /// Whether an issue with this number exists in the repository.
    async fn issue_exists(&self, number: u64) -> Result<bool, SyncError>;

    /// Creates a label.
    async fn create_label(&self, name: &str, color: &str) -> Result<(), SyncError>;

    /// Submits an issue with its comments to the import endpoint.
    async fn start_import(
        &self,
        bug_id: u64,
        request: &ImportRequest<'_>,
    ) -> Result<ImportStatus, SyncError>;

    /// Fetches an import job status with the response body it was parsed
    /// from; `None` if the status request failed.
    async fn import_status(&self, url: &str) -> Result<Option<(ImportStatus, String)>, SyncError>;

    /// Current core API rate limit.
    async fn core_rate_limit(&self) -> Result<RateLimitInfo, SyncError>;
}
