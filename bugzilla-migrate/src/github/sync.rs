//! Idempotent, dry-run aware synchronization of converted issues.

use super::import::{ImportRequest, ImportState, ImportStatus};
use super::status::{ImportOutcome, LabelStatus};
use super::{IssueTracker, SyncError};
use crate::backoff::{poll_until, Backoff, PollError, Sleeper};
use crate::convert::TargetIssue;
use crate::index::IssueIndex;
use crate::ledger::Ledger;
use crate::rate_limit::wait_if_needed;
use crate::runner::RunnerConfig;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Colour given to labels created by the migration.
pub const LABEL_COLOR: &str = "000000";

/// Outcome of checking every label used by the pending issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelReport {
    /// Labels already present.
    pub existing: Vec<String>,

    /// Labels created by this run.
    pub created: Vec<String>,

    /// Labels missing and left alone (dry run).
    pub missing: Vec<String>,
}

/// Pushes converted issues to GitHub and records every confirmed import.
///
/// Unless forced, writes are skipped and reported as successful so a dry run
/// walks through the same steps as a real one.
pub struct SyncClient<T> {
    tracker: T,
    ledger: Ledger,
    sleeper: Arc<dyn Sleeper>,
    owner: String,
    repo: String,
    force: bool,
    backoff: Backoff,
    skip_notice_shown: bool,
}

impl<T: IssueTracker> SyncClient<T> {
    /// Creates a client writing to the repository named in `config`.
    pub fn new(tracker: T, ledger: Ledger, sleeper: Arc<dyn Sleeper>, config: &RunnerConfig) -> Self {
        Self {
            tracker,
            ledger,
            sleeper,
            owner: config.owner().to_string(),
            repo: config.repo().to_string(),
            force: config.force(),
            backoff: config.backoff(),
            skip_notice_shown: false,
        }
    }

    /// The ledger of confirmed imports.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The underlying tracker.
    #[must_use]
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Returns true when writes are skipped.
    #[must_use]
    pub fn dry_run(&self) -> bool {
        !self.force
    }

    /// Whether a write may go out; logs the dry-run notice once.
    fn writes_allowed(&mut self) -> bool {
        if self.force {
            return true;
        }
        if !self.skip_notice_shown {
            warn!("Skipping writes to GitHub (use -f to force updates)");
            self.skip_notice_shown = true;
        }
        false
    }

    /// Whether an issue with this number already exists on GitHub.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the request cannot be sent.
    pub async fn issue_exists(&self, number: u64) -> Result<bool, SyncError> {
        self.tracker.issue_exists(number).await
    }

    /// Makes sure a label exists, creating it when forced.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if a request fails or the label cannot be created.
    pub async fn ensure_label(&mut self, label: &str) -> Result<LabelStatus, SyncError> {
        if self.tracker.label_exists(label).await? {
            info!(label, "Label exists on GitHub");
            return Ok(LabelStatus::Exists);
        }

        if !self.writes_allowed() {
            warn!(label, "Label does not exist on GitHub");
            return Ok(LabelStatus::Missing);
        }

        info!(label, "Creating label on GitHub");
        self.tracker.create_label(label, LABEL_COLOR).await?;
        Ok(LabelStatus::Created)
    }

    /// Checks every distinct label used by the pending issues.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if a label check or creation fails.
    pub async fn check_labels(&mut self, index: &IssueIndex) -> Result<LabelReport, SyncError> {
        let labels: BTreeSet<String> = index
            .iter()
            .flat_map(|issue| issue.labels.iter().cloned())
            .collect();

        let mut report = LabelReport::default();
        for label in labels {
            match self.ensure_label(&label).await? {
                LabelStatus::Exists => report.existing.push(label),
                LabelStatus::Created => report.created.push(label),
                LabelStatus::Missing => report.missing.push(label),
            }
        }
        Ok(report)
    }

    /// Verifies that every assignee exists on GitHub.
    ///
    /// Returns the number of distinct assignees checked.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownAssignee`] for the first missing user.
    pub async fn check_assignees(&self, index: &IssueIndex) -> Result<usize, SyncError> {
        let assignees: BTreeSet<&str> = index
            .iter()
            .filter_map(|issue| issue.assignee.as_deref())
            .collect();

        for login in &assignees {
            if !self.tracker.user_exists(login).await? {
                return Err(SyncError::UnknownAssignee {
                    login: (*login).to_string(),
                });
            }
            info!(assignee = login, "Assignee exists");
        }
        Ok(assignees.len())
    }

    /// Imports one issue and records it in the ledger.
    ///
    /// Issues already in the ledger are never submitted again.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the import is rejected, fails, does not finish
    /// in time, or its issue number cannot be determined.
    pub async fn import_issue(&mut self, issue: &TargetIssue) -> Result<ImportOutcome, SyncError> {
        let bug_id = issue.number;
        let span = info_span!("import_issue", bug_id);

        async {
            if let Some(number) = self.ledger.issue_for(bug_id) {
                debug!(issue_number = number, "Already imported");
                return Ok(ImportOutcome::Skipped {
                    bug_id,
                    reason: "already imported".to_string(),
                });
            }

            if !self.writes_allowed() {
                info!(title = %issue.title, "Would import bug");
                return Ok(ImportOutcome::Skipped {
                    bug_id,
                    reason: "dry run".to_string(),
                });
            }

            let limit = self.tracker.core_rate_limit().await?;
            wait_if_needed(&limit, self.sleeper.as_ref()).await;

            info!("Importing bug on GitHub");
            let request = ImportRequest::new(issue);
            let started = self.tracker.start_import(bug_id, &request).await?;
            let (status, body) = self.wait_for_import(bug_id, &started).await?;

            if status.status != ImportState::Imported {
                return Err(SyncError::ImportFailed { bug_id, body });
            }

            let number = status.issue_number(&self.owner, &self.repo).ok_or_else(|| {
                SyncError::UnparsableIssueUrl {
                    bug_id,
                    issue_url: status.issue_url.clone().unwrap_or_default(),
                }
            })?;

            self.ledger.append(bug_id, number)?;
            info!(issue_number = number, "Bug imported");
            Ok(ImportOutcome::Imported { bug_id, number })
        }
        .instrument(span)
        .await
    }

    /// Polls the import job until it leaves the pending state.
    ///
    /// Returns the final status together with the body it was read from.
    async fn wait_for_import(
        &self,
        bug_id: u64,
        started: &ImportStatus,
    ) -> Result<(ImportStatus, String), SyncError> {
        let url = started
            .url
            .as_deref()
            .ok_or_else(|| SyncError::UnexpectedResponse {
                url: format!("/repos/{}/{}/import/issues", self.owner, self.repo),
                message: "import status has no url".to_string(),
            })?;

        let tracker = &self.tracker;
        let polled = poll_until(
            self.backoff,
            self.sleeper.as_ref(),
            move || tracker.import_status(url),
            |polled: &Option<(ImportStatus, String)>| {
                polled.as_ref().is_some_and(|(status, _)| !status.is_pending())
            },
        )
        .await
        .map_err(|e| match e {
            PollError::Fetch(e) => e,
            PollError::Exhausted { attempts } => SyncError::ImportTimedOut { bug_id, attempts },
        })?;

        polled.ok_or(SyncError::ImportTimedOut {
            bug_id,
            attempts: self.backoff.max_attempts,
        })
    }

    /// Imports every pending issue in ascending bug ID order.
    ///
    /// Stops at the first failure; everything imported before it is already
    /// in the ledger.
    ///
    /// # Errors
    ///
    /// Returns the first [`SyncError`] encountered.
    pub async fn import_all(&mut self, index: &IssueIndex) -> Result<Vec<ImportOutcome>, SyncError> {
        let mut outcomes = Vec::with_capacity(index.len());
        for issue in index.iter() {
            outcomes.push(self.import_issue(issue).await?);
        }
        Ok(outcomes)
    }
}
