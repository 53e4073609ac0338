#![allow(dead_code)]

use async_trait::async_trait;
use bugzilla_migrate::{
    Backoff, ImportRequest, ImportState, ImportStatus, IssueTracker, RateLimitInfo, RunnerConfig,
    Sleeper, SyncError,
};
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub const OWNER: &str = "dlang";
pub const REPO: &str = "dmd";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn config(xml: &Path, ledger: &Path, force: bool) -> RunnerConfig {
    RunnerConfig::new(
        xml.to_path_buf(),
        OWNER.to_string(),
        REPO.to_string(),
        "token".to_string(),
        force,
    )
    .with_ledger_path(ledger.to_path_buf())
    .with_backoff(Backoff {
        initial: Duration::from_secs(1),
        multiplier: 2,
        max_attempts: 4,
    })
}

/// Records requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    pub delays: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// In-memory GitHub repository speaking the import protocol.
#[derive(Debug)]
pub struct FakeTracker {
    /// Labels present in the repository.
    pub labels: Mutex<BTreeSet<String>>,
    /// Users that exist.
    pub users: BTreeSet<String>,
    /// Import request bodies in submission order.
    pub imports: Mutex<Vec<serde_json::Value>>,
    /// Status polls answered with `pending` before a job settles.
    pub pending_polls: u32,
    /// Bug whose import job does not end in `imported`.
    pub failing_bug: Option<u64>,
    /// State reported for the failing bug.
    pub failure_state: &'static str,
    /// Core rate limit reported before each import.
    pub rate_limit: RateLimitInfo,
    /// Import jobs keyed by status URL.
    pub jobs: Mutex<HashMap<String, Job>>,
    /// Number given to the next imported issue.
    pub next_issue: Mutex<u64>,
}

#[derive(Debug)]
pub struct Job {
    pub bug_id: u64,
    pub polls: u32,
}

impl Default for FakeTracker {
    fn default() -> Self {
        Self {
            labels: Mutex::new(BTreeSet::new()),
            users: BTreeSet::from(["andralex".to_string(), "wilzbach".to_string()]),
            imports: Mutex::new(Vec::new()),
            pending_polls: 1,
            failing_bug: None,
            failure_state: "failed",
            rate_limit: RateLimitInfo {
                remaining: 5000,
                reset: 0,
                limit: 5000,
            },
            jobs: Mutex::new(HashMap::new()),
            next_issue: Mutex::new(500),
        }
    }
}

impl FakeTracker {
    pub fn with_labels<const N: usize>(labels: [&str; N]) -> Self {
        let tracker = Self::default();
        tracker
            .labels
            .lock()
            .unwrap()
            .extend(labels.iter().map(|label| label.to_string()));
        tracker
    }

    pub fn imported_titles(&self) -> Vec<String> {
        self.imports
            .lock()
            .unwrap()
            .iter()
            .map(|body| body["issue"]["title"].as_str().unwrap().to_string())
            .collect()
    }

    fn pending(url: &str) -> ImportStatus {
        ImportStatus {
            id: None,
            status: ImportState::Pending,
            url: Some(url.to_string()),
            issue_url: None,
            errors: None,
        }
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn label_exists(&self, name: &str) -> Result<bool, SyncError> {
        Ok(self.labels.lock().unwrap().contains(name))
    }

    async fn user_exists(&self, login: &str) -> Result<bool, SyncError> {
        Ok(self.users.contains(login))
    }

    async fn issue_exists(&self, number: u64) -> Result<bool, SyncError> {
        Ok(number >= 500 && number < *self.next_issue.lock().unwrap())
    }

    async fn create_label(&self, name: &str, _color: &str) -> Result<(), SyncError> {
        self.labels.lock().unwrap().insert(name.to_string());
        Ok(())
    }

    async fn start_import(
        &self,
        bug_id: u64,
        request: &ImportRequest<'_>,
    ) -> Result<ImportStatus, SyncError> {
        let mut imports = self.imports.lock().unwrap();
        imports.push(serde_json::to_value(request).unwrap());

        let url = format!(
            "https://api.github.com/repos/{OWNER}/{REPO}/import/issues/{}",
            imports.len()
        );
        self.jobs
            .lock()
            .unwrap()
            .insert(url.clone(), Job { bug_id, polls: 0 });
        Ok(Self::pending(&url))
    }

    async fn import_status(
        &self,
        url: &str,
    ) -> Result<Option<(ImportStatus, String)>, SyncError> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(url) else {
            return Ok(None);
        };

        job.polls += 1;
        let body = if job.polls <= self.pending_polls {
            json!({ "status": "pending", "url": url })
        } else if self.failing_bug == Some(job.bug_id) {
            json!({
                "status": self.failure_state,
                "url": url,
                "message": "Validation Failed",
                "errors": [{ "code": "invalid", "field": "created_at" }],
            })
        } else {
            let mut next_issue = self.next_issue.lock().unwrap();
            let number = *next_issue;
            *next_issue += 1;
            json!({
                "status": "imported",
                "url": url,
                "issue_url": format!("https://api.github.com/repos/{OWNER}/{REPO}/issues/{number}"),
            })
        };

        let text = body.to_string();
        Ok(Some((serde_json::from_str(&text).unwrap(), text)))
    }

    async fn core_rate_limit(&self) -> Result<RateLimitInfo, SyncError> {
        Ok(self.rate_limit.clone())
    }
}
