//! Issue import API payloads.

use crate::convert::{Comment, TargetIssue};
use serde::{Deserialize, Serialize};
use url::Url;

/// Media type the issue import endpoint requires.
pub const IMPORT_MEDIA_TYPE: &str = "application/vnd.github.golden-comet-preview+json";

/// Body of `POST /repos/{owner}/{repo}/import/issues`.
#[derive(Debug, Serialize)]
pub struct ImportRequest<'a> {
    /// The issue itself.
    pub issue: &'a TargetIssue,

    /// Its comments, oldest first.
    pub comments: &'a [Comment],
}

impl<'a> ImportRequest<'a> {
    /// Builds the request for a converted issue.
    #[must_use]
    pub fn new(issue: &'a TargetIssue) -> Self {
        Self {
            issue,
            comments: &issue.comments,
        }
    }
}

/// State of an asynchronous import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportState {
    /// Still being processed.
    Pending,

    /// The issue was created.
    Imported,

    /// The import was rejected.
    Failed,

    /// Any state this client does not know.
    #[serde(other)]
    Unknown,
}

/// Import job status returned by the import endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportStatus {
    /// Job ID.
    #[serde(default)]
    pub id: Option<u64>,

    /// Current state.
    pub status: ImportState,

    /// URL to poll for updates.
    #[serde(default)]
    pub url: Option<String>,

    /// API URL of the created issue once imported.
    #[serde(default)]
    pub issue_url: Option<String>,

    /// Validation errors reported for failed imports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl ImportStatus {
    /// Returns true while the job has not reached a terminal state.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ImportState::Pending
    }

    /// Issue number from `…/repos/{owner}/{repo}/issues/{number}`.
    #[must_use]
    pub fn issue_number(&self, owner: &str, repo: &str) -> Option<u64> {
        let url = Url::parse(self.issue_url.as_deref()?).ok()?;
        let segments: Vec<&str> = url.path_segments()?.collect();
        match segments.as_slice() {
            [.., "repos", o, r, "issues", number]
                if o.eq_ignore_ascii_case(owner) && r.eq_ignore_ascii_case(repo) =>
            {
                number.parse().ok()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(issue_url: Option<&str>) -> ImportStatus {
        ImportStatus {
            id: Some(3),
            status: ImportState::Imported,
            url: None,
            issue_url: issue_url.map(str::to_string),
            errors: None,
        }
    }

    #[test]
    fn parses_job_status() {
        let status: ImportStatus = serde_json::from_value(json!({
            "id": 3,
            "status": "pending",
            "url": "https://api.github.com/repos/dlang/dmd/import/issues/3",
            "import_issues_url": "https://api.github.com/repos/dlang/dmd/import/issues",
            "repository_url": "https://api.github.com/repos/dlang/dmd"
        }))
        .unwrap();

        assert!(status.is_pending());
        assert_eq!(
            status.url.as_deref(),
            Some("https://api.github.com/repos/dlang/dmd/import/issues/3")
        );
    }

    #[test]
    fn unknown_states_are_terminal() {
        let status: ImportStatus =
            serde_json::from_value(json!({ "status": "exploded" })).unwrap();
        assert_eq!(status.status, ImportState::Unknown);
        assert!(!status.is_pending());
    }

    #[test]
    fn extracts_issue_number() {
        let imported = status(Some("https://api.github.com/repos/dlang/dmd/issues/501"));
        assert_eq!(imported.issue_number("dlang", "dmd"), Some(501));
        assert_eq!(imported.issue_number("dlang", "phobos"), None);
    }

    #[test]
    fn rejects_unexpected_issue_urls() {
        assert_eq!(status(None).issue_number("dlang", "dmd"), None);
        assert_eq!(
            status(Some("https://api.github.com/repos/dlang/dmd/pulls/501")).issue_number("dlang", "dmd"),
            None
        );
        assert_eq!(
            status(Some("not a url")).issue_number("dlang", "dmd"),
            None
        );
    }
}
