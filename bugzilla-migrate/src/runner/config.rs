//! Runner configuration.

use crate::backoff::Backoff;
use crate::ledger::DEFAULT_LEDGER_FILE;
use std::path::{Path, PathBuf};

/// GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Bugzilla instance the default mappings were written for.
pub const DEFAULT_TRACKER_URL: &str = "https://issues.dlang.org";

/// Configuration for migrating one Bugzilla export.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the Bugzilla XML export.
    xml_path: PathBuf,
    /// Owner of the target repository.
    owner: String,
    /// Name of the target repository.
    repo: String,
    /// GitHub token used for API calls.
    token: String,
    /// Whether writes to GitHub are performed.
    force: bool,
    /// GitHub REST API root.
    api_url: String,
    /// Bugzilla instance the export came from.
    tracker_url: String,
    /// Directory serving `attachment.cgi`; `{tracker_url}/bugfiles` when unset.
    attachment_url: Option<String>,
    /// File recording completed imports.
    ledger_path: PathBuf,
    /// Optional TOML file extending the lookup tables.
    mappings_path: Option<PathBuf>,
    /// Whether repeated bug IDs are tolerated.
    allow_duplicates: bool,
    /// Import status polling schedule.
    backoff: Backoff,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(
        xml_path: PathBuf,
        owner: String,
        repo: String,
        token: String,
        force: bool,
    ) -> Self {
        Self {
            xml_path,
            owner,
            repo,
            token,
            force,
            api_url: DEFAULT_API_URL.to_string(),
            tracker_url: DEFAULT_TRACKER_URL.to_string(),
            attachment_url: None,
            ledger_path: PathBuf::from(DEFAULT_LEDGER_FILE),
            mappings_path: None,
            allow_duplicates: false,
            backoff: Backoff::default(),
        }
    }

    /// Sets the GitHub REST API root.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the Bugzilla instance URL used in links.
    pub fn with_tracker_url(mut self, tracker_url: impl Into<String>) -> Self {
        self.tracker_url = tracker_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the URL attachments are linked below.
    pub fn with_attachment_url(mut self, attachment_url: Option<String>) -> Self {
        self.attachment_url = attachment_url;
        self
    }

    /// Sets the ledger file path.
    pub fn with_ledger_path(mut self, ledger_path: PathBuf) -> Self {
        self.ledger_path = ledger_path;
        self
    }

    /// Sets a mappings file extending the built-in tables.
    pub fn with_mappings_path(mut self, mappings_path: Option<PathBuf>) -> Self {
        self.mappings_path = mappings_path;
        self
    }

    /// Tolerates repeated bug IDs (the last one wins).
    pub fn with_allow_duplicates(mut self, allow_duplicates: bool) -> Self {
        self.allow_duplicates = allow_duplicates;
        self
    }

    /// Sets the import status polling schedule.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the XML export path.
    pub fn xml_path(&self) -> &Path {
        &self.xml_path
    }

    /// Returns the target repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the target repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns whether writes are performed.
    pub fn force(&self) -> bool {
        self.force
    }

    /// Returns the GitHub REST API root.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the Bugzilla instance URL.
    pub fn tracker_url(&self) -> &str {
        &self.tracker_url
    }

    /// Returns the URL attachments are linked below.
    pub fn attachment_url(&self) -> String {
        match &self.attachment_url {
            Some(url) => url.clone(),
            None => format!("{}/bugfiles", self.tracker_url),
        }
    }

    /// Returns the ledger file path.
    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// Returns the mappings file path, if any.
    pub fn mappings_path(&self) -> Option<&Path> {
        self.mappings_path.as_deref()
    }

    /// Returns whether repeated bug IDs are tolerated.
    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Returns the polling schedule.
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dlang_migration() {
        let config = RunnerConfig::new(
            PathBuf::from("bugzilla.xml"),
            "dlang".to_string(),
            "dmd".to_string(),
            "token".to_string(),
            false,
        );

        assert_eq!(config.api_url(), "https://api.github.com");
        assert_eq!(config.tracker_url(), "https://issues.dlang.org");
        assert_eq!(config.attachment_url(), "https://issues.dlang.org/bugfiles");
        assert_eq!(config.ledger_path(), Path::new("bugzilla2github.log"));
        assert!(config.mappings_path().is_none());
        assert!(!config.allow_duplicates());
        assert_eq!(config.backoff(), Backoff::default());
    }

    #[test]
    fn tracker_url_drops_trailing_slash() {
        let config = RunnerConfig::new(
            PathBuf::from("bugzilla.xml"),
            String::new(),
            String::new(),
            String::new(),
            true,
        )
        .with_tracker_url("https://bugs.example.org/");

        assert_eq!(config.tracker_url(), "https://bugs.example.org");
        assert_eq!(config.attachment_url(), "https://bugs.example.org/bugfiles");

        let config = config.with_attachment_url(Some("https://bugs.example.org".to_string()));
        assert_eq!(config.attachment_url(), "https://bugs.example.org");
    }
}
