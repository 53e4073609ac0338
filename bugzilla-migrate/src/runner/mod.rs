//! Orchestrates a Bugzilla to GitHub migration.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_API_URL, DEFAULT_TRACKER_URL};
pub use error::RunnerError;

use crate::backoff::{Sleeper, TokioSleeper};
use crate::convert::BugConverter;
use crate::github::{GitHubClient, IssueTracker, SyncClient};
use crate::index::convert_document;
use crate::ledger::Ledger;
use crate::mapping::{MappingConfig, Mappings};
use crate::summary::RunSummary;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use url::Url;

/// Runs one migration against an [`IssueTracker`].
pub struct Runner<T> {
    config: RunnerConfig,
    tracker: T,
    sleeper: Arc<dyn Sleeper>,
}

impl Runner<GitHubClient> {
    /// Builds a runner talking to the GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the API URL is invalid or the client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let api_url = Url::parse(config.api_url()).map_err(|source| RunnerError::InvalidUrl {
            url: config.api_url().to_string(),
            source,
        })?;
        let client = GitHubClient::new(&api_url, config.token(), config.owner(), config.repo())?;
        Ok(Self::with_tracker(config, client, Arc::new(TokioSleeper)))
    }
}

impl<T: IssueTracker> Runner<T> {
    /// Builds a runner on top of any tracker and sleeper.
    pub fn with_tracker(config: RunnerConfig, tracker: T, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            config,
            tracker,
            sleeper,
        }
    }

    /// Converts the export, skips what the ledger lists, checks labels and
    /// assignees, then imports every pending issue.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on the first fatal error.
    pub async fn run(self) -> Result<RunSummary, RunnerError> {
        let config = self.config;
        let mut summary = RunSummary::new(!config.force());

        info!(
            xml = %config.xml_path().display(),
            owner = config.owner(),
            repo = config.repo(),
            "Converting Bugzilla reports to GitHub issues"
        );

        let mappings = match config.mappings_path() {
            Some(path) => {
                info!(path = %path.display(), "Loading mappings");
                Mappings::from_config(MappingConfig::load(path)?)
            }
            None => Mappings::default(),
        };

        let xml = tokio::fs::read_to_string(config.xml_path())
            .await
            .map_err(|source| RunnerError::Io {
                path: config.xml_path().to_path_buf(),
                source,
            })?;

        let mut converter =
            BugConverter::new(mappings, config.tracker_url(), config.owner(), config.repo())
                .with_attachment_url(config.attachment_url());
        let mut index = convert_document(&xml, &mut converter)?;
        summary.record_conversion(converter.diagnostics(), converter.lookup_warnings());

        let duplicates = index.duplicates().to_vec();
        summary.duplicates = duplicates.len();
        if !duplicates.is_empty() {
            if !config.allow_duplicates() {
                return Err(RunnerError::DuplicateBugs { ids: duplicates });
            }
            warn!(count = duplicates.len(), "Keeping the last of each duplicated bug");
        }

        let ledger = Ledger::load(config.ledger_path())?;
        summary.skipped_imported = index.skip_imported(&ledger);

        let mut sync = SyncClient::new(self.tracker, ledger, self.sleeper, &config);

        let labels = sync
            .check_labels(&index)
            .instrument(info_span!("check_labels"))
            .await?;
        summary.record_labels(&labels);

        sync.check_assignees(&index)
            .instrument(info_span!("check_assignees"))
            .await?;

        info!(pending = index.len(), "Adding Bugzilla reports on GitHub");
        for outcome in sync.import_all(&index).await? {
            summary.record_outcome(&outcome);
        }

        Ok(summary)
    }
}
