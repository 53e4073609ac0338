//! [`IssueTracker`] implementation on top of octocrab.

use super::import::{ImportRequest, ImportStatus, IMPORT_MEDIA_TYPE};
use super::{IssueTracker, SyncError};
use crate::rate_limit::RateLimitInfo;
use async_trait::async_trait;
use http::{Method, StatusCode};
use octocrab::Octocrab;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

/// GitHub REST client scoped to one target repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    api_url: Url,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Builds an authenticated client for `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::GitHubError`] if the HTTP client cannot be built.
    pub fn new(api_url: &Url, token: &str, owner: &str, repo: &str) -> Result<Self, SyncError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url.as_str())?
            .build()?;
        Ok(Self {
            octocrab,
            api_url: api_url.clone(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Absolute URL for an API path, percent-encoding every segment.
    fn api_path(&self, segments: &[&str]) -> Result<Url, SyncError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| SyncError::InvalidRequest {
                url: self.api_url.to_string(),
                message: "API URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Absolute URL for `/repos/{owner}/{repo}/{segments...}`.
    fn repo_path(&self, segments: &[&str]) -> Result<Url, SyncError> {
        let mut all = vec!["repos", self.owner.as_str(), self.repo.as_str()];
        all.extend_from_slice(segments);
        self.api_path(&all)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &Url,
        accept: Option<&str>,
        body: Option<&B>,
    ) -> Result<(StatusCode, String), SyncError> {
        debug!(%method, url = %url, "GitHub request");

        let mut builder = http::Request::builder().method(method).uri(url.as_str());
        if let Some(accept) = accept {
            builder = builder.header(http::header::ACCEPT, accept);
        }
        let request = self.octocrab.build_request(builder, body)?;
        let response = self.octocrab.execute(request).await?;

        let status = response.status();
        let text = self.octocrab.body_to_string(response).await?;
        Ok((status, text))
    }

    async fn exists(&self, url: &Url) -> Result<bool, SyncError> {
        let (status, _) = self.send::<()>(Method::GET, url, None, None).await?;
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            warn!(url = %url, status = status.as_u16(), "Unexpected status for existence check");
        }
        Ok(status.is_success())
    }

    fn parse_status(url: &Url, text: &str) -> Result<ImportStatus, SyncError> {
        serde_json::from_str(text).map_err(|e| SyncError::UnexpectedResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[derive(Serialize)]
struct NewLabel<'a> {
    name: &'a str,
    color: &'a str,
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn label_exists(&self, name: &str) -> Result<bool, SyncError> {
        self.exists(&self.repo_path(&["labels", name])?).await
    }

    async fn user_exists(&self, login: &str) -> Result<bool, SyncError> {
        self.exists(&self.api_path(&["users", login])?).await
    }

    async fn issue_exists(&self, number: u64) -> Result<bool, SyncError> {
        let number = number.to_string();
        self.exists(&self.repo_path(&["issues", &number])?).await
    }

    async fn create_label(&self, name: &str, color: &str) -> Result<(), SyncError> {
        let url = self.repo_path(&["labels"])?;
        let body = NewLabel { name, color };
        let (status, _) = self.send(Method::POST, &url, None, Some(&body)).await?;
        if !status.is_success() {
            return Err(SyncError::LabelCreateFailed {
                label: name.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn start_import(
        &self,
        bug_id: u64,
        request: &ImportRequest<'_>,
    ) -> Result<ImportStatus, SyncError> {
        let url = self.repo_path(&["import", "issues"])?;
        let (status, text) = self
            .send(Method::POST, &url, Some(IMPORT_MEDIA_TYPE), Some(request))
            .await?;
        if !status.is_success() {
            return Err(SyncError::ImportRejected {
                bug_id,
                status: status.as_u16(),
                body: text,
            });
        }
        Self::parse_status(&url, &text)
    }

    async fn import_status(
        &self,
        url: &str,
    ) -> Result<Option<(ImportStatus, String)>, SyncError> {
        let url = Url::parse(url).map_err(|e| SyncError::InvalidRequest {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let (status, text) = self
            .send::<()>(Method::GET, &url, Some(IMPORT_MEDIA_TYPE), None)
            .await?;
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Import status request failed");
            return Ok(None);
        }
        let parsed = Self::parse_status(&url, &text)?;
        Ok(Some((parsed, text)))
    }

    async fn core_rate_limit(&self) -> Result<RateLimitInfo, SyncError> {
        let rate_limit = self.octocrab.ratelimit().get().await?;
        let core = &rate_limit.resources.core;

        Ok(RateLimitInfo {
            remaining: core.remaining as u32,
            reset: core.reset,
            limit: core.limit as u32,
        })
    }
}
