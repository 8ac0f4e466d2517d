//! Authenticated HTTP client for the GitHub contents API.
//!
//! The client is created once and reused for every listing and content
//! fetch of a walk, taking advantage of connection pooling. Rate-limit
//! detection applies to both listings and raw content fetches: the API
//! draws both from the same quota.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::parser::RepoLocation;

use super::error::FetchError;
use super::node::{RawEntry, RemoteNode};

/// Production base URL of the GitHub REST API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Response header carrying the remaining request quota.
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 60;

/// Rate-limit aware client for listing directories and fetching file
/// contents.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_base: String,
    token: String,
}

impl GithubClient {
    /// Creates a client authenticated with `token` against the production
    /// API base.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Creates a client against a custom API base URL (used by tests).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(concat!("gitgrab/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Builds the contents-API listing URL for a repository subtree.
    #[must_use]
    pub fn contents_url(&self, location: &RepoLocation) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base, location.owner, location.repo, location.subtree_path, location.branch
        )
    }

    /// Lists the immediate children of a remote directory, in API order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RateLimited`] on quota exhaustion,
    /// [`FetchError::HttpStatus`] on any other non-success response,
    /// [`FetchError::Decode`] when the body is not a listing array, and
    /// the per-entry classification errors from [`RemoteNode`].
    #[instrument(skip(self), fields(url = %url))]
    pub async fn list_dir(&self, url: &str) -> Result<Vec<RemoteNode>, FetchError> {
        let response = self.get(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(url, e))?;
        let entries: Vec<RawEntry> =
            serde_json::from_str(&body).map_err(|e| FetchError::decode(url, e))?;
        debug!(entries = entries.len(), "directory listed");
        entries.into_iter().map(RemoteNode::from_entry).collect()
    }

    /// Fetches the raw bytes of one file.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RateLimited`] on quota exhaustion and
    /// [`FetchError::HttpStatus`] / [`FetchError::Network`] otherwise.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_file(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(url, e))?;
        Ok(bytes.to_vec())
    }

    /// Issues an authenticated GET and classifies the response status.
    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN && quota_exhausted(response.headers()) {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::http_status(url, status.as_u16(), body));
        }
        Ok(response)
    }
}

/// Returns true when the rate-limit-remaining header is present and zero.
fn quota_exhausted(headers: &reqwest::header::HeaderMap) -> bool {
    headers
        .get(RATE_LIMIT_REMAINING_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim() == "0")
}
