use std::time::Duration;

use allpi_core::{RepoRef, TreeListing};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::error::FetchError;
use crate::source::TreeSource;
use crate::wire::TreeResponse;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = "allpi-gallery";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Typed HTTP client for the GitHub Git Trees API.
///
/// Each call is a single request: no retries and no pagination. Failures are
/// returned as [`FetchError`]; deciding what an error means for the gallery is
/// left to the caller.
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl GithubClient {
    /// Create a new client with the given API base URL and timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared with the
    /// layout classifier).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn set_auth(&mut self, token: String) {
        self.auth_token = Some(token);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tree_url(&self, repo: &RepoRef) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.base_url,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.repo),
            urlencoding::encode(&repo.branch),
        )
    }

    /// Fetch the full recursive listing of `repo`'s branch.
    pub async fn fetch_tree(&self, repo: &RepoRef) -> Result<TreeListing, FetchError> {
        let mut req = self
            .client
            .get(self.tree_url(repo))
            .header(ACCEPT, ACCEPT_GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        if let Some(token) = self.auth_token.as_deref() {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let tree: TreeResponse = parse_response(resp).await?;
        let listing = tree.into_listing();

        if listing.truncated {
            tracing::warn!(
                repo = %repo,
                entries = listing.entries.len(),
                "tree listing for {repo} is truncated; gallery may be incomplete"
            );
        }
        tracing::debug!(repo = %repo, entries = listing.entries.len(), "fetched tree");
        Ok(listing)
    }
}

#[async_trait]
impl TreeSource for GithubClient {
    async fn fetch_tree(&self, repo: &RepoRef) -> Result<TreeListing, FetchError> {
        GithubClient::fetch_tree(self, repo).await
    }
}

/// Parse an HTTP response: return the deserialized body on 2xx,
/// or an error containing the status and (trimmed) body text.
async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, FetchError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
