//! GitHub REST API client.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

use crate::release::{Release, ReleaseSource};
use crate::{Error, Result};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout used when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Identifies tooli to GitHub.
pub const USER_AGENT: &str = concat!("tooli/", env!("CARGO_PKG_VERSION"));

const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_BINARY: &str = "application/octet-stream";

/// Release source backed by the GitHub REST API.
///
/// Every request carries its own timeout; there is no budget across
/// requests.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client with the given per-request timeout.
    ///
    /// The token is taken from `GITHUB_TOKEN` (or `GH_TOKEN`) when set.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed, which only happens
    /// when the TLS backend cannot initialise.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| Error::Network {
                url: DEFAULT_API_URL.to_string(),
                timed_out: false,
                source,
            })?;

        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            token: token_from_env(),
        })
    }

    /// Point the client at another API root (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the token picked up from the environment.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Whether requests are authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn get(&self, url: &str, accept: &'static str) -> Result<Response> {
        debug!(%url, accept, authenticated = self.is_authenticated(), "GitHub request");

        let mut request = self.client.get(url).header(ACCEPT, accept);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|source| network_error(url, source))?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                code: response.status().as_u16(),
                url: url.to_string(),
                authenticated: self.is_authenticated(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ReleaseSource for GitHubClient {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release> {
        let url = format!("{}/repos/{owner}/{repo}/releases/latest", self.api_url);
        let body = self
            .get(&url, ACCEPT_JSON)
            .await?
            .bytes()
            .await
            .map_err(|source| network_error(&url, source))?;

        let release: Release = serde_json::from_slice(&body).map_err(|e| Error::InvalidResponse {
            url: url.clone(),
            message: e.to_string(),
        })?;

        debug!(
            %owner,
            %repo,
            tag = %release.tag_name,
            assets = release.assets.len(),
            "Fetched latest release"
        );
        Ok(release)
    }

    async fn asset_bytes(&self, owner: &str, repo: &str, asset_id: u64) -> Result<Vec<u8>> {
        let url = format!(
            "{}/repos/{owner}/{repo}/releases/assets/{asset_id}",
            self.api_url
        );
        let bytes = self
            .get(&url, ACCEPT_BINARY)
            .await?
            .bytes()
            .await
            .map_err(|source| network_error(&url, source))?;

        debug!(%owner, %repo, asset_id, size = bytes.len(), "Downloaded asset");
        Ok(bytes.to_vec())
    }
}

fn network_error(url: &str, source: reqwest::Error) -> Error {
    Error::Network {
        url: url.to_string(),
        timed_out: source.is_timeout(),
        source,
    }
}

/// Read the GitHub token from the environment.
///
/// `GITHUB_TOKEN` wins over `GH_TOKEN`; empty values are ignored.
#[must_use]
pub fn token_from_env() -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_tool_and_version() {
        assert!(USER_AGENT.starts_with("tooli/"));
        assert!(USER_AGENT.len() > "tooli/".len());
    }

    #[test]
    fn test_with_api_url_strips_trailing_slash() {
        let client = GitHubClient::new(DEFAULT_TIMEOUT)
            .unwrap()
            .with_api_url("http://127.0.0.1:9999/");
        assert_eq!(client.api_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        let client = GitHubClient::new(DEFAULT_TIMEOUT)
            .unwrap()
            .with_token(Some(String::new()));
        assert!(!client.is_authenticated());

        let client = client.with_token(Some("ghp_test".into()));
        assert!(client.is_authenticated());
    }
}
