//! Release metadata and the seam for fetching it.

use async_trait::async_trait;
use serde::Deserialize;

use crate::Result;

/// GitHub release metadata from the API.
///
/// Fetched fresh for every command; never cached across invocations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Version identifier, compared as an opaque string.
    pub tag_name: String,
    /// Downloadable files attached to the release.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// GitHub release asset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    /// Filename as published.
    pub name: String,
    /// Identifier used to build the download URL.
    pub id: u64,
    /// Content hash in `algorithm:hex` form; empty when GitHub has none.
    #[serde(default, deserialize_with = "nullable_string")]
    pub digest: String,
}

impl Asset {
    /// Create an asset without a digest.
    #[must_use]
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id,
            digest: String::new(),
        }
    }

    /// Set the published digest.
    #[must_use]
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = digest.into();
        self
    }
}

/// GitHub sends `"digest": null` for assets uploaded before digests existed.
fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Source of release metadata and asset content.
///
/// [`crate::GitHubClient`] talks to the REST API; tests substitute
/// in-memory implementations.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the latest release of `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns `HttpStatus` for non-success responses and `Network` for
    /// transport failures or timeouts.
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release>;

    /// Download the content of asset `asset_id` of `owner/repo`.
    ///
    /// # Errors
    ///
    /// Same as [`ReleaseSource::latest_release`].
    async fn asset_bytes(&self, owner: &str, repo: &str, asset_id: u64) -> Result<Vec<u8>>;
}
