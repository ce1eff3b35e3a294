//! Single-tool install pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tooli_core::tools::{Platform, ToolDescriptor};
use tracing::{debug, info, warn};

use crate::extract::{ArchiveExtractor, ArchiveKind, Extract};
use crate::release::ReleaseSource;
use crate::select::select_asset;
use crate::verify::verify;
use crate::{Error, Result};

/// Terminal result of installing one tool.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The installed version already is the latest release.
    UpToDate {
        /// The latest tag.
        version: String,
    },
    /// The latest release was downloaded and its binaries written.
    Installed {
        /// The installed tag.
        version: String,
        /// Whether the asset was an archive or a raw binary.
        kind: ArchiveKind,
        /// Declared binaries the archive did not contain.
        missing: Vec<String>,
    },
    /// Some step of the pipeline failed.
    Failed(Error),
}

impl DownloadOutcome {
    /// Tag to record in the version cache, if the install happened.
    #[must_use]
    pub fn installed_version(&self) -> Option<&str> {
        match self {
            Self::Installed { version, .. } => Some(version),
            _ => None,
        }
    }

    /// Whether the tool ended up at the latest version.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// The failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Result<Self>> for DownloadOutcome {
    fn from(result: Result<Self>) -> Self {
        result.unwrap_or_else(Self::Failed)
    }
}

/// Runs resolve, select, download, verify and extract for one tool.
///
/// Cheap to clone; clones share the release source and extractor.
#[derive(Clone)]
pub struct ToolInstaller {
    source: Arc<dyn ReleaseSource>,
    extractor: Arc<dyn Extract>,
    platform: Option<Platform>,
    install_dir: PathBuf,
}

impl ToolInstaller {
    /// Create an installer writing into `install_dir`.
    ///
    /// `platform` is `None` on hosts tooli does not support; every install
    /// then fails with `UnsupportedPlatform` once the release is resolved.
    pub fn new(
        source: Arc<dyn ReleaseSource>,
        platform: Option<Platform>,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            extractor: Arc::new(ArchiveExtractor),
            platform,
            install_dir: install_dir.into(),
        }
    }

    /// Replace the archive extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn Extract>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Directory binaries are written to.
    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Release source shared by this installer.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn ReleaseSource> {
        &self.source
    }

    /// Install the latest release of `tool` unless `current_version`
    /// already equals it.
    ///
    /// An empty `current_version` means "never installed" and never matches.
    /// Nothing is retried; the first failing step becomes the outcome.
    pub async fn install_one(
        &self,
        name: &str,
        tool: &ToolDescriptor,
        current_version: &str,
    ) -> DownloadOutcome {
        self.run(name, tool, current_version).await.into()
    }

    async fn run(
        &self,
        name: &str,
        tool: &ToolDescriptor,
        current_version: &str,
    ) -> Result<DownloadOutcome> {
        let release = self
            .source
            .latest_release(&tool.owner, &tool.repository)
            .await?;

        if !current_version.is_empty() && current_version == release.tag_name {
            debug!(tool = %name, version = %release.tag_name, "Already up to date");
            return Ok(DownloadOutcome::UpToDate {
                version: release.tag_name,
            });
        }

        let platform = self.platform.ok_or_else(|| Error::UnsupportedPlatform {
            os: std::env::consts::OS.to_string(),
        })?;
        let pattern = tool.asset_pattern(platform);
        if pattern.is_empty() {
            return Err(Error::NoAssetForPlatform {
                platform: platform.to_string(),
            });
        }

        let asset = select_asset(&release.assets, pattern)?;
        debug!(tool = %name, asset = %asset.name, id = asset.id, "Selected asset");

        let data = self
            .source
            .asset_bytes(&tool.owner, &tool.repository, asset.id)
            .await?;

        if asset.digest.is_empty() {
            debug!(
                tool = %name,
                asset = %asset.name,
                "No digest published, skipping verification"
            );
        }
        verify(&data, &asset.digest)?;

        let extractor = Arc::clone(&self.extractor);
        let asset_name = asset.name.clone();
        let binaries = tool.binaries.clone();
        let dest = self.install_dir.clone();
        let extraction = tokio::task::spawn_blocking(move || {
            extractor.extract(&data, &asset_name, &binaries, platform, &dest)
        })
        .await
        .map_err(|e| Error::Task {
            message: e.to_string(),
        })??;

        if !extraction.missing.is_empty() {
            warn!(
                tool = %name,
                missing = ?extraction.missing,
                "Some declared binaries were not found in the asset"
            );
        }
        info!(
            tool = %name,
            version = %release.tag_name,
            kind = ?extraction.kind,
            files = extraction.installed.len(),
            "Installed"
        );

        Ok(DownloadOutcome::Installed {
            version: release.tag_name,
            kind: extraction.kind,
            missing: extraction.missing,
        })
    }
}

impl std::fmt::Debug for ToolInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInstaller")
            .field("platform", &self.platform)
            .field("install_dir", &self.install_dir)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::release::Asset;
    use crate::verify::sha256_digest;

    fn installer(
        source: Arc<FakeSource>,
        extractor: Arc<CountingExtractor>,
        platform: Option<Platform>,
    ) -> ToolInstaller {
        ToolInstaller::new(source, platform, "/nonexistent/bin").with_extractor(extractor)
    }

    fn fd_source(digest: &str) -> FakeSource {
        FakeSource::default()
            .with_release(
                "fd",
                release(
                    "v10.2.0",
                    vec![
                        Asset::new("fd-linux.tar.gz", 1).with_digest(digest),
                        Asset::new("fd-linux.tar.gz.sha256", 2),
                        Asset::new("fd-windows.zip", 3),
                    ],
                ),
            )
            .with_blob(1, b"payload")
    }

    #[tokio::test]
    async fn test_up_to_date_skips_download_and_extract() {
        let source = Arc::new(fd_source(""));
        let extractor = Arc::new(CountingExtractor::default());
        let installer = installer(source.clone(), extractor.clone(), Some(Platform::Linux));

        let outcome = installer.install_one("fd", &tool("fd"), "v10.2.0").await;

        let DownloadOutcome::UpToDate { version } = &outcome else {
            panic!("expected an up-to-date outcome, got {outcome:?}");
        };
        assert_eq!(version, "v10.2.0");
        assert_eq!(source.downloads(), 0);
        assert_eq!(extractor.count(), 0);
        assert_eq!(outcome.installed_version(), None);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_empty_current_version_always_installs() {
        let source = Arc::new(fd_source(""));
        let extractor = Arc::new(CountingExtractor::default());
        let installer = installer(source.clone(), extractor.clone(), Some(Platform::Linux));

        let outcome = installer.install_one("fd", &tool("fd"), "").await;

        assert_eq!(outcome.installed_version(), Some("v10.2.0"));
        assert_eq!(source.downloads(), 1);
        assert_eq!(extractor.count(), 1);
    }

    #[tokio::test]
    async fn test_outdated_version_installs_with_verified_digest() {
        let source = Arc::new(fd_source(&sha256_digest(b"payload")));
        let extractor = Arc::new(CountingExtractor::default());
        let installer = installer(source, extractor.clone(), Some(Platform::Linux));

        let outcome = installer.install_one("fd", &tool("fd"), "v9.0.0").await;

        match outcome {
            DownloadOutcome::Installed {
                version,
                kind,
                missing,
            } => {
                assert_eq!(version, "v10.2.0");
                assert_eq!(kind, ArchiveKind::Archive);
                assert!(missing.is_empty());
            }
            other => panic!("expected Installed, got {other:?}"),
        }
        assert_eq!(extractor.count(), 1);
    }

    #[tokio::test]
    async fn test_integrity_failure_never_extracts() {
        let source = Arc::new(fd_source(&sha256_digest(b"something else")));
        let extractor = Arc::new(CountingExtractor::default());
        let installer = installer(source.clone(), extractor.clone(), Some(Platform::Linux));

        let outcome = installer.install_one("fd", &tool("fd"), "").await;

        assert!(matches!(outcome.error(), Some(Error::Integrity { .. })));
        assert_eq!(source.downloads(), 1);
        assert_eq!(extractor.count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_platform_after_resolve() {
        let source = Arc::new(fd_source(""));
        let extractor = Arc::new(CountingExtractor::default());
        let installer = installer(source.clone(), extractor.clone(), None);

        let outcome = installer.install_one("fd", &tool("fd"), "").await;
        assert!(matches!(
            outcome.error(),
            Some(Error::UnsupportedPlatform { .. })
        ));
        assert_eq!(source.downloads(), 0);

        // Up-to-date wins over the platform gate.
        let outcome = installer.install_one("fd", &tool("fd"), "v10.2.0").await;
        assert!(matches!(outcome, DownloadOutcome::UpToDate { .. }));
    }

    #[tokio::test]
    async fn test_empty_pattern_is_no_asset_for_platform() {
        let source = Arc::new(fd_source(""));
        let extractor = Arc::new(CountingExtractor::default());
        let installer = installer(source.clone(), extractor, Some(Platform::Windows));

        let mut linux_only = tool("fd");
        linux_only.windows_asset_pattern.clear();

        let outcome = installer.install_one("fd", &linux_only, "").await;
        assert!(matches!(
            outcome.error(),
            Some(Error::NoAssetForPlatform { platform }) if platform == "windows"
        ));
        assert_eq!(source.downloads(), 0);
    }

    #[tokio::test]
    async fn test_windows_selects_windows_asset() {
        let source = Arc::new(fd_source("").with_blob(3, b"zip"));
        let extractor = Arc::new(CountingExtractor::default());
        let installer = installer(source, extractor.clone(), Some(Platform::Windows));

        let outcome = installer.install_one("fd", &tool("fd"), "").await;
        assert_eq!(outcome.installed_version(), Some("v10.2.0"));
        assert_eq!(extractor.count(), 1);
    }

    #[tokio::test]
    async fn test_release_and_selection_errors_propagate() {
        let source = Arc::new(fd_source(""));
        let extractor = Arc::new(CountingExtractor::default());
        let installer = installer(source, extractor.clone(), Some(Platform::Linux));

        let outcome = installer.install_one("bat", &tool("bat"), "").await;
        assert!(matches!(
            outcome.error(),
            Some(Error::HttpStatus { code: 404, .. })
        ));

        let mut loose = tool("fd");
        loose.linux_asset_pattern = "fd".into();
        let outcome = installer.install_one("fd", &loose, "").await;
        assert!(matches!(
            outcome.error(),
            Some(Error::AmbiguousAsset { .. })
        ));

        let mut broken = tool("fd");
        broken.linux_asset_pattern = "[".into();
        let outcome = installer.install_one("fd", &broken, "").await;
        assert!(matches!(
            outcome.error(),
            Some(Error::InvalidPattern { .. })
        ));

        assert_eq!(extractor.count(), 0);
    }
}
