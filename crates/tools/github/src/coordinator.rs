//! Fan-out of the install pipeline over many tools.
//!
//! Every tool gets its own task. Outcomes come back through the task
//! handles and the version cache is only touched after all of them have
//! finished, so no lock guards it.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tooli_core::VersionCache;
use tooli_core::tools::ToolDescriptor;
use tracing::{debug, error};

use crate::installer::{DownloadOutcome, ToolInstaller};
use crate::release::ReleaseSource;
use crate::{Error, Result};

/// Install every tool in `tools` concurrently.
///
/// Each tool starts from its version in `cache` (absent means never
/// installed). A failing or panicking tool only affects its own outcome.
///
/// # Errors
///
/// Returns `InstallDir` if the installation directory cannot be created;
/// no tool is attempted in that case.
pub async fn install_many(
    installer: &ToolInstaller,
    tools: &BTreeMap<String, ToolDescriptor>,
    cache: &VersionCache,
) -> Result<BTreeMap<String, DownloadOutcome>> {
    let dir = installer.install_dir();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| Error::InstallDir {
            path: dir.into(),
            source,
        })?;

    debug!(count = tools.len(), dir = %dir.display(), "Installing tools");

    let handles: Vec<(String, JoinHandle<DownloadOutcome>)> = tools
        .iter()
        .map(|(name, tool)| {
            let installer = installer.clone();
            let task_name = name.clone();
            let tool = tool.clone();
            let current = cache.version_of(name).to_string();
            let handle = tokio::spawn(async move {
                installer.install_one(&task_name, &tool, &current).await
            });
            (name.clone(), handle)
        })
        .collect();

    let mut outcomes = BTreeMap::new();
    for (name, handle) in handles {
        let outcome = handle.await.unwrap_or_else(|e| {
            error!(tool = %name, error = %e, "Install task did not complete");
            DownloadOutcome::Failed(Error::Task {
                message: e.to_string(),
            })
        });
        outcomes.insert(name, outcome);
    }

    Ok(outcomes)
}

/// Record every successful install in `cache`.
///
/// Returns the number of entries changed. Up-to-date and failed tools leave
/// the cache untouched.
pub fn apply_outcomes(
    cache: &mut VersionCache,
    outcomes: &BTreeMap<String, DownloadOutcome>,
) -> usize {
    let mut changed = 0;
    for (name, outcome) in outcomes {
        if let Some(version) = outcome.installed_version() {
            cache.set(name.clone(), version);
            changed += 1;
        }
    }
    changed
}

/// Installed and latest version of one tool.
#[derive(Debug)]
pub struct VersionStatus {
    /// Tool name.
    pub name: String,
    /// Cached version; empty when never installed.
    pub installed: String,
    /// Latest release tag, or why it could not be determined.
    pub available: Result<String>,
}

impl VersionStatus {
    /// True when a newer (different) release than the installed one exists.
    #[must_use]
    pub fn is_outdated(&self) -> bool {
        matches!(&self.available, Ok(tag) if *tag != self.installed)
    }
}

/// Fetch the latest release tag of every tool concurrently.
///
/// Results are ordered by tool name.
pub async fn check_many(
    source: &Arc<dyn ReleaseSource>,
    tools: &BTreeMap<String, ToolDescriptor>,
    cache: &VersionCache,
) -> Vec<VersionStatus> {
    let handles: Vec<(String, JoinHandle<Result<String>>)> = tools
        .iter()
        .map(|(name, tool)| {
            let source = Arc::clone(source);
            let owner = tool.owner.clone();
            let repository = tool.repository.clone();
            let handle = tokio::spawn(async move {
                source
                    .latest_release(&owner, &repository)
                    .await
                    .map(|release| release.tag_name)
            });
            (name.clone(), handle)
        })
        .collect();

    let mut statuses = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        let available = handle.await.unwrap_or_else(|e| {
            Err(Error::Task {
                message: e.to_string(),
            })
        });
        statuses.push(VersionStatus {
            installed: cache.version_of(&name).to_string(),
            name,
            available,
        });
    }
    statuses
}
