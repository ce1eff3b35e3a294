//! Persistent record of installed tool versions.
//!
//! The cache maps a tool name to the release tag that was last installed.
//! It is read once at the start of a command and written at most once at the
//! end, after every concurrent install has finished.

use crate::{Result, json_file};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Installed versions keyed by tool name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCache {
    #[serde(default)]
    tools: BTreeMap<String, String>,
}

impl VersionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache, returning an empty cache if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(json_file::load(path)?.unwrap_or_default())
    }

    /// Write the cache, creating the parent directory if needed.
    ///
    /// The file is replaced atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        json_file::save(self, path)
    }

    /// Installed tag of `tool`, if any.
    #[must_use]
    pub fn get(&self, tool: &str) -> Option<&str> {
        self.tools.get(tool).map(String::as_str)
    }

    /// Installed tag of `tool`, or the empty string for "never installed".
    #[must_use]
    pub fn version_of(&self, tool: &str) -> &str {
        self.get(tool).unwrap_or_default()
    }

    /// Record that `tool` is now installed at `version`.
    pub fn set(&mut self, tool: impl Into<String>, version: impl Into<String>) {
        self.tools.insert(tool.into(), version.into());
    }

    /// Forget `tool`. Returns the previously recorded version.
    pub fn remove(&mut self, tool: &str) -> Option<String> {
        self.tools.remove(tool)
    }

    /// Iterate over `(tool, version)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tools.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Names of all installed tools, in name order.
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Number of tracked tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True if no tool is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
