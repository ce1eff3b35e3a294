//! Declarative description of an installable tool.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

use super::platform::Platform;

/// True when `name` is a single file name that stays inside whatever
/// directory it is joined onto.
///
/// Separators of either platform, `.`, `..` and drive prefixes are refused.
#[must_use]
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', ':']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// One file to extract from a release asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySpec {
    /// Exact base filename expected inside the archive.
    #[serde(rename = "name")]
    pub source_name: String,
    /// Name to install the file under; empty keeps `source_name`.
    #[serde(default)]
    pub rename_to: String,
}

impl BinarySpec {
    /// Create a binary spec without a rename.
    #[must_use]
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            rename_to: String::new(),
        }
    }

    /// Set the name the binary is installed under.
    #[must_use]
    pub fn with_rename(mut self, rename_to: impl Into<String>) -> Self {
        self.rename_to = rename_to.into();
        self
    }

    /// Name of the installed file.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        if self.rename_to.is_empty() {
            &self.source_name
        } else {
            &self.rename_to
        }
    }

    /// Adjust both names to the executable naming rules of `platform`.
    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> Self {
        Self {
            source_name: platform.executable_name(&self.source_name),
            rename_to: if self.rename_to.is_empty() {
                String::new()
            } else {
                platform.executable_name(&self.rename_to)
            },
        }
    }
}

/// Configuration entry for one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Binaries to extract from the selected asset, in order.
    pub binaries: Vec<BinarySpec>,
    /// GitHub user or organisation.
    pub owner: String,
    /// GitHub repository name.
    pub repository: String,
    /// Regex selecting the Linux asset; empty means unsupported.
    #[serde(rename = "linux_asset", default)]
    pub linux_asset_pattern: String,
    /// Regex selecting the Windows asset; empty means unsupported.
    #[serde(rename = "windows_asset", default)]
    pub windows_asset_pattern: String,
    /// Display only.
    #[serde(default)]
    pub description: String,
}

impl ToolDescriptor {
    /// Asset pattern for `platform`. Empty when the tool does not support it.
    #[must_use]
    pub fn asset_pattern(&self, platform: Platform) -> &str {
        match platform {
            Platform::Linux => &self.linux_asset_pattern,
            Platform::Windows => &self.windows_asset_pattern,
        }
    }

    /// `owner/repository`, as shown in listings.
    #[must_use]
    pub fn source(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }

    /// Binaries with names adjusted for `platform`.
    #[must_use]
    pub fn binaries_for(&self, platform: Platform) -> Vec<BinarySpec> {
        self.binaries
            .iter()
            .map(|b| b.for_platform(platform))
            .collect()
    }

    /// Check the structural invariants a usable descriptor must satisfy.
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.owner.trim().is_empty() {
            return Err("owner must not be empty".to_string());
        }
        if self.repository.trim().is_empty() {
            return Err("repository must not be empty".to_string());
        }
        if self.binaries.is_empty() {
            return Err("at least one binary must be declared".to_string());
        }
        for (index, binary) in self.binaries.iter().enumerate() {
            if binary.source_name.is_empty() {
                return Err(format!("binary #{} has an empty name", index + 1));
            }
            if !is_plain_file_name(&binary.source_name) {
                return Err(format!(
                    "binary name '{}' must be a plain file name",
                    binary.source_name
                ));
            }
            if !binary.rename_to.is_empty() && !is_plain_file_name(&binary.rename_to) {
                return Err(format!(
                    "rename target '{}' must be a plain file name",
                    binary.rename_to
                ));
            }
        }
        Ok(())
    }
}
