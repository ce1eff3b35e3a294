//! The tooli configuration file.
//!
//! ## Structure
//!
//! ```json
//! {
//!     "install_dir": "~/.local/bin",
//!     "tools": {
//!         "ripgrep": {
//!             "binaries": [{ "name": "rg", "rename_to": "" }],
//!             "owner": "burntsushi",
//!             "repository": "ripgrep",
//!             "linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
//!             "windows_asset": "x86_64-pc-windows-msvc\\.zip$",
//!             "description": "Better grep"
//!         }
//!     }
//! }
//! ```
//!
//! Asset patterns are only checked when they are used, not here.

use crate::tools::ToolDescriptor;
use crate::{Error, Result, json_file, paths};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default installation directory written into new configurations.
pub const DEFAULT_INSTALL_DIR: &str = "~/.local/bin";

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Directory binaries are installed into. May start with `~`.
    #[serde(rename = "install_dir")]
    pub install_dir: String,
    /// Tool descriptors keyed by tool name.
    #[serde(default)]
    pub tools: BTreeMap<String, ToolDescriptor>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            install_dir: DEFAULT_INSTALL_DIR.to_string(),
            tools: BTreeMap::new(),
        }
    }
}

impl Configuration {
    /// Parse and validate configuration JSON.
    ///
    /// `origin` is only used for error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| Error::parse(e, origin))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// Unlike the version cache, a missing configuration is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = json_file::load(path)?.ok_or_else(|| {
            Error::configuration_with_help(
                format!("Configuration file not found: {}", path.display()),
                "Generate one with 'tooli create-config'",
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        json_file::save(self, path)
    }

    /// The curated configuration shipped with tooli.
    pub fn builtin_default() -> Result<Self> {
        Self::parse(DEFAULT_CONFIGURATION, Path::new("<built-in default>"))
    }

    /// Installation directory with `~` expanded.
    pub fn install_dir(&self) -> Result<PathBuf> {
        paths::expand_tilde(&self.install_dir)
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Check every descriptor's structural invariants.
    pub fn validate(&self) -> Result<()> {
        if self.install_dir.trim().is_empty() {
            return Err(Error::configuration("install_dir must not be empty"));
        }
        for (name, tool) in &self.tools {
            tool.validate().map_err(|reason| {
                Error::configuration_with_help(
                    format!("Invalid entry for tool '{name}': {reason}"),
                    "Edit the configuration file or re-create the entry with 'tooli add'",
                )
            })?;
        }
        Ok(())
    }
}

/// The curated list of tools written by `tooli create-config`.
pub const DEFAULT_CONFIGURATION: &str = r#"{
	"install_dir": "~/.local/bin",
	"tools": {
		"bat": {
			"binaries": [{ "name": "bat", "rename_to": "" }],
			"owner": "sharkdp",
			"repository": "bat",
			"linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
			"windows_asset": "x86_64-pc-windows-msvc\\.zip$",
			"description": "Better cat"
		},
		"delta": {
			"binaries": [{ "name": "delta", "rename_to": "" }],
			"owner": "dandavison",
			"repository": "delta",
			"linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
			"windows_asset": "x86_64-pc-windows-msvc\\.zip$",
			"description": "Diff tool"
		},
		"eza": {
			"binaries": [{ "name": "eza", "rename_to": "" }],
			"owner": "eza-community",
			"repository": "eza",
			"linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
			"windows_asset": "x86_64-pc-windows-gnu\\.zip$",
			"description": "Better ls (replacement of exa which is unmaintained)"
		},
		"fd": {
			"binaries": [{ "name": "fd", "rename_to": "" }],
			"owner": "sharkdp",
			"repository": "fd",
			"linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
			"windows_asset": "x86_64-pc-windows-msvc\\.zip$",
			"description": "Better find"
		},
		"hyperfine": {
			"binaries": [{ "name": "hyperfine", "rename_to": "" }],
			"owner": "sharkdp",
			"repository": "hyperfine",
			"linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
			"windows_asset": "x86_64-pc-windows-msvc\\.zip$",
			"description": "Benchmark tool"
		},
		"micro": {
			"binaries": [{ "name": "micro", "rename_to": "" }],
			"owner": "zyedidia",
			"repository": "micro",
			"linux_asset": "linux64\\.tar\\.gz$",
			"windows_asset": "win64\\.zip$",
			"description": "Command-line editor"
		},
		"ripgrep": {
			"binaries": [{ "name": "rg", "rename_to": "" }],
			"owner": "burntsushi",
			"repository": "ripgrep",
			"linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
			"windows_asset": "x86_64-pc-windows-msvc\\.zip$",
			"description": "Better grep"
		},
		"sd": {
			"binaries": [{ "name": "sd", "rename_to": "" }],
			"owner": "chmln",
			"repository": "sd",
			"linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
			"windows_asset": "x86_64-pc-windows-msvc\\.zip$",
			"description": "Better sed"
		},
		"starship": {
			"binaries": [{ "name": "starship", "rename_to": "" }],
			"owner": "starship",
			"repository": "starship",
			"linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
			"windows_asset": "x86_64-pc-windows-msvc\\.zip$",
			"description": "Cross-shell custom prompt"
		},
		"tealdeer": {
			"binaries": [{ "name": "tealdeer", "rename_to": "tldr" }],
			"owner": "dbrgn",
			"repository": "tealdeer",
			"linux_asset": "tealdeer-linux-x86_64-musl$",
			"windows_asset": "windows-x86_64-msvc.exe$",
			"description": "Command-line cheatsheets"
		},
		"tokei": {
			"binaries": [{ "name": "tokei", "rename_to": "" }],
			"owner": "XAMPPRocky",
			"repository": "tokei",
			"linux_asset": "x86_64-unknown-linux-musl\\.tar\\.gz$",
			"windows_asset": "x86_64-pc-windows-msvc.exe$",
			"description": "Code line counting tool"
		}
	}
}"#;
