//! Host platform identification.

use serde::{Deserialize, Serialize};

/// Suffix Windows requires on executable files.
pub const WINDOWS_EXE_SUFFIX: &str = ".exe";

/// Operating systems tooli can install binaries for.
///
/// Resolved once at startup and passed down, so the install pipeline never
/// inspects the running OS itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux, any architecture the asset regex selects.
    Linux,
    /// Windows; executables carry an `.exe` suffix.
    Windows,
}

impl Platform {
    /// Get the current platform, or `None` when the host OS is unsupported.
    #[must_use]
    pub fn current() -> Option<Self> {
        Self::parse(std::env::consts::OS)
    }

    /// Parse from an OS name such as `std::env::consts::OS`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// Executable suffix the platform requires, if any.
    #[must_use]
    pub const fn exe_suffix(self) -> Option<&'static str> {
        match self {
            Self::Linux => None,
            Self::Windows => Some(WINDOWS_EXE_SUFFIX),
        }
    }

    /// Append the executable suffix to `name` unless it is already present.
    #[must_use]
    pub fn executable_name(self, name: &str) -> String {
        match self.exe_suffix() {
            Some(suffix) if !name.ends_with(suffix) => format!("{name}{suffix}"),
            _ => name.to_string(),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
        }
    }
}
