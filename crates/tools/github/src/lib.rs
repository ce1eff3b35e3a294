//! GitHub Releases installer for tooli.
//!
//! Resolves the latest release of each configured tool, picks the asset for
//! the current platform, verifies it against the digest GitHub publishes and
//! extracts the declared binaries. Supports:
//! - Regex asset selection that ignores checksum companions
//! - `.tar.gz` and `.zip` archives, and raw single-binary assets
//! - Concurrent installation with per-tool failure isolation

mod client;
mod coordinator;
mod error;
mod extract;
mod installer;
mod release;
mod select;
mod verify;

pub use client::{DEFAULT_API_URL, DEFAULT_TIMEOUT, GitHubClient, USER_AGENT, token_from_env};
pub use coordinator::{VersionStatus, apply_outcomes, check_many, install_many};
pub use error::{Error, Result};
pub use extract::{ArchiveExtractor, ArchiveKind, Extract, Extraction};
pub use installer::{DownloadOutcome, ToolInstaller};
pub use release::{Asset, Release, ReleaseSource};
pub use select::{is_checksum_file, select_asset};
pub use verify::{sha256_digest, verify};
