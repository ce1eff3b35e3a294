//! Error types for release resolution and installation.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Result type for release operations.
pub type Result<T> = std::result::Result<T, Error>;

const RATE_LIMIT_HINT: &str = ". This most likely means that you hit GitHub's API rate limit; \
     set the GITHUB_TOKEN environment variable to raise it";

fn rate_limit_hint(authenticated: &bool) -> &'static str {
    if *authenticated { "" } else { RATE_LIMIT_HINT }
}

fn extraction_target(path: Option<&Path>) -> String {
    path.map_or_else(|| "archive".to_string(), |p| p.display().to_string())
}

/// Errors that can occur while installing a single tool.
///
/// Every variant except [`Error::InstallDir`] is local to one tool.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The asset pattern is not a valid regular expression.
    #[error("Invalid asset pattern '{pattern}': {source}")]
    #[diagnostic(code(tooli::github::invalid_pattern))]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },

    /// No asset of the release matched the pattern.
    #[error("Could not find an asset matching '{pattern}'")]
    #[diagnostic(
        code(tooli::github::no_matching_asset),
        help("Check the asset pattern of this tool in the configuration")
    )]
    NoMatchingAsset {
        /// The pattern that matched nothing.
        pattern: String,
    },

    /// More than one asset matched the pattern.
    #[error(
        "Found two or more matching assets ({}). Please be more specific",
        candidates.join(", ")
    )]
    #[diagnostic(
        code(tooli::github::ambiguous_asset),
        help("Tighten the asset pattern, e.g. anchor it with '$'")
    )]
    AmbiguousAsset {
        /// Names of every matching asset.
        candidates: Vec<String>,
    },

    /// GitHub answered with a non-success status.
    #[error(
        "GitHub returned HTTP {code} for {url}{}",
        rate_limit_hint(authenticated)
    )]
    #[diagnostic(code(tooli::github::http_status))]
    HttpStatus {
        /// HTTP status code.
        code: u16,
        /// Requested URL.
        url: String,
        /// Whether the request carried a token.
        authenticated: bool,
    },

    /// Transport failure, including timeouts.
    #[error(
        "{}Request to {url} failed: {source}",
        if *timed_out { "Timeout: " } else { "" }
    )]
    #[diagnostic(code(tooli::github::network))]
    Network {
        /// Requested URL.
        url: String,
        /// Whether the failure was the per-request timeout.
        timed_out: bool,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The release metadata could not be decoded.
    #[error("Unexpected response from {url}: {message}")]
    #[diagnostic(code(tooli::github::invalid_response))]
    InvalidResponse {
        /// Requested URL.
        url: String,
        /// Decoder message.
        message: String,
    },

    /// Downloaded bytes do not match the published digest.
    #[error(
        "Found non-matching hash (expected {expected}, got {actual}). It is possible that the download got corrupted"
    )]
    #[diagnostic(code(tooli::github::integrity), help("Run the install again"))]
    Integrity {
        /// Digest published with the asset.
        expected: String,
        /// Digest of the downloaded bytes.
        actual: String,
    },

    /// The published digest uses an algorithm tooli cannot compute.
    #[error("Unsupported digest '{digest}'")]
    #[diagnostic(code(tooli::github::unsupported_digest))]
    UnsupportedDigest {
        /// The published digest.
        digest: String,
    },

    /// The host OS is neither Linux nor Windows.
    #[error("The platform '{os}' is not supported")]
    #[diagnostic(code(tooli::github::unsupported_platform))]
    UnsupportedPlatform {
        /// Host OS name.
        os: String,
    },

    /// The descriptor has no asset pattern for this platform.
    #[error("No asset pattern configured for {platform}")]
    #[diagnostic(code(tooli::github::no_asset_for_platform))]
    NoAssetForPlatform {
        /// The current platform.
        platform: String,
    },

    /// A raw binary asset was paired with more or fewer than one binary.
    #[error(
        "Invalid number of binaries ({count}). Non-archive assets can only provide one binary"
    )]
    #[diagnostic(code(tooli::github::invalid_binary_count))]
    InvalidBinaryCount {
        /// Number of declared binaries.
        count: usize,
    },

    /// Reading the archive or writing a binary failed.
    #[error("Failed to extract {}: {message}", extraction_target(path.as_deref()))]
    #[diagnostic(code(tooli::github::extraction))]
    Extraction {
        /// What went wrong.
        message: String,
        /// Output file, when the failure concerns one.
        path: Option<Box<Path>>,
    },

    /// The installation directory could not be prepared.
    #[error("Error creating installation directory '{}': {source}", path.display())]
    #[diagnostic(
        code(tooli::github::install_dir),
        help("Check install_dir in the configuration")
    )]
    InstallDir {
        /// The directory.
        path: Box<Path>,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A tool's install task ended without producing an outcome.
    #[error("Install task aborted: {message}")]
    #[diagnostic(code(tooli::github::task))]
    Task {
        /// Join error description.
        message: String,
    },
}

impl Error {
    /// Create an extraction error for the archive as a whole.
    #[must_use]
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            path: None,
        }
    }

    /// Create an extraction error for a specific output file.
    #[must_use]
    pub fn extraction_at(message: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self::Extraction {
            message: message.into(),
            path: Some(path.as_ref().into()),
        }
    }

    /// Whether this is a rate-limit-flavoured status error without a token.
    #[must_use]
    pub fn is_unauthenticated_status(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus {
                authenticated: false,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_hints_at_token_only_when_unauthenticated() {
        let anonymous = Error::HttpStatus {
            code: 403,
            url: "https://api.github.com/repos/a/b/releases/latest".into(),
            authenticated: false,
        };
        assert!(anonymous.to_string().contains("GITHUB_TOKEN"));
        assert!(anonymous.is_unauthenticated_status());

        let authenticated = Error::HttpStatus {
            code: 404,
            url: "https://api.github.com/repos/a/b/releases/latest".into(),
            authenticated: true,
        };
        assert!(!authenticated.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_ambiguous_lists_candidates() {
        let err = Error::AmbiguousAsset {
            candidates: vec!["a.tar.gz".into(), "b.tar.gz".into()],
        };
        assert!(err.to_string().contains("a.tar.gz, b.tar.gz"));
    }

    #[test]
    fn test_extraction_display() {
        assert_eq!(
            Error::extraction("bad gzip header").to_string(),
            "Failed to extract archive: bad gzip header"
        );
        assert_eq!(
            Error::extraction_at("disk full", "/opt/bin/rg").to_string(),
            "Failed to extract /opt/bin/rg: disk full"
        );
    }
}
