//! Error types for configuration, version cache and path handling.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

fn path_suffix(path: Option<&Path>) -> String {
    path.map_or_else(String::new, |p| format!(": {}", p.display()))
}

/// Error type for tooli core operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error while reading or writing local state
    #[error("I/O {operation} failed{}", path_suffix(path.as_deref()))]
    #[diagnostic(
        code(tooli::core::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "write", "create")
        operation: String,
    },

    /// Invalid or inconsistent configuration
    #[error("Configuration error: {message}")]
    #[diagnostic(code(tooli::core::config))]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
        /// Optional hint for fixing the problem
        #[help]
        help: Option<String>,
    },

    /// JSON (de)serialization failure
    #[error("Failed to {operation} {}: {source}", path.display())]
    #[diagnostic(code(tooli::core::serialization))]
    Serialization {
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
        /// File being read or written
        path: Box<Path>,
        /// "parse" or "serialize"
        operation: &'static str,
    },
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
            help: None,
        }
    }

    /// Create a configuration error with a help hint
    #[must_use]
    pub fn configuration_with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
            help: Some(help.into()),
        }
    }

    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create a JSON parse error for the given file
    #[must_use]
    pub fn parse(source: serde_json::Error, path: impl AsRef<Path>) -> Self {
        Self::Serialization {
            source,
            path: path.as_ref().into(),
            operation: "parse",
        }
    }

    /// Create a JSON serialization error for the given file
    #[must_use]
    pub fn serialize(source: serde_json::Error, path: impl AsRef<Path>) -> Self {
        Self::Serialization {
            source,
            path: path.as_ref().into(),
            operation: "serialize",
        }
    }
}

/// Result type for tooli core operations
pub type Result<T> = std::result::Result<T, Error>;
