//! tooli - install your favourite binaries from GitHub releases
//!
//! The binary is a thin shell around this library:
//!
//! - [`cli`] - argument parsing, error type and exit codes
//! - [`commands`] - one module per subcommand, sharing a [`commands::Context`]
//! - [`output`] - coloured result lines and box-drawn tables
//! - [`prompts`] - line-based questions used by `add` and `create-config`
//! - [`tracing`] - subscriber setup for `--level` and `--log-format`
//!
//! Descriptors, configuration and the version cache come from `tooli-core`;
//! release lookup and installation from `tooli-tools-github`.

pub mod cli;
pub mod commands;
pub mod output;
pub mod prompts;
pub mod tracing;
