use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use miette::{Diagnostic, Report};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// One or more tools failed, or an unexpected error occurred
pub const EXIT_FAILURE: i32 = 1;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("Configuration error: {message}")]
    #[diagnostic(code(tooli::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Some tools could not be installed, checked or removed (exit code 1)
    #[error("{message}")]
    #[diagnostic(code(tooli::cli::install))]
    Install {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 1)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(tooli::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new install failure
    #[must_use]
    pub fn install(message: impl Into<String>) -> Self {
        Self::Install {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new other error with help text
    #[must_use]
    pub fn other_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Add help text to an existing error, returning a new error with the help text set.
    #[must_use]
    pub fn with_help(self, help_text: impl Into<String>) -> Self {
        let help = Some(help_text.into());
        match self {
            Self::Config { message, .. } => Self::Config { message, help },
            Self::Install { message, .. } => Self::Install { message, help },
            Self::Other { message, .. } => Self::Other { message, help },
        }
    }
}

/// Convert `tooli_core::Error` to appropriate `CliError` variant.
///
/// - Configuration and JSON errors -> Config (exit code 2)
/// - I/O errors -> Other (exit code 1)
impl From<tooli_core::Error> for CliError {
    fn from(err: tooli_core::Error) -> Self {
        match err {
            tooli_core::Error::Configuration { message, help } => Self::Config { message, help },
            tooli_core::Error::Serialization { .. } => Self::config_with_help(
                err.to_string(),
                "Check that the file is valid JSON, or re-create it with 'tooli create-config'",
            ),
            tooli_core::Error::Io {
                source,
                path,
                operation,
            } => {
                let path_str = path
                    .as_ref()
                    .map_or(String::new(), |p| format!(" on {}", p.display()));
                Self::other_with_help(
                    format!("I/O {operation} failed{path_str}: {source}"),
                    "Check file permissions and ensure the path exists",
                )
            }
        }
    }
}

/// Convert batch-level `tooli_tools_github::Error`s.
///
/// Per-tool errors are reported as result lines; only the ones that stop a
/// whole command arrive here.
impl From<tooli_tools_github::Error> for CliError {
    fn from(err: tooli_tools_github::Error) -> Self {
        match err {
            tooli_tools_github::Error::InstallDir { .. } => {
                Self::config_with_help(err.to_string(), "Check install_dir in the configuration")
            }
            tooli_tools_github::Error::UnsupportedPlatform { .. } => Self::config(err.to_string()),
            _ => Self::other(err.to_string()),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Install { .. } | CliError::Other { .. } => EXIT_FAILURE,
    }
}

/// Render error through miette to stderr
#[allow(clippy::print_stderr)]
pub fn render_error(err: &CliError) {
    let report = Report::new(err.clone());
    eprintln!("{report:?}");
    // Ensure output is flushed before potential process exit
    let _ = io::stderr().flush();
}

/// Command-line interface of tooli.
#[derive(Parser, Debug)]
#[command(name = "tooli")]
#[command(
    about = "tool-installer (tooli) provides an easy way to download all your favourite binaries from GitHub at once"
)]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file location.
    #[arg(
        short = 'c',
        long,
        global = true,
        env = "TOOLI_CONFIG",
        help = "Where to read the configuration from (default: ~/.config/tool-installer/config.json)"
    )]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(
        short = 't',
        long,
        global = true,
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Timeout for requests to GitHub in seconds"
    )]
    pub timeout: u64,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Install the newest version of all or the selected tools.
    #[command(
        visible_alias = "i",
        about = "Installs the newest version of all or the selected tools",
        after_help = "Examples:\n  tooli install\n  tooli install ripgrep eza bat fd"
    )]
    Install {
        /// Tools to install; all configured tools when empty.
        #[arg(help = "Tools to install (default: all configured tools)")]
        tools: Vec<String>,
    },

    /// Check for and display available updates.
    #[command(visible_alias = "c", about = "Checks and displays available updates")]
    Check {
        /// Check every configured tool, not only installed ones.
        #[arg(
            long,
            short = 'a',
            help = "Check all configured tools, not only installed ones"
        )]
        all: bool,
    },

    /// Update the installed tools to their latest version.
    #[command(
        visible_alias = "u",
        about = "Updates the installed tools to the latest version"
    )]
    Update,

    /// List the configured tools.
    #[command(
        visible_alias = "l",
        about = "Lists the tools in the configuration, sorted by name"
    )]
    List {
        /// Include the source repository and the full description.
        #[arg(
            long,
            short = 'l',
            help = "Show source repository and full description"
        )]
        long: bool,
    },

    /// Remove installed tools.
    #[command(
        visible_alias = "r",
        about = "Removes the binaries of tools and forgets their version",
        after_help = "Examples:\n  tooli remove ripgrep\n  tooli remove --purge ripgrep bat micro"
    )]
    Remove {
        /// Tools to remove.
        #[arg(required = true, help = "Tools to remove")]
        tools: Vec<String>,
        /// Also delete the configuration entries.
        #[arg(long, help = "Also remove the tools from the configuration")]
        purge: bool,
    },

    /// Add a tool to the configuration interactively.
    #[command(
        visible_alias = "a",
        about = "Adds a new tool to the configuration",
        after_help = "Examples:\n  tooli add ripgrep"
    )]
    Add {
        /// Name of the new tool.
        #[arg(help = "Name of the tool to add")]
        name: String,
    },

    /// Write the default configuration.
    #[command(
        name = "create-config",
        visible_alias = "cc",
        about = "Creates the default configuration"
    )]
    CreateConfig {
        /// Target path; the configured location when omitted.
        #[arg(
            help = "Where to write the configuration (default: the configuration location)"
        )]
        path: Option<PathBuf>,
    },
}

/// Parse command line arguments into a CLI structure.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
