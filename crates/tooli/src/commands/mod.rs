//! Command implementations.
//!
//! Each command loads what it needs through [`Context`], prints its results
//! to stdout and returns a [`CliError`] when the process should exit
//! non-zero.

mod add;
mod check;
mod create_config;
mod install;
mod list;
mod remove;

pub use add::{execute as add, prompt_descriptor};
pub use check::{check, outdated, update};
pub use create_config::execute as create_config;
pub use install::{execute as install, report};
pub use list::{execute as list, render as render_list};
pub use remove::execute as remove;

use crate::cli::{CliError, Commands};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tooli_core::tools::Platform;
use tooli_core::{Configuration, VersionCache, paths};
use tooli_tools_github::{GitHubClient, ReleaseSource, ToolInstaller};
use tracing::debug;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration file location.
    pub config_path: PathBuf,
    /// Version cache location.
    pub cache_path: PathBuf,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Host platform; `None` when unsupported.
    pub platform: Option<Platform>,
}

impl Context {
    /// Resolve file locations, honouring an explicit configuration path.
    ///
    /// # Errors
    ///
    /// Fails when the default locations cannot be determined.
    pub fn new(config: Option<PathBuf>, timeout: Duration) -> Result<Self, CliError> {
        let config_path = match config {
            Some(path) => paths::expand_tilde(path)?,
            None => paths::config_file()?,
        };
        let cache_path = paths::cache_file()?;
        let platform = Platform::current();
        debug!(
            config = %config_path.display(),
            cache = %cache_path.display(),
            ?platform,
            "Resolved context"
        );

        Ok(Self {
            config_path,
            cache_path,
            timeout,
            platform,
        })
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable or invalid.
    pub fn load_config(&self) -> Result<Configuration, CliError> {
        Ok(Configuration::load(&self.config_path)?)
    }

    /// Load the version cache; empty when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load_cache(&self) -> Result<VersionCache, CliError> {
        Ok(VersionCache::load(&self.cache_path)?)
    }

    /// Write the version cache.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn save_cache(&self, cache: &VersionCache) -> Result<(), CliError> {
        Ok(cache.save(&self.cache_path)?)
    }

    /// GitHub release source using this context's timeout.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn release_source(&self) -> Result<Arc<dyn ReleaseSource>, CliError> {
        let client = GitHubClient::new(self.timeout)?;
        if !client.is_authenticated() {
            debug!("No GitHub token found; requests are unauthenticated");
        }
        Ok(Arc::new(client))
    }

    /// Installer writing into the configured installation directory.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be expanded or the client built.
    pub fn installer(&self, config: &Configuration) -> Result<ToolInstaller, CliError> {
        Ok(ToolInstaller::new(
            self.release_source()?,
            self.platform,
            config.install_dir()?,
        ))
    }
}

/// Run `command`.
///
/// # Errors
///
/// Returns the error that decides the exit code.
pub async fn dispatch(command: Commands, ctx: &Context) -> Result<(), CliError> {
    match command {
        Commands::Install { tools } => install(ctx, &tools).await,
        Commands::Check { all } => check(ctx, all).await,
        Commands::Update => update(ctx).await,
        Commands::List { long } => list(ctx, long),
        Commands::Remove { tools, purge } => remove(ctx, &tools, purge),
        Commands::Add { name } => add(ctx, &name),
        Commands::CreateConfig { path } => create_config(ctx, path),
    }
}
