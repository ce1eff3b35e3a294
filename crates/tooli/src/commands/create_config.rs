use super::Context;
use crate::cli::CliError;
use crate::prompts::Prompter;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tooli_core::{Configuration, paths};

/// Decide whether `target` may be written, asking when it already exists.
fn may_write<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    target: &Path,
) -> std::io::Result<bool> {
    if !target.exists() {
        return Ok(true);
    }
    prompter.confirm(&format!(
        "'{}' already exists. Overwrite it?",
        target.display()
    ))
}

/// Write the built-in configuration to `path`, or to the active config path.
///
/// # Errors
///
/// `Other` when the answer cannot be read or the file cannot be written.
#[allow(clippy::print_stdout)]
pub fn execute(ctx: &Context, path: Option<PathBuf>) -> Result<(), CliError> {
    let target = match path {
        Some(path) => paths::expand_tilde(path)?,
        None => ctx.config_path.clone(),
    };

    let confirmed = may_write(&mut Prompter::stdio(), &target)
        .map_err(|e| CliError::other(format!("Error reading input: {e}")))?;
    if !confirmed {
        println!("Leaving '{}' unchanged.", target.display());
        return Ok(());
    }

    Configuration::builtin_default()?.save(&target)?;
    println!("Created default configuration: '{}'", target.display());
    Ok(())
}
