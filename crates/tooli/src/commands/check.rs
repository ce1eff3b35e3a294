use super::Context;
use super::install::install_selected;
use crate::cli::CliError;
use crate::output::{Message, Table};
use std::collections::BTreeMap;
use tooli_core::tools::ToolDescriptor;
use tooli_core::{Configuration, VersionCache};
use tooli_tools_github::{VersionStatus, check_many};
use tracing::debug;

/// Tools whose versions are compared: the installed ones, or all.
///
/// Installed tools that are no longer configured are skipped.
fn tools_to_check(
    config: &Configuration,
    cache: &VersionCache,
    all: bool,
) -> BTreeMap<String, ToolDescriptor> {
    if all {
        return config.tools.clone();
    }
    cache
        .tool_names()
        .filter_map(|name| match config.tool(name) {
            Some(tool) => Some((name.to_string(), tool.clone())),
            None => {
                debug!(tool = %name, "Installed tool is no longer configured, skipping");
                None
            }
        })
        .collect()
}

async fn statuses(
    ctx: &Context,
    config: &Configuration,
    cache: &VersionCache,
    all: bool,
) -> Result<Vec<VersionStatus>, CliError> {
    let tools = tools_to_check(config, cache, all);
    let source = ctx.release_source()?;
    Ok(check_many(&source, &tools, cache).await)
}

/// Table of the tools that are outdated or could not be checked.
#[must_use]
pub fn outdated(statuses: &[VersionStatus]) -> Table<3> {
    let mut table = Table::new(["Name", "Installed", "Available"]);
    for status in statuses {
        let available = match &status.available {
            Ok(_) if !status.is_outdated() => continue,
            Ok(tag) => tag.clone(),
            Err(e) => format!("Error: {e}"),
        };
        table.add_row([status.name.clone(), status.installed.clone(), available]);
    }
    table
}

/// Print the tools that have a newer release.
///
/// # Errors
///
/// `Install` when some lookups failed.
#[allow(clippy::print_stdout)]
pub async fn check(ctx: &Context, all: bool) -> Result<(), CliError> {
    let config = ctx.load_config()?;
    let cache = ctx.load_cache()?;
    let statuses = statuses(ctx, &config, &cache, all).await?;

    let table = outdated(&statuses);
    if table.is_empty() {
        println!("All tools are up to date.");
    } else {
        print!("{table}");
    }

    let failed = statuses.iter().filter(|s| s.available.is_err()).count();
    if failed > 0 {
        return Err(CliError::install(format!(
            "Could not determine the latest release of {failed} tool(s)"
        )));
    }
    Ok(())
}

/// Install the latest release of every installed tool that is outdated.
///
/// # Errors
///
/// `Install` when a lookup or an install failed.
#[allow(clippy::print_stdout)]
pub async fn update(ctx: &Context) -> Result<(), CliError> {
    let config = ctx.load_config()?;
    let cache = ctx.load_cache()?;
    let statuses = statuses(ctx, &config, &cache, false).await?;

    let mut lookup_failures = 0;
    let mut selected = BTreeMap::new();
    for status in &statuses {
        match &status.available {
            Err(e) => {
                lookup_failures += 1;
                Message::error(
                    &status.name,
                    format!("failed to obtain the latest release: {e}"),
                )
                .print();
            }
            Ok(_) if status.is_outdated() => {
                if let Some(tool) = config.tool(&status.name) {
                    selected.insert(status.name.clone(), tool.clone());
                }
            }
            Ok(_) => {}
        }
    }

    if selected.is_empty() {
        println!("All tools are up to date.");
        if lookup_failures > 0 {
            return Err(CliError::install(format!(
                "Could not determine the latest release of {lookup_failures} tool(s)"
            )));
        }
        return Ok(());
    }

    install_selected(ctx, &config, &selected, lookup_failures).await
}
