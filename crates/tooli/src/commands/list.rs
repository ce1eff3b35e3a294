use super::Context;
use crate::cli::CliError;
use crate::output::Table;
use tooli_core::{Configuration, VersionCache};

/// Longest description shown by the short listing.
const DESCRIPTION_WIDTH: usize = 50;

/// Render the configured tools with their installed versions.
#[must_use]
pub fn render(config: &Configuration, cache: &VersionCache, long: bool) -> String {
    let version = |name: &str| cache.get(name).unwrap_or_default().to_string();

    if long {
        let mut table = Table::new(["Name", "Source", "Version", "Description"]);
        for (name, tool) in &config.tools {
            table.add_row([
                name.clone(),
                tool.source(),
                version(name),
                tool.description.clone(),
            ]);
        }
        table.render()
    } else {
        let mut table = Table::new(["Name", "Version", "Description"])
            .with_max_width(2, DESCRIPTION_WIDTH);
        for (name, tool) in &config.tools {
            table.add_row([name.clone(), version(name), tool.description.clone()]);
        }
        table.render()
    }
}

/// Print the configured tools sorted by name.
///
/// # Errors
///
/// Fails when the configuration or cache cannot be loaded.
#[allow(clippy::print_stdout)]
pub fn execute(ctx: &Context, long: bool) -> Result<(), CliError> {
    let config = ctx.load_config()?;
    let cache = ctx.load_cache()?;
    print!("{}", render(&config, &cache, long));
    Ok(())
}
