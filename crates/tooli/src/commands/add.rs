use super::Context;
use crate::cli::CliError;
use crate::output::Message;
use crate::prompts::Prompter;
use std::io::{self, BufRead, Write};
use tooli_core::tools::{BinarySpec, ToolDescriptor};

/// Ask for every field of a new descriptor.
///
/// Further binaries are read until an empty name is entered.
///
/// # Errors
///
/// Fails on I/O errors and when the input ends early.
pub fn prompt_descriptor<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    name: &str,
) -> io::Result<ToolDescriptor> {
    prompter.say(&format!("Creating configuration entry for {name}:"))?;

    let description = prompter.ask_non_empty("Short description: ")?;
    let owner = prompter.ask_non_empty("GitHub user/org: ")?;
    let repository = prompter.ask_non_empty("Repository name: ")?;
    let windows_asset_pattern = prompter.ask_regex("Windows asset name (regex): ")?;
    let linux_asset_pattern = prompter.ask_regex("Linux asset name (regex): ")?;

    let binary = prompter.ask_non_empty("Binary name: ")?;
    let rename = prompter.ask("Rename binary to (leave empty if no rename): ")?;
    let mut binaries = vec![BinarySpec::new(binary).with_rename(rename)];

    if prompter.confirm("Does this tool have more binaries?")? {
        loop {
            let binary = prompter.ask("Binary name (leave empty to finish): ")?;
            if binary.is_empty() {
                break;
            }
            let rename = prompter.ask("Rename binary to (leave empty if no rename): ")?;
            binaries.push(BinarySpec::new(binary).with_rename(rename));
        }
    }

    Ok(ToolDescriptor {
        binaries,
        owner,
        repository,
        linux_asset_pattern,
        windows_asset_pattern,
        description,
    })
}

/// Interactively add a tool to the configuration.
///
/// # Errors
///
/// `Config` when the tool already exists or has no asset pattern at all;
/// `Other` when reading the answers fails.
pub fn execute(ctx: &Context, name: &str) -> Result<(), CliError> {
    let mut config = ctx.load_config()?;
    if config.tool(name).is_some() {
        return Err(CliError::config_with_help(
            format!("An entry for '{name}' already exists"),
            "To modify it, edit the configuration file",
        ));
    }

    let tool = prompt_descriptor(&mut Prompter::stdio(), name)
        .map_err(|e| CliError::other(format!("Error reading input: {e}")))?;

    if tool.linux_asset_pattern.is_empty() && tool.windows_asset_pattern.is_empty() {
        return Err(CliError::config(format!(
            "'{name}' needs an asset pattern for at least one platform"
        )));
    }

    config.tools.insert(name.to_string(), tool);
    config.validate()?;
    config.save(&ctx.config_path)?;

    Message::success(name, format!("added to {}", ctx.config_path.display())).print();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> io::Result<ToolDescriptor> {
        let mut prompter = Prompter::new(input.as_bytes(), Vec::new());
        prompt_descriptor(&mut prompter, "ripgrep")
    }

    #[test]
    fn test_single_binary() {
        let tool = run(concat!(
            "Better grep\n",
            "burntsushi\n",
            "ripgrep\n",
            "x86_64-pc-windows-msvc\\.zip$\n",
            "x86_64-unknown-linux-musl\\.tar\\.gz$\n",
            "rg\n",
            "\n",
            "n\n",
        ))
        .unwrap();

        assert_eq!(tool.description, "Better grep");
        assert_eq!(tool.source(), "burntsushi/ripgrep");
        assert_eq!(tool.windows_asset_pattern, r"x86_64-pc-windows-msvc\.zip$");
        assert_eq!(
            tool.linux_asset_pattern,
            r"x86_64-unknown-linux-musl\.tar\.gz$"
        );
        assert_eq!(tool.binaries, vec![BinarySpec::new("rg")]);
        assert!(tool.validate().is_ok());
    }

    #[test]
    fn test_invalid_regex_and_more_binaries() {
        let tool = run(concat!(
            "Pager\n",
            "owner\n",
            "repo\n",
            "\n",
            "linux[\n",
            "linux\\.tar\\.gz$\n",
            "main\n",
            "m\n",
            "y\n",
            "helper\n",
            "\n",
            "extra\n",
            "x\n",
            "\n",
        ))
        .unwrap();

        assert_eq!(tool.windows_asset_pattern, "");
        assert_eq!(tool.linux_asset_pattern, r"linux\.tar\.gz$");
        assert_eq!(
            tool.binaries,
            vec![
                BinarySpec::new("main").with_rename("m"),
                BinarySpec::new("helper"),
                BinarySpec::new("extra").with_rename("x"),
            ]
        );
    }

    #[test]
    fn test_truncated_input_fails() {
        assert!(run("Only a description\n").is_err());
    }
}
