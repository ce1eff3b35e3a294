use super::Context;
use crate::cli::CliError;
use crate::output::{Message, MessageKind};
use std::io::ErrorKind;
use std::path::Path;
use tooli_core::tools::{Platform, ToolDescriptor};
use tracing::debug;

/// Delete the installed binaries of `tool` from `install_dir`.
///
/// Names get the platform's executable suffix when `platform` is known.
#[must_use]
pub fn remove_binaries(
    name: &str,
    tool: &ToolDescriptor,
    install_dir: &Path,
    platform: Option<Platform>,
) -> Vec<Message> {
    let binaries = match platform {
        Some(platform) => tool.binaries_for(platform),
        None => tool.binaries.clone(),
    };

    binaries
        .iter()
        .map(|binary| {
            let file = binary.effective_name();
            let path = install_dir.join(file);
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!(tool = %name, path = %path.display(), "Removed binary");
                    Message::success(name, format!("removed binary '{file}'"))
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Message::warning(name, format!("binary '{file}' is not installed"))
                }
                Err(e) => Message::error(name, format!("failed to remove binary '{file}': {e}")),
            }
        })
        .collect()
}

/// Remove tools' binaries and forget their versions.
///
/// With `purge` the configuration entries are deleted too.
///
/// # Errors
///
/// `Install` when a tool is unknown or a binary could not be deleted;
/// `Config`/`Other` when the configuration or cache cannot be written.
pub fn execute(ctx: &Context, names: &[String], purge: bool) -> Result<(), CliError> {
    let mut config = ctx.load_config()?;
    let mut cache = ctx.load_cache()?;
    let install_dir = config.install_dir()?;

    let mut failures = 0;
    for name in names {
        let Some(tool) = config.tool(name) else {
            Message::error(name, "tool not found in configuration").print();
            failures += 1;
            continue;
        };

        for message in remove_binaries(name, tool, &install_dir, ctx.platform) {
            if message.kind == MessageKind::Error {
                failures += 1;
            }
            message.print();
        }
        cache.remove(name);
    }

    if purge {
        let before = config.tools.len();
        config.tools.retain(|name, _| !names.contains(name));
        if config.tools.len() != before {
            config.save(&ctx.config_path)?;
        }
    }
    ctx.save_cache(&cache)?;

    if failures > 0 {
        return Err(CliError::install(format!(
            "{failures} removal(s) did not succeed"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tooli_core::tools::BinarySpec;

    fn tool(binaries: Vec<BinarySpec>) -> ToolDescriptor {
        ToolDescriptor {
            binaries,
            owner: "o".into(),
            repository: "r".into(),
            linux_asset_pattern: "linux".into(),
            windows_asset_pattern: "windows".into(),
            description: String::new(),
        }
    }

    #[test]
    fn test_removes_renamed_binaries() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("ripgrep"), b"x").unwrap();
        std::fs::write(temp.path().join("other"), b"x").unwrap();

        let messages = remove_binaries(
            "ripgrep",
            &tool(vec![BinarySpec::new("rg").with_rename("ripgrep")]),
            temp.path(),
            Some(Platform::Linux),
        );

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, MessageKind::Success);
        assert!(!temp.path().join("ripgrep").exists());
        assert!(temp.path().join("other").exists());
    }

    #[test]
    fn test_windows_names_are_suffixed() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("fd.exe"), b"x").unwrap();

        let messages = remove_binaries(
            "fd",
            &tool(vec![BinarySpec::new("fd")]),
            temp.path(),
            Some(Platform::Windows),
        );

        assert_eq!(messages[0].kind, MessageKind::Success);
        assert!(!temp.path().join("fd.exe").exists());
    }

    #[test]
    fn test_missing_binary_is_warning() {
        let temp = TempDir::new().unwrap();
        let messages = remove_binaries(
            "fd",
            &tool(vec![BinarySpec::new("fd")]),
            temp.path(),
            Some(Platform::Linux),
        );
        assert_eq!(messages[0].kind, MessageKind::Warning);
        assert_eq!(
            messages[0].text(),
            "fd: warning: binary 'fd' is not installed"
        );
    }
}
