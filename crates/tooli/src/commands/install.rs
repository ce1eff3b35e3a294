use super::Context;
use crate::cli::CliError;
use crate::output::Message;
use std::collections::BTreeMap;
use tooli_core::{Configuration, VersionCache};
use tooli_core::tools::ToolDescriptor;
use tooli_tools_github::{ArchiveKind, DownloadOutcome, apply_outcomes, install_many};
use tracing::info;

/// Install the named tools, or every configured tool when `names` is empty.
///
/// Unknown names are reported and skipped. The version cache is written
/// once, after every install has finished.
///
/// # Errors
///
/// `Install` when any tool failed or was unknown; `Config`/`Other` when the
/// configuration, cache or installation directory is unusable.
pub async fn execute(ctx: &Context, names: &[String]) -> Result<(), CliError> {
    let config = ctx.load_config()?;
    let (selected, unknown) = select(&config, names);
    for name in &unknown {
        Message::error(name, "tool not found in configuration").print();
    }
    install_selected(ctx, &config, &selected, unknown.len()).await
}

/// Split `names` into configured descriptors and unknown names.
fn select(
    config: &Configuration,
    names: &[String],
) -> (BTreeMap<String, ToolDescriptor>, Vec<String>) {
    if names.is_empty() {
        return (config.tools.clone(), Vec::new());
    }

    let mut selected = BTreeMap::new();
    let mut unknown = Vec::new();
    for name in names {
        match config.tool(name) {
            Some(tool) => {
                selected.insert(name.clone(), tool.clone());
            }
            None => unknown.push(name.clone()),
        }
    }
    (selected, unknown)
}

pub(super) async fn install_selected(
    ctx: &Context,
    config: &Configuration,
    selected: &BTreeMap<String, ToolDescriptor>,
    prior_failures: usize,
) -> Result<(), CliError> {
    let mut cache = ctx.load_cache()?;
    let installer = ctx.installer(config)?;

    let outcomes = install_many(&installer, selected, &cache).await?;
    let changed = apply_outcomes(&mut cache, &outcomes);
    info!(tools = outcomes.len(), changed, "Install finished");
    conclude(ctx, &cache, &outcomes, changed, Message::print)?;

    let failures = prior_failures + outcomes.values().filter(|o| !o.is_success()).count();
    if failures > 0 {
        return Err(CliError::install(format!(
            "{failures} of {} tool(s) could not be installed",
            outcomes.len() + prior_failures
        )));
    }
    Ok(())
}

/// Show the result lines of a finished batch, then write the cache.
///
/// Every line is emitted before the cache is written. A batch that changed
/// nothing does not create the cache file.
fn conclude(
    ctx: &Context,
    cache: &VersionCache,
    outcomes: &BTreeMap<String, DownloadOutcome>,
    changed: usize,
    mut emit: impl FnMut(&Message),
) -> Result<(), CliError> {
    for message in report(outcomes) {
        emit(&message);
    }
    if changed > 0 || ctx.cache_path.exists() {
        ctx.save_cache(cache)?;
    }
    Ok(())
}

/// Result lines for a batch of outcomes, in tool name order.
#[must_use]
pub fn report(outcomes: &BTreeMap<String, DownloadOutcome>) -> Vec<Message> {
    let mut messages = Vec::with_capacity(outcomes.len());
    for (name, outcome) in outcomes {
        match outcome {
            DownloadOutcome::UpToDate { version } => messages.push(Message::info(
                name,
                format!("skipping download - already up to date ({version})"),
            )),
            DownloadOutcome::Installed {
                version,
                kind,
                missing,
            } => {
                let provenance = match kind {
                    ArchiveKind::Archive => "archive",
                    ArchiveKind::RawBinary => "raw binary",
                };
                messages.push(Message::success(
                    name,
                    format!("successfully installed {version} from the downloaded {provenance}"),
                ));
                if !missing.is_empty() {
                    messages.push(Message::warning(
                        name,
                        format!("not found in the asset: {}", missing.join(", ")),
                    ));
                }
            }
            DownloadOutcome::Failed(e) => messages.push(Message::error(name, e.to_string())),
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MessageKind;
    use std::path::PathBuf;
    use std::time::Duration;
    use tooli_tools_github::Error;

    fn context(cache_path: PathBuf) -> Context {
        Context {
            config_path: cache_path.with_file_name("config.json"),
            cache_path,
            timeout: Duration::from_secs(1),
            platform: None,
        }
    }

    fn installed(version: &str) -> DownloadOutcome {
        DownloadOutcome::Installed {
            version: version.into(),
            kind: ArchiveKind::Archive,
            missing: vec![],
        }
    }

    #[test]
    fn test_select_all_when_no_names() {
        let config = Configuration::builtin_default().unwrap();
        let (selected, unknown) = select(&config, &[]);
        assert_eq!(selected.len(), config.tools.len());
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_select_reports_unknown() {
        let config = Configuration::builtin_default().unwrap();
        let (selected, unknown) = select(&config, &["fd".into(), "nope".into(), "bat".into()]);
        assert_eq!(selected.keys().collect::<Vec<_>>(), ["bat", "fd"]);
        assert_eq!(unknown, ["nope"]);
    }

    #[test]
    fn test_report_lines() {
        let outcomes = BTreeMap::from([
            (
                "rg".to_string(),
                DownloadOutcome::Installed {
                    version: "14.1.1".into(),
                    kind: ArchiveKind::Archive,
                    missing: vec![],
                },
            ),
            (
                "bat".to_string(),
                DownloadOutcome::UpToDate {
                    version: "v0.24.0".into(),
                },
            ),
            (
                "foo".to_string(),
                DownloadOutcome::Installed {
                    version: "v1".into(),
                    kind: ArchiveKind::RawBinary,
                    missing: vec![],
                },
            ),
            (
                "delta".to_string(),
                DownloadOutcome::Installed {
                    version: "0.18".into(),
                    kind: ArchiveKind::Archive,
                    missing: vec!["delta-extra".into()],
                },
            ),
            (
                "fd".to_string(),
                DownloadOutcome::Failed(Error::NoMatchingAsset {
                    pattern: "linux".into(),
                }),
            ),
        ]);

        let lines: Vec<String> = report(&outcomes).iter().map(Message::text).collect();
        assert_eq!(
            lines,
            [
                "bat: info: skipping download - already up to date (v0.24.0)",
                "delta: successfully installed 0.18 from the downloaded archive",
                "delta: warning: not found in the asset: delta-extra",
                "fd: error: Could not find an asset matching 'linux'",
                "foo: successfully installed v1 from the downloaded raw binary",
                "rg: successfully installed 14.1.1 from the downloaded archive",
            ]
        );
        assert_eq!(report(&outcomes)[3].kind, MessageKind::Error);
    }

    #[test]
    fn test_lines_are_shown_when_cache_cannot_be_written() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let ctx = context(blocker.join("tool-versions.json"));

        let outcomes = BTreeMap::from([("rg".to_string(), installed("14.1.1"))]);
        let mut cache = VersionCache::new();
        let changed = apply_outcomes(&mut cache, &outcomes);

        let mut shown = Vec::new();
        let result = conclude(&ctx, &cache, &outcomes, changed, |m| shown.push(m.text()));

        assert!(result.is_err());
        assert_eq!(shown.len(), 1);
        assert!(shown[0].starts_with("rg: successfully installed 14.1.1"));
    }

    #[test]
    fn test_failed_batch_creates_no_cache_file() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(temp.path().join("tool-versions.json"));
        let failed = DownloadOutcome::Failed(Error::NoMatchingAsset {
            pattern: "linux".into(),
        });
        let outcomes = BTreeMap::from([("fd".to_string(), failed)]);

        let mut shown = 0;
        let result = conclude(&ctx, &VersionCache::new(), &outcomes, 0, |_| shown += 1);

        assert!(result.is_ok());
        assert_eq!(shown, 1);
        assert!(!ctx.cache_path.exists());
    }

    #[test]
    fn test_existing_cache_file_is_kept_current() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(temp.path().join("tool-versions.json"));
        let mut cache = VersionCache::new();
        cache.set("bat", "v0.24.0");
        ctx.save_cache(&cache).unwrap();

        let outcomes = BTreeMap::from([("rg".to_string(), installed("14.1.1"))]);
        let changed = apply_outcomes(&mut cache, &outcomes);
        conclude(&ctx, &cache, &outcomes, changed, |_| {}).unwrap();

        let saved = VersionCache::load(&ctx.cache_path).unwrap();
        assert_eq!(saved.get("bat"), Some("v0.24.0"));
        assert_eq!(saved.get("rg"), Some("14.1.1"));
    }
}
