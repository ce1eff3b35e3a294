//! Picking the one asset of a release that matches a tool's pattern.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::release::Asset;
use crate::{Error, Result};

/// Checksum and signature companions published next to binaries.
static CHECKSUM_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\.(sha(\d+)?(sum)?|md5(sum)?|checksums\.txt)$")
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|_| unreachable!("checksum suffix pattern is a valid regex"))
});

/// Whether `name` looks like a checksum file (`.sha256`, `.md5sum`, ...).
#[must_use]
pub fn is_checksum_file(name: &str) -> bool {
    CHECKSUM_SUFFIX.is_match(name)
}

/// Select exactly one asset whose name matches `pattern`.
///
/// The pattern is unanchored; checksum files never match. Pure function of
/// its inputs.
///
/// # Errors
///
/// - `InvalidPattern` if `pattern` does not compile
/// - `NoMatchingAsset` if nothing matches
/// - `AmbiguousAsset` listing every match if more than one does
pub fn select_asset<'a>(assets: &'a [Asset], pattern: &str) -> Result<&'a Asset> {
    let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut matches = assets
        .iter()
        .filter(|a| !is_checksum_file(&a.name))
        .filter(|a| regex.is_match(&a.name));

    let Some(first) = matches.next() else {
        return Err(Error::NoMatchingAsset {
            pattern: pattern.to_string(),
        });
    };

    let rest: Vec<&Asset> = matches.collect();
    if !rest.is_empty() {
        return Err(Error::AmbiguousAsset {
            candidates: std::iter::once(first)
                .chain(rest)
                .map(|a| a.name.clone())
                .collect(),
        });
    }

    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets(names: &[&str]) -> Vec<Asset> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Asset::new(*n, i as u64 + 1))
            .collect()
    }

    #[test]
    fn test_selects_single_match() {
        let list = assets(&[
            "fd-v10.2.0-x86_64-unknown-linux-musl.tar.gz",
            "fd-v10.2.0-x86_64-pc-windows-msvc.zip",
        ]);
        let pattern = r"x86_64-unknown-linux-musl\.tar\.gz$";
        let picked = select_asset(&list, pattern).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn test_checksum_files_never_selected() {
        let list = assets(&[
            "tool-linux.tar.gz.sha256",
            "tool-linux.tar.gz",
            "tool-linux.tar.gz.SHA512SUM",
            "tool-linux.tar.gz.md5",
            "tool_checksums.txt",
        ]);
        let picked = select_asset(&list, "linux").unwrap();
        assert_eq!(picked.name, "tool-linux.tar.gz");

        let only_checksums = assets(&["tool-linux.sha256sum", "tool-linux.sha1"]);
        assert!(matches!(
            select_asset(&only_checksums, "linux"),
            Err(Error::NoMatchingAsset { .. })
        ));
    }

    #[test]
    fn test_is_checksum_file() {
        for name in [
            "a.sha256",
            "a.sha1",
            "a.sha512",
            "a.sha256sum",
            "a.MD5",
            "a.md5sum",
            "release.checksums.txt",
            "a.sha",
        ] {
            assert!(is_checksum_file(name), "{name}");
        }
        for name in ["a.tar.gz", "a.zip", "sha256-tool", "checksums.txt.zip"] {
            assert!(!is_checksum_file(name), "{name}");
        }
    }

    #[test]
    fn test_ambiguous_match_names_both() {
        let list = assets(&[
            "tool-x86_64-linux.tar.gz",
            "tool-x86_64-linux-musl.tar.gz",
        ]);
        match select_asset(&list, "linux") {
            Err(Error::AmbiguousAsset { candidates }) => assert_eq!(
                candidates,
                vec![
                    "tool-x86_64-linux.tar.gz".to_string(),
                    "tool-x86_64-linux-musl.tar.gz".to_string(),
                ]
            ),
            other => panic!("expected AmbiguousAsset, got {other:?}"),
        }
    }

    #[test]
    fn test_no_match() {
        let list = assets(&["tool-darwin.tar.gz"]);
        assert!(matches!(
            select_asset(&list, "linux"),
            Err(Error::NoMatchingAsset { pattern }) if pattern == "linux"
        ));
        assert!(matches!(
            select_asset(&[], "linux"),
            Err(Error::NoMatchingAsset { .. })
        ));
    }

    #[test]
    fn test_invalid_pattern() {
        let list = assets(&["tool-linux.tar.gz"]);
        assert!(matches!(
            select_asset(&list, "(linux"),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let list = assets(&["prefix-linux64-suffix.tar.gz"]);
        assert!(select_asset(&list, "linux64").is_ok());
    }

    #[test]
    fn test_selection_is_deterministic() {
        let list = assets(&["a-linux.tar.gz", "a-linux.zip", "a-windows.zip"]);
        for pattern in [r"linux\.zip$", "linux", "mac", "("] {
            let first = select_asset(&list, pattern)
                .map(|a| a.id)
                .map_err(|e| e.to_string());
            let second = select_asset(&list, pattern)
                .map(|a| a.id)
                .map_err(|e| e.to_string());
            assert_eq!(first, second);
        }
    }
}
