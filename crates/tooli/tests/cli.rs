//! Runs the tooli binary against temporary configuration and cache files.
//!
//! None of these tests reach the network.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    fn cache_path(&self) -> PathBuf {
        self.dir
            .path()
            .join("cache")
            .join("tool-installer")
            .join("tool-versions.json")
    }

    fn install_dir(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    /// Configuration with a single tool `foo` installing into the sandbox.
    fn write_config(&self) {
        let config = format!(
            r#"{{
    "install_dir": "{}",
    "tools": {{
        "foo": {{
            "binaries": [{{ "name": "foo", "rename_to": "" }}],
            "owner": "owner",
            "repository": "foo",
            "linux_asset": "linux\\.tar\\.gz$",
            "windows_asset": "",
            "description": "Test tool"
        }}
    }}
}}"#,
            self.install_dir().display()
        );
        fs::write(self.config_path(), config).unwrap();
    }

    fn write_cache(&self, json: &str) {
        let path = self.cache_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, json).unwrap();
    }

    fn tooli(&self) -> Command {
        let mut cmd = Command::cargo_bin("tooli").unwrap();
        cmd.env("TOOLI_CONFIG", self.config_path())
            .env("XDG_CACHE_HOME", self.dir.path().join("cache"))
            .env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_help_lists_commands() {
    let sandbox = Sandbox::new();
    sandbox
        .tooli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("create-config"))
        .stdout(predicate::str::contains("remove"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox
        .tooli()
        .args(["--timeout", "0", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_config_exits_with_config_error() {
    let sandbox = Sandbox::new();
    sandbox
        .tooli()
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("create-config"));
}

#[test]
fn test_create_config_then_list() {
    let sandbox = Sandbox::new();
    let target = sandbox.dir.path().join("nested").join("config.json");

    sandbox
        .tooli()
        .arg("create-config")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default configuration"));

    assert!(read(&target).contains("burntsushi"));

    sandbox
        .tooli()
        .arg("-c")
        .arg(&target)
        .args(["list", "--long"])
        .assert()
        .success()
        .stdout(predicate::str::contains("burntsushi/ripgrep"));
}

#[test]
fn test_create_config_declined_keeps_file() {
    let sandbox = Sandbox::new();
    sandbox.write_config();
    let before = read(&sandbox.config_path());

    sandbox
        .tooli()
        .arg("create-config")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));

    assert_eq!(read(&sandbox.config_path()), before);
}

#[test]
fn test_list_shows_installed_version() {
    let sandbox = Sandbox::new();
    sandbox.write_config();
    sandbox.write_cache(r#"{ "tools": { "foo": "v1.2.3" } }"#);

    sandbox
        .tooli()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("foo"))
        .stdout(predicate::str::contains("v1.2.3"))
        .stdout(predicate::str::contains("Test tool"));
}

#[test]
fn test_check_without_installed_tools() {
    let sandbox = Sandbox::new();
    sandbox.write_config();

    sandbox
        .tooli()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All tools are up to date."));
}

#[test]
fn test_install_unknown_tool_fails() {
    let sandbox = Sandbox::new();
    sandbox.write_config();

    sandbox
        .tooli()
        .args(["install", "nope"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "nope: error: tool not found in configuration",
        ));

    assert!(!sandbox.cache_path().exists());
}

#[test]
fn test_remove_with_purge() {
    let sandbox = Sandbox::new();
    sandbox.write_config();
    sandbox.write_cache(r#"{ "tools": { "foo": "v1.2.3" } }"#);
    fs::create_dir_all(sandbox.install_dir()).unwrap();
    let binary = sandbox.install_dir().join("foo");
    fs::write(&binary, b"#!/bin/sh\n").unwrap();

    sandbox
        .tooli()
        .args(["remove", "--purge", "foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed binary 'foo'"));

    assert!(!binary.exists());
    assert!(!read(&sandbox.cache_path()).contains("foo"));
    assert!(!read(&sandbox.config_path()).contains("\"foo\""));
}

#[test]
fn test_remove_unknown_tool_fails() {
    let sandbox = Sandbox::new();
    sandbox.write_config();

    sandbox
        .tooli()
        .args(["remove", "nope"])
        .assert()
        .code(1);
}
