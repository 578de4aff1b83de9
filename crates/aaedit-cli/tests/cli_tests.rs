//! Integration tests for the aaedit CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PROFILE: &str = "\
#include <tunables/global>

/** {
  /usr/X11R6/lib/lib*so* rrr,
  /does/not/exist r,
  /var/log/messages www,
}
";

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut command = Command::cargo_bin("aaedit").unwrap();
    command.arg("--no-color");
    command
}

fn setup() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.sd");
    fs::write(&path, PROFILE).unwrap();
    (temp_dir, path)
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("edits individual rules"));
}

#[test]
fn test_list_numbers_rules() {
    let (_dir, path) = setup();

    cli()
        .arg("list")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("include <tunables/global>"))
        .stdout(predicate::str::contains("1: /usr/X11R6/lib/lib*so* rrr,"))
        .stdout(predicate::str::contains("3: /var/log/messages www,"));
}

#[test]
fn test_remove_rewrites_file() {
    let (dir, path) = setup();

    cli()
        .current_dir(dir.path())
        .args(["remove", "-p", "/**", "-r", "1"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed rule 1"));

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "#include <tunables/global>\n\n/** {\n  /does/not/exist r,\n  /var/log/messages www,\n}\n"
    );
}

#[test]
fn test_add_with_output_leaves_source_untouched() {
    let (dir, path) = setup();
    let output = dir.path().join("out.sd");

    cli()
        .current_dir(dir.path())
        .args(["add", "-p", "/**", "-o"])
        .arg(&output)
        .arg(&path)
        .args(["/tmp/**", "rw"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), PROFILE);
    let written = fs::read_to_string(&output).unwrap();
    assert!(written.ends_with("  /var/log/messages www,\n  /tmp/** rw,\n}\n"));
}

#[test]
fn test_edit_replaces_rule() {
    let (dir, path) = setup();

    cli()
        .current_dir(dir.path())
        .args(["edit", "-p", "/**", "-r", "2"])
        .arg(&path)
        .args(["/does/exist", "rw"])
        .assert()
        .success();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("  /usr/X11R6/lib/lib*so* rrr,\n/does/exist rw,\n  /var/log/messages www,\n"));
}

#[test]
fn test_unknown_profile_fails() {
    let (dir, path) = setup();

    cli()
        .current_dir(dir.path())
        .args(["remove", "-p", "/usr/bin/none", "-r", "1"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no profile named \"/usr/bin/none\""));

    assert_eq!(fs::read_to_string(&path).unwrap(), PROFILE);
}

#[test]
fn test_rule_out_of_range_does_not_create_output() {
    let (dir, path) = setup();
    let output = dir.path().join("out.sd");

    cli()
        .current_dir(dir.path())
        .args(["remove", "-p", "/**", "-r", "9", "-o"])
        .arg(&output)
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("there is no rule 9"));

    assert!(!output.exists());
}

#[test]
fn test_parse_error_is_reported() {
    let (dir, path) = setup();
    fs::write(&path, "/** {\n  /a\n}\n").unwrap();

    cli()
        .current_dir(dir.path())
        .arg("list")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error occurred when parsing profile"))
        .stderr(predicate::str::contains("at line 2"));
}

#[test]
fn test_config_indent_is_used() {
    let (dir, path) = setup();
    fs::write(dir.path().join(".aaedit.toml"), "rule-indent = \"    \"\n").unwrap();

    cli()
        .current_dir(dir.path())
        .args(["add", "-p", "/**"])
        .arg(&path)
        .args(["/srv/**", "r"])
        .assert()
        .success();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("\n    /srv/** r,\n}\n"));
}

#[test]
fn test_missing_config_file_fails() {
    let (dir, path) = setup();

    cli()
        .current_dir(dir.path())
        .args(["-c", "missing.toml", "list"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
