//! Rule removal against profile files on disk
//!
//! Each test writes a profile to a scratch directory, removes the first rule
//! of the first profile, and re-opens the file to check what was written.

use aaedit_core::{PolicyDocument, Profile};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ONE_PROFILE_ONE_RULE: &str = "\
/** {
  /usr/X11R6/lib/lib*so* rrr,
}
";

const ONE_PROFILE_THREE_RULES: &str = "\
/** {
  /usr/X11R6/lib/lib*so* rrr,
  /does/not/exist r,
  /var/log/messages www,
}
";

const GLOB_PROFILE_TWO_RULES: &str = "\
/* {
  /does/not/exist r,
  /var/log/messages www,
}
";

const TWO_PROFILES_ONE_RULE: &str = "\
/** {
  /usr/X11R6/lib/lib*so* rrr,
}

/* {
  /usr/X11R6/lib/lib*so* rrr,
}
";

const TWO_PROFILES_THREE_RULES: &str = "\
/** {
  /usr/X11R6/lib/lib*so* rrr,
  /does/not/exist r,
  /var/log/messages www,
}

/* {
  /usr/X11R6/lib/lib*so* rrr,
  /does/not/exist r,
  /var/log/messages www,
}
";

fn write_profile(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("test.sd");
    fs::write(&path, content).unwrap();
    path
}

fn remove_first_rule(path: &Path) {
    let mut document = PolicyDocument::open(path).unwrap();
    let profile = document.profiles().remove(0);
    let rule = profile.rules().first().cloned().expect("at least one rule");
    document.remove_rule(&profile, &rule).unwrap();
}

/// (pattern, mode) pairs of a profile's file rules, read back from disk
fn file_rules(path: &Path, profile_name: &str) -> Vec<(String, String)> {
    let document = PolicyDocument::open(path).unwrap();
    let profile: Profile = document
        .profile(profile_name)
        .unwrap_or_else(|| panic!("no profile named {profile_name}"));
    profile
        .file_rules()
        .map(|rule| (rule.pattern().to_string(), rule.mode().to_string()))
        .collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(pattern, mode)| (pattern.to_string(), mode.to_string()))
        .collect()
}

#[test]
fn test_remove_only_rule_of_only_profile() {
    let dir = TempDir::new().unwrap();
    let path = write_profile(&dir, ONE_PROFILE_ONE_RULE);

    remove_first_rule(&path);

    assert!(file_rules(&path, "/**").is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "/** {\n}\n");
}

#[test]
fn test_remove_first_of_several_rules() {
    let dir = TempDir::new().unwrap();
    let path = write_profile(&dir, ONE_PROFILE_THREE_RULES);

    remove_first_rule(&path);

    assert_eq!(
        file_rules(&path, "/**"),
        pairs(&[("/does/not/exist", "r"), ("/var/log/messages", "www")])
    );
}

#[test]
fn test_remove_first_of_two_rules() {
    let dir = TempDir::new().unwrap();
    let path = write_profile(&dir, GLOB_PROFILE_TWO_RULES);

    remove_first_rule(&path);

    assert_eq!(file_rules(&path, "/*"), pairs(&[("/var/log/messages", "www")]));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "/* {\n  /var/log/messages www,\n}\n"
    );
}

#[test]
fn test_remove_leaves_other_profile_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_profile(&dir, TWO_PROFILES_ONE_RULE);

    remove_first_rule(&path);

    assert!(file_rules(&path, "/**").is_empty());
    assert_eq!(
        file_rules(&path, "/*"),
        pairs(&[("/usr/X11R6/lib/lib*so*", "rrr")])
    );
}

#[test]
fn test_remove_in_first_of_two_multi_rule_profiles() {
    let dir = TempDir::new().unwrap();
    let path = write_profile(&dir, TWO_PROFILES_THREE_RULES);

    remove_first_rule(&path);

    assert_eq!(
        file_rules(&path, "/**"),
        pairs(&[("/does/not/exist", "r"), ("/var/log/messages", "www")])
    );
    assert_eq!(
        file_rules(&path, "/*"),
        pairs(&[
            ("/usr/X11R6/lib/lib*so*", "rrr"),
            ("/does/not/exist", "r"),
            ("/var/log/messages", "www"),
        ])
    );
}

#[test]
fn test_remove_last_rule_keeps_comments_and_blank_lines() {
    let dir = TempDir::new().unwrap();
    let path = write_profile(
        &dir,
        "# header comment\n/** {\n  # reading\n  /a r,\n\n  /b w,  \n}\n",
    );

    let mut document = PolicyDocument::open(&path).unwrap();
    let profile = document.profiles().remove(0);
    let last = profile.rules().last().cloned().unwrap();
    document.remove_rule(&profile, &last).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# header comment\n/** {\n  # reading\n  /a r,\n\n}\n"
    );
}

#[test]
fn test_remove_capability_rule() {
    let dir = TempDir::new().unwrap();
    let path = write_profile(&dir, "/** {\n  capability setuid,\n  /a r,\n}\n");

    let mut document = PolicyDocument::open(&path).unwrap();
    let profile = document.profiles().remove(0);
    let capability = profile.capability_rules().next().cloned().unwrap();
    document.remove_rule(&profile, &capability).unwrap();

    let profile = document.profiles().remove(0);
    assert_eq!(profile.capability_rules().count(), 0);
    assert_eq!(profile.rules().len(), 1);
    assert_eq!(document.text(), "/** {\n  /a r,\n}\n");
}

#[test]
fn test_remove_rule_sharing_a_line() {
    let dir = TempDir::new().unwrap();
    let path = write_profile(&dir, "/** {\n  /a r, /b w,\n}\n");

    let mut document = PolicyDocument::open(&path).unwrap();
    let profile = document.profiles().remove(0);
    let second = profile.rules()[1].clone();
    document.remove_rule(&profile, &second).unwrap();

    assert_eq!(document.text(), "/** {\n  /a r, \n}\n");
}
