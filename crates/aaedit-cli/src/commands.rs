//! CLI command implementations
//!
//! Edits with `--output` go through an in-memory buffer, so the output file
//! is only created once the edit has been applied and the result reparsed.

use aaedit_core::{AaError, EditorConfig, PolicyDocument, PolicyParser, Profile, Rule};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::ProfileTarget;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] AaError),

    #[error("no profile named \"{name}\" in '{}'", file.display())]
    ProfileNotFound { name: String, file: PathBuf },

    #[error("profile \"{profile}\" has {count} rule(s), there is no rule {index}")]
    RuleOutOfRange {
        profile: String,
        index: usize,
        count: usize,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;

/// List command implementation
pub fn list_command(file: &Path, config: EditorConfig) -> Result<()> {
    let document = PolicyDocument::open_with(file, config, PolicyParser::new())?;

    for include in document.includes() {
        println!("{} <{include}>", "include".dimmed());
    }
    for profile in document.profiles() {
        println!("{}", profile_header(&profile));
        for include in profile.includes() {
            println!("       {} <{include}>", "include".dimmed());
        }
        for (index, rule) in profile.rules().iter().enumerate() {
            println!("  {:>3}: {rule}", index + 1);
        }
    }
    Ok(())
}

/// Add command implementation
pub fn add_command(target: &ProfileTarget, pattern: &str, mode: &str, config: EditorConfig) -> Result<()> {
    let (mut document, profile) = open_target(target, config)?;

    match &target.output {
        None => document.add_rule(&profile, pattern, mode)?,
        Some(path) => {
            let mut buffer = Vec::new();
            document.add_rule_to(&profile, pattern, mode, &mut buffer)?;
            write_output(path, &buffer)?;
        }
    }

    println!("{} {pattern} {mode}, to {}", "Added".green(), profile.name());
    Ok(())
}

/// Remove command implementation
pub fn remove_command(target: &ProfileTarget, index: usize, config: EditorConfig) -> Result<()> {
    let (mut document, profile) = open_target(target, config)?;
    let rule = select_rule(&profile, index)?;

    match &target.output {
        None => document.remove_rule(&profile, &rule)?,
        Some(path) => {
            let mut buffer = Vec::new();
            document.remove_rule_to(&profile, &rule, &mut buffer)?;
            write_output(path, &buffer)?;
        }
    }

    println!("{} rule {index} ({rule}) from {}", "Removed".green(), profile.name());
    Ok(())
}

/// Edit command implementation
pub fn edit_command(
    target: &ProfileTarget,
    index: usize,
    pattern: &str,
    mode: &str,
    config: EditorConfig,
) -> Result<()> {
    let (mut document, profile) = open_target(target, config)?;
    let rule = select_rule(&profile, index)?;

    match &target.output {
        None => document.edit_rule(&profile, &rule, pattern, mode)?,
        Some(path) => {
            let mut buffer = Vec::new();
            document.edit_rule_to(&profile, &rule, pattern, mode, &mut buffer)?;
            write_output(path, &buffer)?;
        }
    }

    println!(
        "{} rule {index} of {}: {pattern} {mode},",
        "Replaced".green(),
        profile.name()
    );
    Ok(())
}

fn open_target(target: &ProfileTarget, config: EditorConfig) -> Result<(PolicyDocument, Profile)> {
    debug!("Opening {} for profile {}", target.file.display(), target.profile);
    let document = PolicyDocument::open_with(&target.file, config, PolicyParser::new())?;
    let profile = document
        .profile(&target.profile)
        .ok_or_else(|| CliError::ProfileNotFound {
            name: target.profile.clone(),
            file: target.file.clone(),
        })?;
    Ok((document, profile))
}

/// Rule at a 1-based position
fn select_rule(profile: &Profile, index: usize) -> Result<Rule> {
    index
        .checked_sub(1)
        .and_then(|i| profile.rules().get(i))
        .cloned()
        .ok_or_else(|| CliError::RuleOutOfRange {
            profile: profile.name().to_string(),
            index,
            count: profile.rules().len(),
        })
}

fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn profile_header(profile: &Profile) -> String {
    let mut header = profile.name().bold().to_string();
    if let Some(attachment) = profile.attachment() {
        header.push(' ');
        header.push_str(attachment);
    }
    if !profile.flags().is_empty() {
        header.push_str(&format!(" flags=({})", profile.flags().join(",")));
    }
    header
}
