//! Round-trip editing of a profile file
//!
//! [`PolicyDocument`] owns the source text of one file and the profile
//! snapshots parsed from it. Every edit splices the text at byte offsets
//! recorded on the snapshots, writes the whole text out, and parses it
//! again. The fresh parse carries a new [`Generation`], so every
//! [`Profile`] and [`Rule`] handed out before the edit stops comparing
//! equal to the current ones and is rejected by later edits.
//!
//! ```rust,ignore
//! use aaedit_core::PolicyDocument;
//!
//! let mut document = PolicyDocument::open("/etc/apparmor.d/usr.bin.foo")?;
//! let profile = document.profile("/usr/bin/foo").unwrap();
//! document.add_rule(&profile, "/var/log/foo.log", "w")?;
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::cst::ast::{self, AstNode};
use crate::parser::{Parser, PolicyParser};
use crate::splice::TextEdit;
use crate::tree::{Generation, Profile, Rule, RuleHandle, build_profiles};
use crate::{AaError, Result};

/// Where an edit writes the updated text
enum Sink<'a> {
    /// Replace the file the document was opened from
    Overwrite,
    Writer(&'a mut dyn Write),
}

/// A profile file held in memory together with its parsed profiles
#[derive(Debug)]
pub struct PolicyDocument<P: Parser = PolicyParser> {
    path: PathBuf,
    text: String,
    profiles: Vec<Profile>,
    includes: Vec<String>,
    generation: Generation,
    consistent: bool,
    config: EditorConfig,
    parser: P,
}

impl PolicyDocument<PolicyParser> {
    /// Read and parse the file at `path` with the default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, EditorConfig::default(), PolicyParser::new())
    }
}

impl<P: Parser> PolicyDocument<P> {
    /// Read and parse the file at `path` with an explicit config and parser
    pub fn open_with(path: impl AsRef<Path>, config: EditorConfig, mut parser: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        config.validate()?;
        let text = std::fs::read_to_string(&path).map_err(|e| AaError::io_error(&path, e))?;
        let parsed = parse_tree(&mut parser, &path, &text)?;

        Ok(Self {
            path,
            text,
            profiles: parsed.profiles,
            includes: parsed.includes,
            generation: parsed.generation,
            consistent: true,
            config,
            parser,
        })
    }

    /// Independent copy of the current profiles, in source order
    pub fn profiles(&self) -> Vec<Profile> {
        self.profiles.clone()
    }

    /// First current profile with the given name
    pub fn profile(&self, name: &str) -> Option<Profile> {
        self.profiles.iter().find(|p| p.name() == name).cloned()
    }

    /// Include directives outside any profile block
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// False after an edit whose reparse or write failed, until [`reload`]
    ///
    /// [`reload`]: Self::reload
    pub fn is_consistent(&self) -> bool {
        self.consistent
    }

    /// Delete `rule` from `profile` and overwrite the source file
    pub fn remove_rule<R>(&mut self, profile: &Profile, rule: &R) -> Result<()>
    where
        R: RuleHandle,
        Rule: PartialEq<R>,
    {
        self.remove(profile, rule, Sink::Overwrite)
    }

    /// Delete `rule` from `profile` and write the new text to `out`
    pub fn remove_rule_to<R>(&mut self, profile: &Profile, rule: &R, out: &mut dyn Write) -> Result<()>
    where
        R: RuleHandle,
        Rule: PartialEq<R>,
    {
        self.remove(profile, rule, Sink::Writer(out))
    }

    /// Append `PATTERN MODE,` as the last rule of `profile`
    pub fn add_rule(&mut self, profile: &Profile, pattern: &str, mode: &str) -> Result<()> {
        self.add(profile, pattern, mode, Sink::Overwrite)
    }

    pub fn add_rule_to(
        &mut self,
        profile: &Profile,
        pattern: &str,
        mode: &str,
        out: &mut dyn Write,
    ) -> Result<()> {
        self.add(profile, pattern, mode, Sink::Writer(out))
    }

    /// Replace `old` with `PATTERN MODE,` at the same position.
    ///
    /// The old rule's whole span is replaced, so its indentation is not
    /// carried over.
    pub fn edit_rule<R>(&mut self, profile: &Profile, old: &R, pattern: &str, mode: &str) -> Result<()>
    where
        R: RuleHandle,
        Rule: PartialEq<R>,
    {
        self.edit(profile, old, pattern, mode, Sink::Overwrite)
    }

    pub fn edit_rule_to<R>(
        &mut self,
        profile: &Profile,
        old: &R,
        pattern: &str,
        mode: &str,
        out: &mut dyn Write,
    ) -> Result<()>
    where
        R: RuleHandle,
        Rule: PartialEq<R>,
    {
        self.edit(profile, old, pattern, mode, Sink::Writer(out))
    }

    /// Re-read the source file and parse it again.
    ///
    /// Any in-memory changes that never reached the file are dropped. This
    /// only restores consistency when the file on disk still parses: after a
    /// failed `*_to` edit, or once the file has been fixed by hand. A failed
    /// edit through the default sink has already overwritten the file, so
    /// reloading fails with the same parse error.
    pub fn reload(&mut self) -> Result<()> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| AaError::io_error(&self.path, e))?;
        self.text = text;
        self.reparse()
    }

    fn remove<R>(&mut self, profile: &Profile, rule: &R, sink: Sink<'_>) -> Result<()>
    where
        R: RuleHandle,
        Rule: PartialEq<R>,
    {
        self.check_profile_valid(profile)?;
        profile.check_rule_valid(rule)?;

        let span = rule.span();
        info!(operation = "remove", profile = profile.name(), start = span.start(), end = span.end(), "Editing profile");
        self.commit(TextEdit::delete(span.range()), sink)
    }

    fn add(&mut self, profile: &Profile, pattern: &str, mode: &str, sink: Sink<'_>) -> Result<()> {
        self.check_profile_valid(profile)?;

        let offset = profile.rule_end_position();
        let line = format!("{}{pattern} {mode},\n", self.config.rule_indent);
        info!(operation = "add", profile = profile.name(), start = offset, end = offset, "Editing profile");
        self.commit(TextEdit::insert(offset, line), sink)
    }

    fn edit<R>(&mut self, profile: &Profile, old: &R, pattern: &str, mode: &str, sink: Sink<'_>) -> Result<()>
    where
        R: RuleHandle,
        Rule: PartialEq<R>,
    {
        self.check_profile_valid(profile)?;
        profile.check_rule_valid(old)?;

        let span = old.span();
        info!(operation = "edit", profile = profile.name(), start = span.start(), end = span.end(), "Editing profile");
        self.commit(TextEdit::replace(span.range(), format!("{pattern} {mode},\n")), sink)
    }

    /// Fail unless the document is consistent and `profile` is current
    fn check_profile_valid(&self, profile: &Profile) -> Result<()> {
        if !self.consistent {
            return Err(AaError::inconsistent(&self.path));
        }
        if self.profiles.iter().any(|candidate| candidate == profile) {
            Ok(())
        } else {
            Err(AaError::invalid_profile(profile.name()))
        }
    }

    /// Splice, write, reparse. The document is flagged inconsistent from
    /// the moment the text changes until the reparse succeeds.
    fn commit(&mut self, edit: TextEdit, sink: Sink<'_>) -> Result<()> {
        edit.apply(&mut self.text)?;
        self.consistent = false;
        self.write(sink)?;
        self.reparse()
    }

    fn write(&self, sink: Sink<'_>) -> Result<()> {
        match sink {
            Sink::Overwrite => {
                std::fs::write(&self.path, &self.text).map_err(|e| AaError::io_error(&self.path, e))
            }
            Sink::Writer(out) => out
                .write_all(self.text.as_bytes())
                .and_then(|()| out.flush())
                .map_err(AaError::output_error),
        }
    }

    fn reparse(&mut self) -> Result<()> {
        match parse_tree(&mut self.parser, &self.path, &self.text) {
            Ok(parsed) => {
                self.profiles = parsed.profiles;
                self.includes = parsed.includes;
                self.generation = parsed.generation;
                self.consistent = true;
                Ok(())
            }
            Err(err) => {
                self.consistent = false;
                warn!(path = %self.path.display(), "Reparse failed, document is now inconsistent: {err}");
                Err(err)
            }
        }
    }
}

struct ParsedTree {
    profiles: Vec<Profile>,
    includes: Vec<String>,
    generation: Generation,
}

fn parse_tree<P: Parser>(parser: &mut P, path: &Path, text: &str) -> Result<ParsedTree> {
    let result = parser.parse(text)?;
    if !result.is_valid() {
        return Err(AaError::parse_failure(path, result.errors));
    }
    let document = ast::Document::cast(result.cst).ok_or_else(|| AaError::parse_failure(path, Vec::new()))?;

    let generation = Generation::next();
    let profiles = build_profiles(&document, text, generation);
    let includes = document.includes().filter_map(|include| include.path()).collect();
    debug!(
        path = %path.display(),
        generation = generation.get(),
        profiles = profiles.len(),
        bytes = text.len(),
        "Parsed profile document"
    );

    Ok(ParsedTree {
        profiles,
        includes,
        generation,
    })
}
