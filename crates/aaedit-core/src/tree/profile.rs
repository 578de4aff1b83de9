use super::{CapabilityRule, FileRule, Generation, Rule, RuleHandle};
use crate::cst::ast::{self, AstNode};
use crate::{AaError, Result};

/// Snapshot of one profile block at a single parse generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    attachment: Option<String>,
    flags: Vec<String>,
    includes: Vec<String>,
    rules: Vec<Rule>,
    rule_end: usize,
    generation: Generation,
}

impl Profile {
    fn from_ast(node: &ast::Profile, source: &str, generation: Generation) -> Self {
        let rules = node
            .rules()
            .map(|rule| Rule::from_ast(&rule, generation))
            .collect();

        Self {
            name: node.name().unwrap_or_default(),
            attachment: node.attachment(),
            flags: node.flags(),
            includes: node.includes().filter_map(|include| include.path()).collect(),
            rules,
            rule_end: rule_end_offset(node, source),
            generation,
        }
    }

    /// Profile name; for `/path { ... }` profiles this is the path
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn file_rules(&self) -> impl Iterator<Item = &FileRule> {
        self.rules.iter().filter_map(Rule::as_file)
    }

    pub fn capability_rules(&self) -> impl Iterator<Item = &CapabilityRule> {
        self.rules.iter().filter_map(Rule::as_capability)
    }

    /// Byte offset where an appended rule is inserted
    pub fn rule_end_position(&self) -> usize {
        self.rule_end
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Fail unless `rule` is one of this snapshot's rules
    pub fn check_rule_valid<R>(&self, rule: &R) -> Result<()>
    where
        R: RuleHandle,
        Rule: PartialEq<R>,
    {
        if self.rules.iter().any(|candidate| candidate == rule) {
            Ok(())
        } else {
            let span = rule.span();
            Err(AaError::invalid_rule(&self.name, span.start(), span.end()))
        }
    }
}

/// Start of the closing brace's line when only indentation precedes the
/// brace, otherwise the brace itself.
fn rule_end_offset(node: &ast::Profile, source: &str) -> usize {
    let brace = match node.r_brace() {
        Some(token) => usize::from(token.text_range().start()),
        None => usize::from(node.text_range().end()),
    };
    let before = &source[..brace];
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    if before[line_start..].chars().all(|c| c == ' ' || c == '\t') {
        line_start
    } else {
        brace
    }
}

/// Build profile snapshots for every profile block in a parsed document
pub fn build_profiles(document: &ast::Document, source: &str, generation: Generation) -> Vec<Profile> {
    document
        .profiles()
        .map(|profile| Profile::from_ast(&profile, source, generation))
        .collect()
}
