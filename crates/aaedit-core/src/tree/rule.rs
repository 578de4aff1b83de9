use std::fmt;

use super::{Generation, RulePrefix, RuleSpan};
use crate::cst::ast::{self, AstNode};

/// Anything that identifies a rule by its byte range
pub trait RuleHandle {
    fn span(&self) -> RuleSpan;
}

/// File access rule: `[qualifiers] PATTERN MODE [-> TARGET],`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRule {
    prefix: RulePrefix,
    pattern: String,
    mode: String,
    exec_target: Option<String>,
    span: RuleSpan,
    generation: Generation,
}

impl FileRule {
    pub(crate) fn from_ast(node: &ast::FileRule, generation: Generation) -> Self {
        Self {
            prefix: node.prefix().into(),
            pattern: node.pattern().unwrap_or_default(),
            mode: node.mode().unwrap_or_default(),
            exec_target: node.exec_target(),
            span: node.text_range().into(),
            generation,
        }
    }

    pub fn prefix(&self) -> RulePrefix {
        self.prefix
    }

    /// Path glob, without surrounding quotes
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn exec_target(&self) -> Option<&str> {
        self.exec_target.as_deref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl RuleHandle for FileRule {
    fn span(&self) -> RuleSpan {
        self.span
    }
}

impl fmt::Display for FileRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.prefix.is_empty() {
            write!(f, "{} ", self.prefix)?;
        }
        if self.pattern.contains(char::is_whitespace) {
            write!(f, "\"{}\" {}", self.pattern, self.mode)?;
        } else {
            write!(f, "{} {}", self.pattern, self.mode)?;
        }
        if let Some(target) = &self.exec_target {
            write!(f, " -> {target}")?;
        }
        f.write_str(",")
    }
}

/// Capability rule: `[qualifiers] capability [NAME ...],`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRule {
    prefix: RulePrefix,
    capabilities: Vec<String>,
    span: RuleSpan,
    generation: Generation,
}

impl CapabilityRule {
    pub(crate) fn from_ast(node: &ast::CapabilityRule, generation: Generation) -> Self {
        Self {
            prefix: node.prefix().into(),
            capabilities: node.capabilities(),
            span: node.text_range().into(),
            generation,
        }
    }

    pub fn prefix(&self) -> RulePrefix {
        self.prefix
    }

    /// Capability names; empty for a bare `capability,` rule
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}

impl RuleHandle for CapabilityRule {
    fn span(&self) -> RuleSpan {
        self.span
    }
}

impl fmt::Display for CapabilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.prefix.is_empty() {
            write!(f, "{} ", self.prefix)?;
        }
        f.write_str("capability")?;
        for name in &self.capabilities {
            write!(f, " {name}")?;
        }
        f.write_str(",")
    }
}

/// Any rule in a profile body, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    File(FileRule),
    Capability(CapabilityRule),
}

impl Rule {
    pub(crate) fn from_ast(node: &ast::Rule, generation: Generation) -> Self {
        match node {
            ast::Rule::File(rule) => Rule::File(FileRule::from_ast(rule, generation)),
            ast::Rule::Capability(rule) => {
                Rule::Capability(CapabilityRule::from_ast(rule, generation))
            }
        }
    }

    pub fn prefix(&self) -> RulePrefix {
        match self {
            Rule::File(rule) => rule.prefix(),
            Rule::Capability(rule) => rule.prefix(),
        }
    }

    pub fn generation(&self) -> Generation {
        match self {
            Rule::File(rule) => rule.generation(),
            Rule::Capability(rule) => rule.generation(),
        }
    }

    pub fn as_file(&self) -> Option<&FileRule> {
        match self {
            Rule::File(rule) => Some(rule),
            Rule::Capability(_) => None,
        }
    }

    pub fn as_capability(&self) -> Option<&CapabilityRule> {
        match self {
            Rule::Capability(rule) => Some(rule),
            Rule::File(_) => None,
        }
    }
}

impl RuleHandle for Rule {
    fn span(&self) -> RuleSpan {
        match self {
            Rule::File(rule) => rule.span(),
            Rule::Capability(rule) => rule.span(),
        }
    }
}

impl PartialEq<FileRule> for Rule {
    fn eq(&self, other: &FileRule) -> bool {
        self.as_file() == Some(other)
    }
}

impl PartialEq<CapabilityRule> for Rule {
    fn eq(&self, other: &CapabilityRule) -> bool {
        self.as_capability() == Some(other)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::File(rule) => fmt::Display::fmt(rule, f),
            Rule::Capability(rule) => fmt::Display::fmt(rule, f),
        }
    }
}
