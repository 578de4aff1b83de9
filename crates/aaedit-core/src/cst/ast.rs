//! Typed AST layer over CST
//!
//! Ergonomic, type-safe wrappers over the raw CST nodes. Each wrapper
//! implements `cast()` to safely convert from a CST node of the right kind.
//!
//! ```ignore
//! use aaedit_core::cst::{parse_policy, ast::{AstNode, Document}};
//!
//! let (cst, _, _) = parse_policy("/** {\n  /etc/passwd r,\n}\n");
//! let document = Document::cast(cst).unwrap();
//! let profile = document.profiles().next().unwrap();
//! assert_eq!(profile.name().unwrap(), "/**");
//! ```

use rowan::TextRange;

use super::{AaSyntaxKind, AaSyntaxNode, AaSyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: AaSyntaxKind) -> bool;
    fn cast(node: AaSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &AaSyntaxNode;

    fn text_range(&self) -> TextRange {
        self.syntax().text_range()
    }
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: AaSyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: AaSyntaxKind) -> bool {
                kind == AaSyntaxKind::$kind
            }

            fn cast(node: AaSyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &AaSyntaxNode {
                &self.syntax
            }
        }
    };
}

/// Helper function to find first child of a specific kind
fn child_of_kind(parent: &AaSyntaxNode, kind: AaSyntaxKind) -> Option<AaSyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// Direct child tokens of a node (not descending into child nodes)
fn child_tokens(parent: &AaSyntaxNode) -> impl Iterator<Item = AaSyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
}

/// Helper function to find first direct token of a specific kind
fn token_of_kind(parent: &AaSyntaxNode, kind: AaSyntaxKind) -> Option<AaSyntaxToken> {
    child_tokens(parent).find(|t| t.kind() == kind)
}

/// First direct token of any of the given kinds
fn token_of_kinds(parent: &AaSyntaxNode, kinds: &[AaSyntaxKind]) -> Option<AaSyntaxToken> {
    child_tokens(parent).find(|t| kinds.contains(&t.kind()))
}

/// Text of a name-like token, with quotes removed from string literals
fn value_text(token: &AaSyntaxToken) -> String {
    let text = token.text();
    if token.kind() == AaSyntaxKind::String
        && text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
    {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}

const NAME_KINDS: &[AaSyntaxKind] = &[
    AaSyntaxKind::Ident,
    AaSyntaxKind::Path,
    AaSyntaxKind::String,
];

// ============================================================================
// Document
// ============================================================================

ast_node!(
    /// Root document containing profiles and top-level includes
    Document,
    Document
);

impl Document {
    pub fn profiles(&self) -> impl Iterator<Item = Profile> {
        self.syntax.children().filter_map(Profile::cast)
    }

    pub fn includes(&self) -> impl Iterator<Item = Include> {
        self.syntax.children().filter_map(Include::cast)
    }
}

// ============================================================================
// Profile
// ============================================================================

ast_node!(
    /// Profile block: `[profile NAME] [ATTACHMENT] [flags=(...)] { ... }`
    Profile,
    Profile
);

impl Profile {
    /// Profile name; for the unnamed form this is the attachment path
    pub fn name(&self) -> Option<String> {
        child_of_kind(&self.syntax, AaSyntaxKind::ProfileName)
            .and_then(|node| token_of_kinds(&node, NAME_KINDS))
            .map(|token| value_text(&token))
    }

    /// Attachment path of a `profile NAME ATTACHMENT` header
    pub fn attachment(&self) -> Option<String> {
        child_of_kind(&self.syntax, AaSyntaxKind::Attachment)
            .and_then(|node| token_of_kinds(&node, NAME_KINDS))
            .map(|token| value_text(&token))
    }

    /// Flags from the `flags=(...)` clause, in source order
    pub fn flags(&self) -> Vec<String> {
        child_of_kind(&self.syntax, AaSyntaxKind::FlagsClause)
            .map(|node| {
                child_tokens(&node)
                    .filter(|t| t.kind() == AaSyntaxKind::Ident || t.kind().is_keyword())
                    .map(|t| t.text().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn includes(&self) -> impl Iterator<Item = Include> {
        self.syntax.children().filter_map(Include::cast)
    }

    /// All rules in the profile, in source order
    pub fn rules(&self) -> impl Iterator<Item = Rule> {
        self.syntax.children().filter_map(Rule::cast)
    }

    /// The closing `}` of the profile body
    pub fn r_brace(&self) -> Option<AaSyntaxToken> {
        token_of_kind(&self.syntax, AaSyntaxKind::RBrace)
    }
}

// ============================================================================
// Include
// ============================================================================

ast_node!(
    /// `#include <path>` or `include "path"`
    Include,
    Include
);

impl Include {
    /// Included path without its `<>` or `""` delimiters
    pub fn path(&self) -> Option<String> {
        token_of_kinds(
            &self.syntax,
            &[AaSyntaxKind::IncludePath, AaSyntaxKind::String],
        )
        .map(|token| {
            let text = token.text();
            text.trim_start_matches(['<', '"'])
                .trim_end_matches(['>', '"'])
                .to_string()
        })
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Any rule inside a profile body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    File(FileRule),
    Capability(CapabilityRule),
}

impl AstNode for Rule {
    fn can_cast(kind: AaSyntaxKind) -> bool {
        FileRule::can_cast(kind) || CapabilityRule::can_cast(kind)
    }

    fn cast(node: AaSyntaxNode) -> Option<Self> {
        match node.kind() {
            AaSyntaxKind::FileRule => FileRule::cast(node).map(Rule::File),
            AaSyntaxKind::CapabilityRule => CapabilityRule::cast(node).map(Rule::Capability),
            _ => None,
        }
    }

    fn syntax(&self) -> &AaSyntaxNode {
        match self {
            Rule::File(rule) => rule.syntax(),
            Rule::Capability(rule) => rule.syntax(),
        }
    }
}

ast_node!(
    /// Qualifiers in front of a rule: `audit`, `deny`, `owner`
    RulePrefix,
    RulePrefix
);

impl RulePrefix {
    pub fn audit(&self) -> bool {
        token_of_kind(&self.syntax, AaSyntaxKind::AuditKw).is_some()
    }

    pub fn deny(&self) -> bool {
        token_of_kind(&self.syntax, AaSyntaxKind::DenyKw).is_some()
    }

    pub fn owner(&self) -> bool {
        token_of_kind(&self.syntax, AaSyntaxKind::OwnerKw).is_some()
    }
}

ast_node!(
    /// File access rule: `[qualifiers] [file] PATTERN MODE [-> TARGET],`
    FileRule,
    FileRule
);

impl FileRule {
    pub fn prefix(&self) -> Option<RulePrefix> {
        child_of_kind(&self.syntax, AaSyntaxKind::RulePrefix).and_then(RulePrefix::cast)
    }

    /// Path glob, unquoted
    pub fn pattern(&self) -> Option<String> {
        token_of_kinds(&self.syntax, &[AaSyntaxKind::Path, AaSyntaxKind::String])
            .map(|token| value_text(&token))
    }

    pub fn mode(&self) -> Option<String> {
        token_of_kind(&self.syntax, AaSyntaxKind::Ident).map(|t| t.text().to_string())
    }

    /// Transition target after `->`
    pub fn exec_target(&self) -> Option<String> {
        child_of_kind(&self.syntax, AaSyntaxKind::ExecTarget)
            .and_then(|node| token_of_kinds(&node, NAME_KINDS))
            .map(|token| value_text(&token))
    }
}

ast_node!(
    /// Capability rule: `[qualifiers] capability [NAME ...],`
    CapabilityRule,
    CapabilityRule
);

impl CapabilityRule {
    pub fn prefix(&self) -> Option<RulePrefix> {
        child_of_kind(&self.syntax, AaSyntaxKind::RulePrefix).and_then(RulePrefix::cast)
    }

    pub fn capabilities(&self) -> Vec<String> {
        child_tokens(&self.syntax)
            .filter(|t| t.kind() == AaSyntaxKind::Ident)
            .map(|t| t.text().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_policy;

    fn document(source: &str) -> Document {
        let (cst, _, errors) = parse_policy(source);
        assert!(errors.is_empty(), "Parse errors: {errors:?}");
        Document::cast(cst).expect("root is a document")
    }

    #[test]
    fn test_unnamed_profile_name() {
        let doc = document("/usr/bin/foo {\n}\n");
        let profile = doc.profiles().next().unwrap();
        assert_eq!(profile.name().as_deref(), Some("/usr/bin/foo"));
        assert_eq!(profile.attachment(), None);
        assert!(profile.flags().is_empty());
        assert_eq!(profile.rules().count(), 0);
    }

    #[test]
    fn test_named_profile_with_attachment_and_flags() {
        let doc = document("profile foo \"/opt/my app\" flags=(complain,audit) {\n}\n");
        let profile = doc.profiles().next().unwrap();
        assert_eq!(profile.name().as_deref(), Some("foo"));
        assert_eq!(profile.attachment().as_deref(), Some("/opt/my app"));
        assert_eq!(profile.flags(), vec!["complain", "audit"]);
    }

    #[test]
    fn test_file_rule_accessors() {
        let doc = document("/** {\n  deny owner /home/*/.ssh/** rw -> sshd,\n}\n");
        let profile = doc.profiles().next().unwrap();
        let Some(Rule::File(rule)) = profile.rules().next() else {
            panic!("expected a file rule");
        };

        let prefix = rule.prefix().unwrap();
        assert!(!prefix.audit());
        assert!(prefix.deny());
        assert!(prefix.owner());
        assert_eq!(rule.pattern().as_deref(), Some("/home/*/.ssh/**"));
        assert_eq!(rule.mode().as_deref(), Some("rw"));
        assert_eq!(rule.exec_target().as_deref(), Some("sshd"));
    }

    #[test]
    fn test_capability_rule_accessors() {
        let doc = document("/** {\n  audit capability chown dac_override,\n}\n");
        let profile = doc.profiles().next().unwrap();
        let Some(Rule::Capability(rule)) = profile.rules().next() else {
            panic!("expected a capability rule");
        };
        assert!(rule.prefix().unwrap().audit());
        assert_eq!(rule.capabilities(), vec!["chown", "dac_override"]);
    }

    #[test]
    fn test_includes() {
        let doc = document("#include <tunables/global>\n/** {\n  include \"local/foo\"\n}\n");
        let top: Vec<_> = doc.includes().filter_map(|i| i.path()).collect();
        assert_eq!(top, vec!["tunables/global"]);

        let profile = doc.profiles().next().unwrap();
        let inner: Vec<_> = profile.includes().filter_map(|i| i.path()).collect();
        assert_eq!(inner, vec!["local/foo"]);
    }

    #[test]
    fn test_r_brace_offset() {
        let source = "/** {\n}\n";
        let doc = document(source);
        let profile = doc.profiles().next().unwrap();
        let brace = profile.r_brace().unwrap();
        assert_eq!(usize::from(brace.text_range().start()), 6);
    }
}
