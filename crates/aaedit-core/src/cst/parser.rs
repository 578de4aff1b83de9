//! Hierarchical parser for AppArmor profile sources
//!
//! Builds a lossless CST from the trivia-preserving token stream. The tree
//! always covers the whole input (`cst.text() == source`), even when the
//! input is malformed: unexpected tokens are wrapped in `Error` nodes and
//! reported as [`SyntaxError`]s.
//!
//! Rule nodes are shaped for line-oriented editing. A rule that starts a
//! line owns that line's indentation, and when nothing but horizontal
//! whitespace follows it, that whitespace and the line break too. Deleting
//! such a rule node's range deletes the whole line.

use super::lexer::{CstSpan, LexerError};
use super::{AaSyntaxKind, AaSyntaxNode, CstBuilder, CstToken};

/// A structural error found while building the CST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub span: CstSpan,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A required token was absent
    MissingToken,
    /// A token appeared where nothing could start
    UnexpectedToken,
    /// Input ended inside a profile body
    UnclosedProfile,
}

/// Parse profile source into a hierarchical CST
///
/// ```rust,ignore
/// use aaedit_core::cst::parse_policy;
///
/// let source = "/** {\n  /usr/X11R6/lib/lib*so* rrr,\n}\n";
/// let (cst, lexer_errors, errors) = parse_policy(source);
/// assert!(lexer_errors.is_empty() && errors.is_empty());
/// assert_eq!(cst.text().to_string(), source);
/// ```
pub fn parse_policy(source: &str) -> (AaSyntaxNode, Vec<LexerError>, Vec<SyntaxError>) {
    let (tokens, lexer_errors) = super::lex_with_trivia(source);
    let mut parser = Parser::new(&tokens, source.len());
    parser.parse_document();
    let (cst, errors) = parser.finish();
    (cst, lexer_errors, errors)
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    source_len: usize,
    builder: CstBuilder,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken], source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            source_len,
            builder: CstBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (AaSyntaxNode, Vec<SyntaxError>) {
        (self.builder.finish(), self.errors)
    }

    /// Parse the top-level document
    fn parse_document(&mut self) {
        self.builder.start_node(AaSyntaxKind::Document);

        while !self.at_end() {
            match self.current_kind() {
                AaSyntaxKind::Whitespace | AaSyntaxKind::Comment | AaSyntaxKind::Newline => {
                    self.bump()
                }
                AaSyntaxKind::IncludeKw => self.parse_include(),
                AaSyntaxKind::ProfileKw | AaSyntaxKind::Path | AaSyntaxKind::String => {
                    self.parse_profile()
                }
                _ => self.error_and_recover("expected a profile or include directive"),
            }
        }

        self.builder.finish_node(); // DOCUMENT
    }

    /// Grammar: (`#include` | `include`) (<path> | "path")
    fn parse_include(&mut self) {
        self.builder.start_node(AaSyntaxKind::Include);
        self.bump(); // include keyword
        self.consume_trivia();
        self.expect_one_of(
            &[AaSyntaxKind::IncludePath, AaSyntaxKind::String],
            "include path",
        );
        self.builder.finish_node();
    }

    /// Grammar: [profile NAME] [ATTACHMENT] [flags=(...)] `{` body `}`
    fn parse_profile(&mut self) {
        self.builder.start_node(AaSyntaxKind::Profile);

        if self.at(AaSyntaxKind::ProfileKw) {
            self.bump();
            self.consume_trivia();

            self.builder.start_node(AaSyntaxKind::ProfileName);
            self.expect_one_of(
                &[AaSyntaxKind::Ident, AaSyntaxKind::Path, AaSyntaxKind::String],
                "profile name",
            );
            self.builder.finish_node();
            self.consume_trivia();

            if self.at(AaSyntaxKind::Path) || self.at(AaSyntaxKind::String) {
                self.builder.start_node(AaSyntaxKind::Attachment);
                self.bump();
                self.builder.finish_node();
                self.consume_trivia();
            }
        } else {
            // Unnamed form: the attachment path doubles as the name
            self.builder.start_node(AaSyntaxKind::ProfileName);
            self.bump();
            self.builder.finish_node();
            self.consume_trivia();
        }

        if self.at(AaSyntaxKind::FlagsKw) {
            self.parse_flags();
            self.consume_trivia();
        }
        self.consume_trivia_and_newlines();

        if !self.at(AaSyntaxKind::LBrace) {
            self.missing("'{' to open the profile body");
            self.builder.finish_node();
            return;
        }
        self.bump();

        self.parse_profile_body();

        if self.at(AaSyntaxKind::RBrace) {
            self.bump();
        } else {
            self.error_at_current(
                "expected '}' to close the profile body",
                SyntaxErrorKind::UnclosedProfile,
            );
            self.builder.token(AaSyntaxKind::Error, "");
        }

        self.builder.finish_node(); // PROFILE
    }

    /// Grammar: flags = ( IDENT [,] ... )
    fn parse_flags(&mut self) {
        self.builder.start_node(AaSyntaxKind::FlagsClause);
        self.bump(); // flags
        self.consume_trivia();
        self.expect(AaSyntaxKind::Equals, "'=' after 'flags'");
        self.consume_trivia();
        self.expect(AaSyntaxKind::LParen, "'(' to open the flag list");

        loop {
            self.consume_trivia();
            match self.current_kind() {
                AaSyntaxKind::Ident | AaSyntaxKind::Comma => self.bump(),
                kind if kind.is_keyword() && !self.at_end() => self.bump(),
                _ => break,
            }
        }

        self.expect(AaSyntaxKind::RParen, "')' to close the flag list");
        self.builder.finish_node();
    }

    fn parse_profile_body(&mut self) {
        while !self.at_end() && !self.at(AaSyntaxKind::RBrace) {
            match self.current_kind() {
                AaSyntaxKind::Newline | AaSyntaxKind::Comment => self.bump(),
                AaSyntaxKind::Whitespace => {
                    if self.at_line_start() && Self::starts_rule(self.nth_kind(1)) {
                        self.parse_rule();
                    } else {
                        self.bump();
                    }
                }
                AaSyntaxKind::IncludeKw => self.parse_include(),
                kind if Self::starts_rule(kind) => self.parse_rule(),
                _ => self.error_and_recover("expected a rule"),
            }
        }
    }

    /// Grammar:
    ///   [audit] [deny] [owner] [file] PATTERN MODE [-> TARGET] `,`
    ///   [audit] [deny] capability [NAME ...] `,`
    fn parse_rule(&mut self) {
        let kind = if self.rule_is_capability() {
            AaSyntaxKind::CapabilityRule
        } else {
            AaSyntaxKind::FileRule
        };
        self.builder.start_node(kind);

        let starts_line = self.at_line_start();
        if self.at(AaSyntaxKind::Whitespace) {
            self.bump(); // indentation
        }

        self.builder.start_node(AaSyntaxKind::RulePrefix);
        while self.current_kind().is_qualifier() {
            self.bump();
            self.consume_trivia();
        }
        self.builder.finish_node();

        if kind == AaSyntaxKind::CapabilityRule {
            self.bump(); // capability
            self.consume_trivia();
            while self.at(AaSyntaxKind::Ident) {
                self.bump();
                self.consume_trivia();
            }
        } else {
            if self.at(AaSyntaxKind::FileKw) {
                self.bump();
                self.consume_trivia();
            }
            self.expect_one_of(&[AaSyntaxKind::Path, AaSyntaxKind::String], "path pattern");
            self.consume_trivia();
            self.expect(AaSyntaxKind::Ident, "access mode");
            self.consume_trivia();

            if self.at(AaSyntaxKind::Arrow) {
                self.builder.start_node(AaSyntaxKind::ExecTarget);
                self.bump();
                self.consume_trivia();
                self.expect_one_of(
                    &[AaSyntaxKind::Ident, AaSyntaxKind::Path, AaSyntaxKind::String],
                    "exec target",
                );
                self.builder.finish_node();
                self.consume_trivia();
            }
        }

        self.expect(AaSyntaxKind::Comma, "',' to terminate the rule");
        if starts_line {
            self.consume_line_terminator();
        }

        self.builder.finish_node(); // FILE_RULE / CAPABILITY_RULE
    }

    /// Pull trailing horizontal whitespace and one line break into the
    /// current node, but only when nothing else follows on the line.
    fn consume_line_terminator(&mut self) {
        let mut idx = self.pos;
        if self.kind_at(idx) == AaSyntaxKind::Whitespace {
            idx += 1;
        }
        if self.kind_at(idx) == AaSyntaxKind::Newline {
            while self.pos <= idx {
                self.bump();
            }
        }
    }

    fn rule_is_capability(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .find(|kind| *kind != AaSyntaxKind::Whitespace && !kind.is_qualifier())
            == Some(AaSyntaxKind::CapabilityKw)
    }

    fn starts_rule(kind: AaSyntaxKind) -> bool {
        kind.is_qualifier()
            || matches!(
                kind,
                AaSyntaxKind::FileKw
                    | AaSyntaxKind::CapabilityKw
                    | AaSyntaxKind::Path
                    | AaSyntaxKind::String
            )
    }

    // Helper methods

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn kind_at(&self, idx: usize) -> AaSyntaxKind {
        self.tokens
            .get(idx)
            .map(|t| t.kind)
            .unwrap_or(AaSyntaxKind::Error)
    }

    fn current_kind(&self) -> AaSyntaxKind {
        self.kind_at(self.pos)
    }

    fn nth_kind(&self, n: usize) -> AaSyntaxKind {
        self.kind_at(self.pos + n)
    }

    fn at(&self, kind: AaSyntaxKind) -> bool {
        !self.at_end() && self.current_kind() == kind
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.kind_at(self.pos - 1) == AaSyntaxKind::Newline
    }

    fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.add_token(token);
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: AaSyntaxKind, what: &str) {
        self.expect_one_of(&[kind], what);
    }

    fn expect_one_of(&mut self, kinds: &[AaSyntaxKind], what: &str) {
        if kinds.iter().any(|kind| self.at(*kind)) {
            self.bump();
        } else {
            self.missing(what);
        }
    }

    fn missing(&mut self, what: &str) {
        let found = if self.at_end() {
            "end of input"
        } else {
            self.current_kind().describe()
        };
        self.error_at_current(
            &format!("expected {what}, found {found}"),
            SyntaxErrorKind::MissingToken,
        );
        self.builder.token(AaSyntaxKind::Error, "");
    }

    fn error_at_current(&mut self, message: &str, kind: SyntaxErrorKind) {
        let span = match self.tokens.get(self.pos) {
            Some(token) => token.span.clone(),
            None => self.source_len..self.source_len,
        };
        self.errors.push(SyntaxError {
            message: message.to_string(),
            span,
            kind,
        });
    }

    fn consume_trivia(&mut self) {
        while self.current_kind().is_trivia() && !self.at_end() {
            self.bump();
        }
    }

    fn consume_trivia_and_newlines(&mut self) {
        while !self.at_end()
            && (self.current_kind().is_trivia() || self.at(AaSyntaxKind::Newline))
        {
            self.bump();
        }
    }

    /// Wrap the offending token and the rest of its line in an `Error` node.
    /// Stops before `}` so an enclosing profile can still close.
    fn error_and_recover(&mut self, message: &str) {
        self.error_at_current(message, SyntaxErrorKind::UnexpectedToken);

        self.builder.start_node(AaSyntaxKind::Error);
        self.bump();
        while !self.at_end()
            && !self.at(AaSyntaxKind::Newline)
            && !self.at(AaSyntaxKind::RBrace)
        {
            self.bump();
        }
        self.builder.finish_node();
    }
}
