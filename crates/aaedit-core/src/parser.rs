use std::ops::Range;
use std::sync::Arc;

use crate::Result;
use crate::cst::AaSyntaxNode;

/// Outcome of parsing profile text.
#[derive(Debug)]
pub struct ParseResult {
    /// Original source that was parsed.
    pub source: Arc<str>,
    /// Parsed CST root node.
    pub cst: AaSyntaxNode,
    /// Combined lexer and parser errors.
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn cst(&self) -> &AaSyntaxNode {
        &self.cst
    }
}

/// Grammar adapter used by the editing engine.
///
/// Implementations must return a CST that covers the full input text, and
/// report every problem through [`ParseResult::errors`]. An `Err` is reserved
/// for failures unrelated to the input's syntax.
pub trait Parser {
    fn parse(&mut self, content: &str) -> Result<ParseResult>;
}

/// AppArmor profile parser - stateless
#[derive(Debug, Default, Clone, Copy)]
pub struct PolicyParser;

impl PolicyParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse profile text (stateless, thread-safe)
    pub fn parse_content(content: &str) -> Result<ParseResult> {
        let source: Arc<str> = Arc::from(content);

        let (cst, lex_errors, syntax_errors) = crate::cst::parse_policy(&source);

        let mut errors = Vec::with_capacity(lex_errors.len() + syntax_errors.len());
        for error in lex_errors {
            errors.push(ParseError::from_span(
                &source,
                error.message,
                error.span,
                ParseErrorKind::Lexer,
            ));
        }
        for error in syntax_errors {
            errors.push(ParseError::from_span(
                &source,
                error.message,
                error.span,
                ParseErrorKind::Parser,
            ));
        }
        errors.sort_by_key(|error| error.offset);

        Ok(ParseResult {
            source,
            cst,
            errors,
        })
    }
}

impl Parser for PolicyParser {
    fn parse(&mut self, content: &str) -> Result<ParseResult> {
        Self::parse_content(content)
    }
}

/// A single diagnostic with a 1-based line and column
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub length: usize,
    pub span: Range<usize>,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Lexer,
    Parser,
}

impl ParseError {
    fn from_span(source: &str, message: String, span: Range<usize>, kind: ParseErrorKind) -> Self {
        let (line, column) = offset_to_line_col(source, span.start);
        let length = span.end.saturating_sub(span.start);
        Self {
            message,
            line,
            column,
            offset: span.start,
            length,
            span,
            kind,
        }
    }
}

fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1usize;
    let mut column = 1usize;
    let mut current = 0usize;

    for ch in source.chars() {
        if current >= offset {
            break;
        }

        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }

        current += ch.len_utf8();
    }

    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_profile_has_no_errors() {
        let result = PolicyParser::parse_content("/** {\n  /etc/passwd r,\n}\n").unwrap();
        assert!(result.is_valid());
        assert_eq!(result.cst().text().to_string(), result.source());
    }

    #[test]
    fn test_errors_carry_line_and_column() {
        let source = "/** {\n  /usr/lib ,\n}\n";
        let result = PolicyParser::new().parse(source).unwrap();

        assert!(!result.is_valid());
        let error = &result.errors()[0];
        assert_eq!(error.kind, ParseErrorKind::Parser);
        assert_eq!((error.line, error.column), (2, 12));
        assert_eq!(error.offset, 17);
    }

    #[test]
    fn test_lexer_errors_are_included() {
        let result = PolicyParser::parse_content("/** {\n  /a r, !\n}\n").unwrap();
        assert!(
            result
                .errors()
                .iter()
                .any(|error| error.kind == ParseErrorKind::Lexer)
        );
    }

    #[test]
    fn test_offset_to_line_col() {
        let source = "ab\ncd\n";
        assert_eq!(offset_to_line_col(source, 0), (1, 1));
        assert_eq!(offset_to_line_col(source, 4), (2, 2));
        assert_eq!(offset_to_line_col(source, 6), (3, 1));
    }
}
