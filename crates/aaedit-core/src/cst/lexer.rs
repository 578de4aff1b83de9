//! CST-aware lexer that preserves all trivia (whitespace, comments)
//!
//! Every byte of the input ends up in exactly one token, so concatenating
//! token texts reproduces the source. That property is what lets the
//! editing engine splice the original text and trust the recorded offsets.

use crate::cst::AaSyntaxKind;
use std::ops::Range;

/// Simple span representing a byte range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: AaSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: AaSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex profile source preserving ALL trivia for CST construction
///
/// - Horizontal whitespace runs become `Whitespace` tokens
/// - `\n` and `\r\n` become `Newline` tokens
/// - `#` comments become `Comment` tokens, except `#include`
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let len = input.len();
    let mut i = 0usize;

    while i < len {
        let Some((current, size)) = next_char(input, i) else {
            break;
        };
        let start = i;

        let (kind, end) = match current {
            '\n' => (AaSyntaxKind::Newline, i + size),
            '\r' => {
                let mut end = i + size;
                if let Some(('\n', nl_size)) = next_char(input, end) {
                    end += nl_size;
                }
                (AaSyntaxKind::Newline, end)
            }

            c if is_horizontal_whitespace(c) => {
                let mut end = i + size;
                while let Some((next, step)) = next_char(input, end) {
                    if !is_horizontal_whitespace(next) {
                        break;
                    }
                    end += step;
                }
                (AaSyntaxKind::Whitespace, end)
            }

            '#' => {
                if let Some(end) = lex_hash_include(input, start) {
                    (AaSyntaxKind::IncludeKw, end)
                } else {
                    (AaSyntaxKind::Comment, line_end(input, start))
                }
            }

            '{' => (AaSyntaxKind::LBrace, i + size),
            '}' => (AaSyntaxKind::RBrace, i + size),
            '(' => (AaSyntaxKind::LParen, i + size),
            ')' => (AaSyntaxKind::RParen, i + size),
            ',' => (AaSyntaxKind::Comma, i + size),
            '=' => (AaSyntaxKind::Equals, i + size),
            '-' if input[i + size..].starts_with('>') => (AaSyntaxKind::Arrow, i + size + 1),

            '"' => {
                let (end, error) = lex_string(input, start);
                if let Some(err) = error {
                    errors.push(err);
                }
                (AaSyntaxKind::String, end)
            }

            '<' => {
                let (end, error) = lex_include_path(input, start);
                if let Some(err) = error {
                    errors.push(err);
                }
                (AaSyntaxKind::IncludePath, end)
            }

            '/' | '@' => (AaSyntaxKind::Path, lex_path(input, start)),

            c if is_word_char(c) => {
                let end = read_word(input, start);
                let kind =
                    AaSyntaxKind::from_keyword(&input[start..end]).unwrap_or(AaSyntaxKind::Ident);
                (kind, end)
            }

            other => {
                errors.push(LexerError::new(
                    format!("Unexpected character '{other}'"),
                    span(start, i + size),
                ));
                (AaSyntaxKind::Unknown, i + size)
            }
        };

        tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
        i = end;
    }

    (tokens, errors)
}

/// Recognize `#include` so it is not swallowed as a comment.
///
/// Returns the end offset of the `#include` keyword.
fn lex_hash_include(input: &str, start: usize) -> Option<usize> {
    let rest = &input[start + 1..];
    if !rest.starts_with("include") {
        return None;
    }
    let end = start + 1 + "include".len();
    match next_char(input, end) {
        None => Some(end),
        Some((c, _)) if is_horizontal_whitespace(c) || c == '<' || c == '"' => Some(end),
        Some(_) => None,
    }
}

/// Lex a path pattern starting with `/` or `@`.
///
/// Brace alternations (`/etc/{passwd,group}`) and variables (`@{HOME}`)
/// may contain commas; only a comma outside braces terminates the path.
fn lex_path(input: &str, start: usize) -> usize {
    let mut depth = 0usize;
    let mut end = start;

    for (offset, ch) in input[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' if depth > 0 => depth -= 1,
            '}' => break,
            ',' if depth == 0 => break,
            c if c.is_whitespace() => break,
            _ => {}
        }
        end = start + offset + ch.len_utf8();
    }

    end
}

/// Lex a quoted string "..."
fn lex_string(input: &str, start: usize) -> (usize, Option<LexerError>) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = start + 1; // Skip opening quote

    while i < len {
        match bytes[i] {
            b'"' => return (i + 1, None),
            b'\n' => break,
            b'\\' => {
                i += 1;
                if i < len && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    let end = line_end(input, start);
    (
        end,
        Some(LexerError::new("Unterminated string", span(start, end))),
    )
}

/// Lex an angle-bracket include path `<abstractions/base>`
fn lex_include_path(input: &str, start: usize) -> (usize, Option<LexerError>) {
    let line = line_end(input, start);
    match input[start..line].find('>') {
        Some(close) => (start + close + 1, None),
        None => (
            line,
            Some(LexerError::new("Unterminated include path", span(start, line))),
        ),
    }
}

fn read_word(input: &str, start: usize) -> usize {
    let mut end = start;
    for (offset, ch) in input[start..].char_indices() {
        if is_word_char(ch) {
            end = start + offset + ch.len_utf8();
        } else {
            break;
        }
    }
    end
}

fn is_word_char(ch: char) -> bool {
    matches!(ch, '_' | '-' | '.' | '+' | ':' | '*' | '?' | '^')
        || ch.is_ascii_alphanumeric()
        || (!ch.is_ascii() && ch.is_alphanumeric())
}

fn is_horizontal_whitespace(ch: char) -> bool {
    ch.is_whitespace() && ch != '\n' && ch != '\r'
}

/// Offset of the next line break (or end of input), not including it
fn line_end(input: &str, start: usize) -> usize {
    input[start..]
        .find(['\n', '\r'])
        .map(|offset| start + offset)
        .unwrap_or(input.len())
}

/// Get next character and its UTF-8 size
fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

/// Create a span from start to end
fn span(start: usize, end: usize) -> CstSpan {
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<AaSyntaxKind> {
        lex_with_trivia(input).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_preserves_whitespace() {
        let input = "/**  {";
        let (tokens, errors) = lex_with_trivia(input);

        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, AaSyntaxKind::Path);
        assert_eq!(tokens[1].kind, AaSyntaxKind::Whitespace);
        assert_eq!(tokens[1].text, "  ");
        assert_eq!(tokens[2].kind, AaSyntaxKind::LBrace);
    }

    #[test]
    fn test_lossless_reconstruction() {
        let input = "#include <tunables/global>\n# a comment\r\n/** {\n\taudit deny /etc/{passwd,group} r, # trailing\n}\n";
        let (tokens, errors) = lex_with_trivia(input);

        assert!(errors.is_empty(), "{errors:?}");
        let reconstructed: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(reconstructed, input);
    }

    #[test]
    fn test_rule_tokens() {
        assert_eq!(
            kinds("owner /var/log/messages www,"),
            vec![
                AaSyntaxKind::OwnerKw,
                AaSyntaxKind::Whitespace,
                AaSyntaxKind::Path,
                AaSyntaxKind::Whitespace,
                AaSyntaxKind::Ident,
                AaSyntaxKind::Comma,
            ]
        );
    }

    #[test]
    fn test_path_keeps_alternation_commas() {
        let (tokens, _) = lex_with_trivia("/etc/{passwd,group} r,");
        assert_eq!(tokens[0].kind, AaSyntaxKind::Path);
        assert_eq!(tokens[0].text, "/etc/{passwd,group}");
    }

    #[test]
    fn test_variable_path() {
        let (tokens, _) = lex_with_trivia("@{HOME}/.cache/** rw,");
        assert_eq!(tokens[0].kind, AaSyntaxKind::Path);
        assert_eq!(tokens[0].text, "@{HOME}/.cache/**");
    }

    #[test]
    fn test_path_stops_at_closing_brace() {
        assert_eq!(
            kinds("/a r,}"),
            vec![
                AaSyntaxKind::Path,
                AaSyntaxKind::Whitespace,
                AaSyntaxKind::Ident,
                AaSyntaxKind::Comma,
                AaSyntaxKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_hash_include_vs_comment() {
        assert_eq!(
            kinds("#include <abstractions/base>"),
            vec![
                AaSyntaxKind::IncludeKw,
                AaSyntaxKind::Whitespace,
                AaSyntaxKind::IncludePath,
            ]
        );
        assert_eq!(kinds("#includes are great"), vec![AaSyntaxKind::Comment]);
        assert_eq!(kinds("include \"local\""), vec![
            AaSyntaxKind::IncludeKw,
            AaSyntaxKind::Whitespace,
            AaSyntaxKind::String,
        ]);
    }

    #[test]
    fn test_arrow_and_flags() {
        assert_eq!(
            kinds("flags=(complain) Px -> child"),
            vec![
                AaSyntaxKind::FlagsKw,
                AaSyntaxKind::Equals,
                AaSyntaxKind::LParen,
                AaSyntaxKind::Ident,
                AaSyntaxKind::RParen,
                AaSyntaxKind::Whitespace,
                AaSyntaxKind::Ident,
                AaSyntaxKind::Whitespace,
                AaSyntaxKind::Arrow,
                AaSyntaxKind::Whitespace,
                AaSyntaxKind::Ident,
            ]
        );
    }

    #[test]
    fn test_crlf_is_single_newline() {
        let (tokens, _) = lex_with_trivia("a\r\nb");
        assert_eq!(tokens[1].kind, AaSyntaxKind::Newline);
        assert_eq!(tokens[1].text, "\r\n");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_unterminated_string_reports_error() {
        let (tokens, errors) = lex_with_trivia("\"/tmp/open r,\n}");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unterminated string");
        assert_eq!(tokens[0].text, "\"/tmp/open r,");
        assert_eq!(tokens[1].kind, AaSyntaxKind::Newline);
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, errors) = lex_with_trivia("/a r;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, 4..5);
        assert_eq!(tokens.last().map(|t| t.kind), Some(AaSyntaxKind::Unknown));
    }
}
