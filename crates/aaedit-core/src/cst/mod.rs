//! Concrete Syntax Tree (CST) for AppArmor profiles
//!
//! A lossless syntax tree built on Rowan. Every byte of the source,
//! including whitespace and comments, is preserved, so
//! `parse_policy(source).0.text() == source` always holds. The editing
//! engine relies on this: rule byte ranges read off the tree are byte
//! ranges of the original text.
//!
//! ## Architecture
//!
//! - [`lex_with_trivia`] turns text into tokens, trivia included
//! - [`parse_policy`] arranges tokens into `Document` / `Profile` /
//!   `FileRule` / `CapabilityRule` nodes, collecting [`SyntaxError`]s
//! - [`ast`] offers typed accessors over the raw nodes

mod builder;
mod language;
mod lexer;
mod nodes;
mod parser;
mod syntax_kind;

pub mod ast;

pub use builder::CstBuilder;
pub use language::AaLanguage;
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use nodes::*;
pub use parser::{SyntaxError, SyntaxErrorKind, parse_policy};
pub use syntax_kind::AaSyntaxKind;
