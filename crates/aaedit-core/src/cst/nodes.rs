//! Rowan node type aliases for the profile CST

use super::AaLanguage;

/// A node in the profile CST
pub type AaSyntaxNode = rowan::SyntaxNode<AaLanguage>;

/// A token in the profile CST
pub type AaSyntaxToken = rowan::SyntaxToken<AaLanguage>;

/// Either a node or a token
pub type AaSyntaxElement = rowan::SyntaxElement<AaLanguage>;
