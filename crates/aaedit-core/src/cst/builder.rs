//! Green tree construction helpers

use rowan::{GreenNodeBuilder, Language};

use super::{AaLanguage, AaSyntaxKind, AaSyntaxNode, CstToken};

/// Thin wrapper over Rowan's `GreenNodeBuilder` speaking [`AaSyntaxKind`]
pub struct CstBuilder {
    builder: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: AaSyntaxKind) {
        self.builder.start_node(AaLanguage::kind_to_raw(kind));
    }

    pub fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub fn token(&mut self, kind: AaSyntaxKind, text: &str) {
        self.builder.token(AaLanguage::kind_to_raw(kind), text);
    }

    /// Add a lexed token verbatim
    pub fn add_token(&mut self, token: &CstToken) {
        self.token(token.kind, &token.text);
    }

    pub fn finish(self) -> AaSyntaxNode {
        AaSyntaxNode::new_root(self.builder.finish())
    }
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
