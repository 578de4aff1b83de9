use std::fmt;

use crate::cst::ast;

/// Qualifiers in front of a rule, compared by value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RulePrefix {
    pub audit: bool,
    pub deny: bool,
    pub owner: bool,
}

impl RulePrefix {
    pub fn new(audit: bool, deny: bool, owner: bool) -> Self {
        Self { audit, deny, owner }
    }

    pub fn is_empty(&self) -> bool {
        !(self.audit || self.deny || self.owner)
    }
}

impl From<Option<ast::RulePrefix>> for RulePrefix {
    fn from(node: Option<ast::RulePrefix>) -> Self {
        match node {
            Some(node) => Self::new(node.audit(), node.deny(), node.owner()),
            None => Self::default(),
        }
    }
}

/// Renders as the qualifier keywords in canonical order, space separated
impl fmt::Display for RulePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = [
            (self.audit, "audit"),
            (self.deny, "deny"),
            (self.owner, "owner"),
        ];
        let mut first = true;
        for (_, word) in words.iter().filter(|(set, _)| *set) {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(word)?;
            first = false;
        }
        Ok(())
    }
}
