//! Rowan language implementation for AppArmor profiles
//!
//! Connects [`AaSyntaxKind`] to Rowan's generic CST infrastructure.

use rowan::Language;

use super::AaSyntaxKind;

/// Zero-sized marker implementing `rowan::Language` for profile sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AaLanguage;

impl Language for AaLanguage {
    type Kind = AaSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => AaSyntaxKind::Whitespace,
            1 => AaSyntaxKind::Comment,
            2 => AaSyntaxKind::Newline,

            // Keywords
            10 => AaSyntaxKind::ProfileKw,
            11 => AaSyntaxKind::AuditKw,
            12 => AaSyntaxKind::DenyKw,
            13 => AaSyntaxKind::OwnerKw,
            14 => AaSyntaxKind::FileKw,
            15 => AaSyntaxKind::CapabilityKw,
            16 => AaSyntaxKind::FlagsKw,
            17 => AaSyntaxKind::IncludeKw,

            // Punctuation
            100 => AaSyntaxKind::LBrace,
            101 => AaSyntaxKind::RBrace,
            102 => AaSyntaxKind::LParen,
            103 => AaSyntaxKind::RParen,
            104 => AaSyntaxKind::Comma,
            105 => AaSyntaxKind::Equals,
            106 => AaSyntaxKind::Arrow,

            // Literals & identifiers
            150 => AaSyntaxKind::Ident,
            151 => AaSyntaxKind::Path,
            152 => AaSyntaxKind::String,
            153 => AaSyntaxKind::IncludePath,

            // Structure nodes
            200 => AaSyntaxKind::Document,
            210 => AaSyntaxKind::Profile,
            211 => AaSyntaxKind::ProfileName,
            212 => AaSyntaxKind::Attachment,
            213 => AaSyntaxKind::FlagsClause,
            214 => AaSyntaxKind::Include,
            220 => AaSyntaxKind::FileRule,
            221 => AaSyntaxKind::CapabilityRule,
            222 => AaSyntaxKind::RulePrefix,
            223 => AaSyntaxKind::ExecTarget,

            400 => AaSyntaxKind::Error,
            _ => AaSyntaxKind::Unknown,
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}
