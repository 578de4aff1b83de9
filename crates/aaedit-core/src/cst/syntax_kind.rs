//! Syntax kinds for the AppArmor profile language
//!
//! Every token and node in the CST carries one of these kinds. The numeric
//! values are stable and are what Rowan stores in the green tree; see
//! [`AaLanguage`](super::AaLanguage) for the reverse mapping.

/// All token and node kinds of the profile CST
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum AaSyntaxKind {
    // Trivia (0-9)
    Whitespace = 0,
    Comment = 1,
    Newline = 2,

    // Keywords (10-99)
    ProfileKw = 10,
    AuditKw = 11,
    DenyKw = 12,
    OwnerKw = 13,
    FileKw = 14,
    CapabilityKw = 15,
    FlagsKw = 16,
    IncludeKw = 17,

    // Punctuation (100-149)
    LBrace = 100,
    RBrace = 101,
    LParen = 102,
    RParen = 103,
    Comma = 104,
    Equals = 105,
    Arrow = 106,

    // Literals & identifiers (150-199)
    Ident = 150,
    Path = 151,
    String = 152,
    IncludePath = 153,

    // Structure nodes (200-399)
    Document = 200,
    Profile = 210,
    ProfileName = 211,
    Attachment = 212,
    FlagsClause = 213,
    Include = 214,
    FileRule = 220,
    CapabilityRule = 221,
    RulePrefix = 222,
    ExecTarget = 223,

    // Special (400+)
    Error = 400,
    Unknown = 402,
}

impl AaSyntaxKind {
    /// Whitespace and comments; newlines are tracked separately because
    /// rule spans end on them.
    pub fn is_trivia(self) -> bool {
        matches!(self, AaSyntaxKind::Whitespace | AaSyntaxKind::Comment)
    }

    pub fn is_qualifier(self) -> bool {
        matches!(
            self,
            AaSyntaxKind::AuditKw | AaSyntaxKind::DenyKw | AaSyntaxKind::OwnerKw
        )
    }

    pub fn is_keyword(self) -> bool {
        (self as u16) >= 10 && (self as u16) < 100
    }

    /// Map an identifier to its keyword kind, if it is one
    pub fn from_keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "profile" => AaSyntaxKind::ProfileKw,
            "audit" => AaSyntaxKind::AuditKw,
            "deny" => AaSyntaxKind::DenyKw,
            "owner" => AaSyntaxKind::OwnerKw,
            "file" => AaSyntaxKind::FileKw,
            "capability" => AaSyntaxKind::CapabilityKw,
            "flags" => AaSyntaxKind::FlagsKw,
            "include" => AaSyntaxKind::IncludeKw,
            _ => return None,
        };
        Some(kind)
    }

    /// Short human-readable description used in diagnostics
    pub fn describe(self) -> &'static str {
        match self {
            AaSyntaxKind::Whitespace => "whitespace",
            AaSyntaxKind::Comment => "comment",
            AaSyntaxKind::Newline => "end of line",
            AaSyntaxKind::ProfileKw => "'profile'",
            AaSyntaxKind::AuditKw => "'audit'",
            AaSyntaxKind::DenyKw => "'deny'",
            AaSyntaxKind::OwnerKw => "'owner'",
            AaSyntaxKind::FileKw => "'file'",
            AaSyntaxKind::CapabilityKw => "'capability'",
            AaSyntaxKind::FlagsKw => "'flags'",
            AaSyntaxKind::IncludeKw => "include directive",
            AaSyntaxKind::LBrace => "'{'",
            AaSyntaxKind::RBrace => "'}'",
            AaSyntaxKind::LParen => "'('",
            AaSyntaxKind::RParen => "')'",
            AaSyntaxKind::Comma => "','",
            AaSyntaxKind::Equals => "'='",
            AaSyntaxKind::Arrow => "'->'",
            AaSyntaxKind::Ident => "identifier",
            AaSyntaxKind::Path => "path",
            AaSyntaxKind::String => "quoted string",
            AaSyntaxKind::IncludePath => "include path",
            AaSyntaxKind::Unknown => "unknown character",
            _ => "syntax node",
        }
    }
}

impl From<AaSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: AaSyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}
