//! Error types and handling for profile parsing and editing

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::ParseError;

/// Main error type for profile parsing and editing operations
#[derive(Debug, Error)]
pub enum AaError {
    /// The grammar adapter rejected the document text
    #[error("error occurred when parsing profile source '{}' ({} diagnostic(s))", path.display(), diagnostics.len())]
    ParseFailure {
        path: PathBuf,
        diagnostics: Vec<ParseError>,
        #[source]
        source: Option<Box<ParseError>>,
    },

    /// A profile handle that is not part of the current parse generation
    #[error(
        "invalid profile \"{profile}\" was given as argument; it does not exist in this document. \
         Was it obtained from a different or outdated document?"
    )]
    InvalidProfile { profile: String },

    /// A rule handle that is not part of the profile's current rules
    #[error(
        "invalid rule at bytes {start}..{end} was given for profile \"{profile}\"; \
         it does not exist in the current version of that profile"
    )]
    InvalidRule {
        profile: String,
        start: usize,
        end: usize,
    },

    /// A previous reparse failed, so the tree no longer describes the text
    #[error(
        "document '{}' is out of sync with its parse tree after a failed reparse; reload it first",
        path.display()
    )]
    Inconsistent { path: PathBuf },

    /// A splice offset outside the text or off a character boundary
    #[error("Splice error: {message}")]
    SpliceError { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure writing the document to a caller-supplied sink
    #[error("failed to write document to output: {source}")]
    OutputError {
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    StaleHandle,
    Inconsistent,
    Splice,
    Config,
    Io,
}

impl AaError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AaError::ParseFailure { .. } => ErrorKind::Parse,
            AaError::InvalidProfile { .. } => ErrorKind::StaleHandle,
            AaError::InvalidRule { .. } => ErrorKind::StaleHandle,
            AaError::Inconsistent { .. } => ErrorKind::Inconsistent,
            AaError::SpliceError { .. } => ErrorKind::Splice,
            AaError::ConfigError { .. } => ErrorKind::Config,
            AaError::IoError { .. } => ErrorKind::Io,
            AaError::OutputError { .. } => ErrorKind::Io,
        }
    }

    /// Whether the caller can retry on the same document instance.
    ///
    /// Stale handles are fixed by re-fetching profiles; a splice error
    /// leaves the text untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::StaleHandle | ErrorKind::Splice)
    }

    /// Create a parse failure from the adapter's diagnostics
    pub fn parse_failure(path: impl Into<PathBuf>, diagnostics: Vec<ParseError>) -> Self {
        let source = diagnostics.first().cloned().map(Box::new);
        Self::ParseFailure {
            path: path.into(),
            diagnostics,
            source,
        }
    }

    pub fn invalid_profile(profile: impl Into<String>) -> Self {
        Self::InvalidProfile {
            profile: profile.into(),
        }
    }

    pub fn invalid_rule(profile: impl Into<String>, start: usize, end: usize) -> Self {
        Self::InvalidRule {
            profile: profile.into(),
            start,
            end,
        }
    }

    pub fn inconsistent(path: impl Into<PathBuf>) -> Self {
        Self::Inconsistent { path: path.into() }
    }

    pub fn splice_error(message: impl Into<String>) -> Self {
        Self::SpliceError {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn output_error(source: std::io::Error) -> Self {
        Self::OutputError { source }
    }

    /// Diagnostics carried by a parse failure, empty for other kinds
    pub fn diagnostics(&self) -> &[ParseError] {
        match self {
            AaError::ParseFailure { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseErrorKind;
    use std::error::Error as _;

    #[test]
    fn test_parse_failure_chains_first_diagnostic() {
        let diagnostic = ParseError {
            message: "expected access mode, found ','".to_string(),
            line: 2,
            column: 12,
            offset: 17,
            length: 1,
            span: 17..18,
            kind: ParseErrorKind::Parser,
        };
        let err = AaError::parse_failure("/etc/apparmor.d/usr.bin.foo", vec![diagnostic.clone()]);

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(!err.is_recoverable());
        assert_eq!(err.diagnostics(), &[diagnostic]);
        let cause = err.source().expect("nested cause");
        assert_eq!(
            cause.to_string(),
            "expected access mode, found ',' at line 2, column 12"
        );
    }

    #[test]
    fn test_invalid_profile_names_profile() {
        let err = AaError::invalid_profile("/usr/bin/foo");
        assert_eq!(err.kind(), ErrorKind::StaleHandle);
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("\"/usr/bin/foo\""));
    }

    #[test]
    fn test_invalid_rule_is_stale_handle() {
        let err = AaError::invalid_rule("/**", 6, 37);
        assert_eq!(err.kind(), ErrorKind::StaleHandle);
        assert!(err.to_string().contains("6..37"));
    }
}
