//! aaedit core
//!
//! Parsing and round-trip editing of AppArmor policy profiles. Profiles are
//! parsed into a lossless syntax tree, wrapped as plain profile and rule
//! snapshots, and edited by splicing the original text, so comments and
//! formatting outside the edited rule survive untouched.

pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod document;
pub mod error;
pub mod parser;
pub mod result;
pub mod splice;
pub mod tree;

// Re-export commonly used types
pub use config::{ConfigLoader, EditorConfig};
pub use document::PolicyDocument;
pub use error::{AaError, ErrorKind};
pub use parser::{ParseError, ParseErrorKind, ParseResult, Parser, PolicyParser};
pub use result::Result;
pub use splice::TextEdit;
pub use tree::{
    CapabilityRule, FileRule, Generation, Profile, Rule, RuleHandle, RulePrefix, RuleSpan,
};

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
