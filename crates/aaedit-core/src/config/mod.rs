//! Editor configuration
//!
//! A single optional `.aaedit.toml` file, discovered by walking up from the
//! working directory. Every key has a default, so a missing file is not an
//! error.

mod editor_config;
mod loader;

pub use editor_config::{DEFAULT_LOG_FILTER, DEFAULT_RULE_INDENT, EditorConfig};
pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
