//! Editor settings loaded from `.aaedit.toml`

use serde::Deserialize;
use std::path::Path;

use crate::{AaError, Result};

pub const DEFAULT_RULE_INDENT: &str = "  ";
pub const DEFAULT_LOG_FILTER: &str = "aaedit=info";

/// Settings that shape the text the editor emits
///
/// ```toml
/// rule-indent = "\t"
/// log-filter = "aaedit=debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Leading whitespace of rules appended with `add_rule`
    pub rule_indent: String,

    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            rule_indent: DEFAULT_RULE_INDENT.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| AaError::ConfigError {
            message: format!("Failed to parse TOML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AaError::io_error(path, e))?;
        Self::from_toml_str(&content)
    }

    /// The indent must be horizontal whitespace, or rules stop lining up
    /// with the line-oriented rule spans.
    pub fn validate(&self) -> Result<()> {
        if !self.rule_indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(AaError::config_error(format!(
                "rule-indent must only contain spaces or tabs, got {:?}",
                self.rule_indent
            )));
        }
        Ok(())
    }
}
