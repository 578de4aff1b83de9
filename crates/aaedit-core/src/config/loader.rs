//! Configuration file discovery and loading

use super::EditorConfig;
use crate::{AaError, Result};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".aaedit.toml";

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover `.aaedit.toml` by walking upward from `start_path`
    /// until a file is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path.canonicalize().map_err(|e| AaError::ConfigError {
            message: format!("Invalid path '{}': {e}", start_path.display()),
        })?;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                tracing::debug!("Found config: {}", config_path.display());
                return Ok(Some(config_path));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<EditorConfig> {
        EditorConfig::load(path).map_err(|e| AaError::ConfigError {
            message: format!("Failed to load config from '{}': {}", path.display(), e),
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, the search starts at
    /// `start_dir` (or the current directory) and falls back to defaults
    /// when no config file is found.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<EditorConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(AaError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No {CONFIG_FILE_NAME} found, using defaults");
                Ok(EditorConfig::default())
            }
        }
    }
}
