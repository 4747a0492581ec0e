//! Configuration file loading and parsing.
//!
//! # Configuration File Locations
//!
//! 1. Path given as the `CONFIG_FILE` argument (must exist)
//! 2. Default location, used only if present:
//!    - **Linux/macOS:** `~/.tomba-mcp/config.json`
//!    - **Windows:** `%USERPROFILE%\.tomba-mcp\config.json`
//!
//! Without a file every setting takes its default and the server starts
//! without credentials unless they come from the command line or the
//! environment.

mod settings;

pub use settings::{ApiConfig, Config, CredentialsConfig, HttpSettings, LoggingConfig};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.tomba-mcp/`
/// - **Windows:** `%USERPROFILE%\.tomba-mcp\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".tomba-mcp"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and parses the configuration file.
///
/// An explicit `path` must exist. With `None`, the default location is
/// used when a file is there and defaults are returned otherwise.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit configuration file cannot be found
/// - The file cannot be read
/// - The JSON is malformed or has unknown fields
/// - A setting is invalid
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound {
                    path: p.to_path_buf(),
                });
            }
            p.to_path_buf()
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(p) => p,
            None => {
                tracing::debug!("No configuration file, using defaults");
                return Ok(Config::default());
            }
        },
    };

    load_file(&config_path)
}

fn load_file(config_path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    config.validate()?;

    Ok(config)
}
