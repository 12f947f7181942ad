//! Configuration loading for shellforge.
//! Reads the user-level configuration from the per-user config directory and
//! the optional project-level configuration from the project root. Both are
//! plain key-value documents in JSON or YAML with `${VAR}` substitution,
//! loaded read-only.

use crate::constants::{CONFIG_DIR_NAME, PROJECT_CONFIG_FILES, USER_CONFIG_FILES};
use crate::envsub::resolve_env_vars;
use crate::error::{Error, Result};
use log::debug;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Resolves the user's configuration directory: `$XDG_CONFIG_HOME` if set,
/// otherwise `~/.config`, suffixed with the shellforge directory name.
pub fn user_config_dir() -> PathBuf {
    let config_home = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    config_home.join(CONFIG_DIR_NAME)
}

/// Canonical user config path, reported in error details even when a YAML
/// variant was the file actually found.
pub fn user_config_path() -> PathBuf {
    user_config_dir().join(USER_CONFIG_FILES[0])
}

fn find_existing(dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

/// Parses a configuration document, trying JSON first and falling back to
/// YAML, and requires a top-level object.
fn parse_document(content: &str, path: &Path) -> Result<Map<String, Value>> {
    let value: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(content).map_err(|e| Error::InvalidConfig {
            message: format!("invalid configuration format: {}", e),
            path: path.display().to_string(),
        })?,
    };

    match resolve_env_vars(&value) {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidConfig {
            message: "configuration must be an object".to_string(),
            path: path.display().to_string(),
        }),
    }
}

fn load_config_file(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::InvalidConfig {
        message: format!("failed to read configuration: {}", e),
        path: path.display().to_string(),
    })?;
    parse_document(&content, path)
}

/// Loads the user-level configuration.
///
/// # Returns
/// * `Ok(None)` when no user config file exists; absence is not an error
/// * `Err(Error::InvalidConfig)` when a file exists but cannot be parsed
pub fn load_user_config() -> Result<Option<Map<String, Value>>> {
    match find_existing(&user_config_dir(), &USER_CONFIG_FILES) {
        Some(path) => {
            debug!("User config loaded from {}", path.display());
            load_config_file(&path).map(Some)
        }
        None => {
            debug!("No user config found");
            Ok(None)
        }
    }
}

/// Loads the project-level configuration from the project root.
///
/// # Returns
/// * `Ok(None)` when the project has no config file; absence is not an error
/// * `Err(Error::InvalidConfig)` when a file exists but cannot be parsed
pub fn load_project_config(project_dir: &Path) -> Result<Option<Map<String, Value>>> {
    match find_existing(project_dir, &PROJECT_CONFIG_FILES) {
        Some(path) => {
            debug!("Project config loaded from {}", path.display());
            load_config_file(&path).map(Some)
        }
        None => {
            debug!("No project config found");
            Ok(None)
        }
    }
}
