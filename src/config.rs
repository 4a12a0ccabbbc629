use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::store::DEFAULT_LABELS;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Reference label set offered when tagging tasks
    pub available_labels: Vec<String>,
    /// Colorize terminal output
    pub color: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            available_labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
            color: true,
        }
    }
}

impl BoardConfig {
    /// Loads the config from an explicit path, falling back to the user config
    /// directory and finally to the defaults.
    ///
    /// An explicit path must exist. The default location is optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<BoardConfig, ConfigError> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(BoardConfig::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<BoardConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), "loaded config");

        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskboard").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_full_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"availableLabels": ["Infra", "Docs"], "color": false}"#).unwrap();

        let config = BoardConfig::load(Some(path.as_path())).unwrap();

        assert_eq!(config.available_labels, vec!["Infra", "Docs"]);
        assert!(!config.color);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"color": false}"#).unwrap();

        let config = BoardConfig::from_file(&path).unwrap();

        assert_eq!(config.available_labels, vec!["Backend", "Server", "Front-end"]);
        assert!(!config.color);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.json");

        match BoardConfig::load(Some(path.as_path())) {
            Err(ConfigError::ReadFailed { .. }) => {}
            _ => panic!("Expected ReadFailed error"),
        }
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json }").unwrap();

        match BoardConfig::from_file(&path) {
            Err(ConfigError::ParseFailed { .. }) => {}
            _ => panic!("Expected ParseFailed error"),
        }
    }
}
