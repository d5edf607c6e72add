//! Application configuration loaded from YAML.
//!
//! # Responsibility
//! - Describe the store connection and optional logging settings.
//! - Load the document once at startup.
//!
//! # Invariants
//! - Keys use the camelCase naming of the deployed config files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub store_config: StoreConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// Backing store selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Memory,
}

/// Store connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(rename = "type")]
    pub kind: StoreKind,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// SQLite database file; in-memory when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// `host:port` of a networked store, when both are configured.
    pub fn endpoint(&self) -> Option<String> {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => Some(format!("{host}:{port}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config `{}`: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Reads and parses the YAML config file at `path`.
pub fn read_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a YAML config document.
pub fn parse_config(raw: &str) -> Result<AppConfig, serde_yaml::Error> {
    serde_yaml::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::{parse_config, StoreKind};

    #[test]
    fn minimal_document_defaults_optional_sections() {
        let config = parse_config("storeConfig:\n  type: memory\n").unwrap();
        assert_eq!(config.store_config.kind, StoreKind::Memory);
        assert_eq!(config.store_config.endpoint(), None);
        assert!(config.logging.is_none());
    }

    #[test]
    fn unknown_store_type_is_rejected() {
        assert!(parse_config("storeConfig:\n  type: oracle\n").is_err());
    }
}
