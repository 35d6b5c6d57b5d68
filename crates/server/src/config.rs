//! Server configuration: optional TOML file named by `RECON_CONFIG`, then
//! environment overrides.

use recon_core::MatchCountMode;
use recon_import::{ReconcileOptions, DEFAULT_THRESHOLD};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "RECON_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    pub match_threshold: f64,
    pub count_mode: MatchCountMode,
    pub sort_unmatched: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            match_threshold: DEFAULT_THRESHOLD,
            count_mode: MatchCountMode::Combined,
            sort_unmatched: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("RECON_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(level) = lookup("RECON_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(raw) = lookup("RECON_MATCH_THRESHOLD") {
            self.match_threshold = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RECON_MATCH_THRESHOLD",
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup("RECON_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RECON_MAX_UPLOAD_BYTES",
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            match_threshold: self.match_threshold,
            count_mode: self.count_mode,
            sort_unmatched: self.sort_unmatched,
        }
    }
}
