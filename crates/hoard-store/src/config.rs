//! Store configuration
//!
//! Loaded from an optional TOML file, then overridden by `HOARD_*`
//! environment variables.
//!
//! ```toml
//! db_path = "/var/lib/hoard/hoard.db"
//! gc_interval_secs = 300
//! log_format = "json"
//! log_level = "debug"
//! ```

use crate::errors::{config_error, io_error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DB_PATH: &str = "HOARD_DB_PATH";
pub const ENV_GC_INTERVAL_SECS: &str = "HOARD_GC_INTERVAL_SECS";
pub const ENV_LOG_FORMAT: &str = "HOARD_LOG_FORMAT";
pub const ENV_LOG_LEVEL: &str = "HOARD_LOG_LEVEL";

const DEFAULT_DB_PATH: &str = "./data/hoard.db";
const DEFAULT_GC_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub db_path: PathBuf,

    /// Seconds between garbage collection passes; 0 disables the task
    pub gc_interval_secs: u64,

    pub log_format: LogFormat,
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            gc_interval_secs: DEFAULT_GC_INTERVAL_SECS,
            log_format: LogFormat::Text,
            log_level: "info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error(format!("invalid config: {}", e)))
    }

    /// Read `path` if given, then apply process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| io_error("read_config", e))?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_env_from(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `HOARD_*` overrides using `lookup` to read variables
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.is_empty()) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup(ENV_GC_INTERVAL_SECS) {
            self.gc_interval_secs = secs.trim().parse().map_err(|_| {
                config_error(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_GC_INTERVAL_SECS, secs
                ))
            })?;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.log_format = format.parse().map_err(config_error)?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
        Ok(())
    }

    /// Interval for the maintenance task, `None` when disabled
    pub fn gc_interval(&self) -> Option<Duration> {
        (self.gc_interval_secs > 0).then(|| Duration::from_secs(self.gc_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoard_core::errors::HxErrorKind;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./data/hoard.db"));
        assert_eq!(config.gc_interval(), Some(Duration::from_secs(300)));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StoreConfig::from_toml_str("log_format = \"json\"\ngc_interval_secs = 0").unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.gc_interval(), None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = StoreConfig::from_toml_str("db_pth = \"x\"").unwrap_err();
        assert_eq!(err.kind(), HxErrorKind::Config);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = StoreConfig::from_toml_str("db_path = \"/from/file.db\"").unwrap();
        config
            .apply_env_from(env(&[
                (ENV_DB_PATH, "/from/env.db"),
                (ENV_GC_INTERVAL_SECS, "60"),
                (ENV_LOG_FORMAT, "JSON"),
                (ENV_LOG_LEVEL, "debug"),
            ]))
            .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/from/env.db"));
        assert_eq!(config.gc_interval(), Some(Duration::from_secs(60)));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_bad_env_values_are_config_errors() {
        let mut config = StoreConfig::default();
        let err = config
            .apply_env_from(env(&[(ENV_GC_INTERVAL_SECS, "soon")]))
            .unwrap_err();
        assert_eq!(err.kind(), HxErrorKind::Config);

        let err = config
            .apply_env_from(env(&[(ENV_LOG_FORMAT, "xml")]))
            .unwrap_err();
        assert!(err.message().contains("xml"));
    }
}
