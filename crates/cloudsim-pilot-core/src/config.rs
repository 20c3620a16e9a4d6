//! Dashboard configuration
//!
//! Read from `~/.config/cloudsim-pilot/config.yaml` (or an explicit path).
//! Every field is optional:
//!
//! ```yaml
//! bucket:
//!   endpoint: localhost:8080
//!   refresh_interval_ms: 10000
//! queue:
//!   endpoint: localhost:8081
//!   refresh_interval_ms: 5000
//! request_timeout_secs: 10
//! theme: dark
//! ```

use crate::constants::refresh_intervals;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BUCKET_ENDPOINT: &str = "http://localhost:8080";
const DEFAULT_QUEUE_ENDPOINT: &str = "http://localhost:8081";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Color scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
}

impl FromStr for ThemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeKind::Light),
            "dark" => Ok(ThemeKind::Dark),
            other => Err(format!("unknown theme '{}' (expected light or dark)", other)),
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeKind::Light => write!(f, "light"),
            ThemeKind::Dark => write!(f, "dark"),
        }
    }
}

/// Per-service settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// `host`, `host:port` or full URL
    pub endpoint: Option<String>,
    pub refresh_interval_ms: Option<u64>,
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub bucket: ServiceConfig,
    pub queue: ServiceConfig,
    pub request_timeout_secs: Option<u64>,
    pub theme: ThemeKind,
}

impl PilotConfig {
    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                Self::load_from(&path)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate YAML
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: PilotConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config path (~/.config/cloudsim-pilot/config.yaml)
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs_next::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home
            .join(".config")
            .join("cloudsim-pilot")
            .join("config.yaml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.refresh_interval_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "bucket.refresh_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.queue.refresh_interval_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "queue.refresh_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bucket_endpoint(&self) -> &str {
        self.bucket
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_BUCKET_ENDPOINT)
    }

    pub fn queue_endpoint(&self) -> &str {
        self.queue
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_QUEUE_ENDPOINT)
    }

    pub fn bucket_interval(&self) -> Duration {
        Duration::from_millis(
            self.bucket
                .refresh_interval_ms
                .unwrap_or(refresh_intervals::BUCKET_MS),
        )
    }

    pub fn queue_interval(&self) -> Duration {
        Duration::from_millis(
            self.queue
                .refresh_interval_ms
                .unwrap_or(refresh_intervals::QUEUE_MS),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PilotConfig::default();
        assert_eq!(config.bucket_endpoint(), "http://localhost:8080");
        assert_eq!(config.queue_endpoint(), "http://localhost:8081");
        assert_eq!(config.bucket_interval(), Duration::from_millis(10_000));
        assert_eq!(config.queue_interval(), Duration::from_millis(5_000));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.theme, ThemeKind::Light);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
bucket:
  endpoint: storage.local:9000
  refresh_interval_ms: 30000
queue:
  endpoint: http://queue.local:9001
  refresh_interval_ms: 2000
request_timeout_secs: 3
theme: dark
"#;
        let config = PilotConfig::parse(yaml).unwrap();
        assert_eq!(config.bucket_endpoint(), "storage.local:9000");
        assert_eq!(config.bucket_interval(), Duration::from_secs(30));
        assert_eq!(config.queue_endpoint(), "http://queue.local:9001");
        assert_eq!(config.queue_interval(), Duration::from_secs(2));
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.theme, ThemeKind::Dark);
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
queue:
  refresh_interval_ms: 1000
"#;
        let config = PilotConfig::parse(yaml).unwrap();
        assert_eq!(config.queue_interval(), Duration::from_secs(1));
        assert_eq!(config.queue_endpoint(), "http://localhost:8081");
        assert_eq!(config.bucket_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(PilotConfig::parse("").unwrap(), PilotConfig::default());
        assert_eq!(PilotConfig::parse("\n  \n").unwrap(), PilotConfig::default());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let yaml = "bucket:\n  refresh_interval_ms: 0\n";
        assert!(matches!(
            PilotConfig::parse(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        assert!(matches!(
            PilotConfig::parse("theme: sepia\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("dark".parse::<ThemeKind>(), Ok(ThemeKind::Dark));
        assert_eq!("Light".parse::<ThemeKind>(), Ok(ThemeKind::Light));
        assert!("sepia".parse::<ThemeKind>().is_err());
        assert_eq!(ThemeKind::Dark.to_string(), "dark");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("cloudsim-pilot-does-not-exist.yaml");
        assert!(matches!(
            PilotConfig::load(Some(&path)),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "cloudsim-pilot-config-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, "theme: dark\n").unwrap();

        let config = PilotConfig::load(Some(&path)).unwrap();
        assert_eq!(config.theme, ThemeKind::Dark);

        std::fs::remove_file(&path).unwrap();
    }
}
