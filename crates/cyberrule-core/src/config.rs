//! CyberRule Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with defaults that reproduce the reference extraction behaviour.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Identifier naming conventions
    pub naming: NamingConfig,

    /// Batch driver settings
    pub batch: BatchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(max) = std::env::var("CYBERRULE_MAX_RECORDS") {
            config.batch.max_records = parse_value("CYBERRULE_MAX_RECORDS", max)?;
        }
        if let Ok(parallel) = std::env::var("CYBERRULE_PARALLEL") {
            config.batch.parallel = parse_flag("CYBERRULE_PARALLEL", parallel)?;
        }
        if let Ok(interval) = std::env::var("CYBERRULE_PROGRESS_INTERVAL") {
            config.batch.progress_interval = parse_value("CYBERRULE_PROGRESS_INTERVAL", interval)?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            config.logging.json_format = parse_flag("LOG_JSON", json)?;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        let defaults = Self::default();

        // Only override if env values differ from defaults
        if env_config.batch.max_records != defaults.batch.max_records {
            self.batch.max_records = env_config.batch.max_records;
        }
        if env_config.batch.parallel != defaults.batch.parallel {
            self.batch.parallel = env_config.batch.parallel;
        }
        if env_config.batch.progress_interval != defaults.batch.progress_interval {
            self.batch.progress_interval = env_config.batch.progress_interval;
        }
        if env_config.logging.level != defaults.logging.level {
            self.logging.level = env_config.logging.level;
        }
        if env_config.logging.json_format != defaults.logging.json_format {
            self.logging.json_format = env_config.logging.json_format;
        }

        Ok(self)
    }

    /// Reject settings the extractor cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.naming.acronyms.keys().any(|k| k.is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "naming.acronyms".to_string(),
                value: "\"\"".to_string(),
            });
        }
        if self.batch.progress_interval == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch.progress_interval".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

fn parse_flag(key: &str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

/// Naming conventions for vulnerability-type identifiers.
///
/// The acronym table maps an all-caps (or mixed) token to the casing used by
/// the CWE-derived ground truth, e.g. `SQL` -> `Sql`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Version label of the acronym table
    pub version: String,

    /// Token -> canonical casing
    pub acronyms: BTreeMap<String, String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        let acronyms = [
            ("SQL", "Sql"),
            ("XSS", "Xss"),
            ("CSRF", "Csrf"),
            ("XXE", "Xxe"),
            ("SSRF", "Ssrf"),
            ("RCE", "Rce"),
            ("DOS", "Dos"),
            ("LDAP", "Ldap"),
            ("XPath", "Xpath"),
            ("HTML", "Html"),
            ("XML", "Xml"),
            ("JSON", "Json"),
            ("JWT", "Jwt"),
            ("OAuth", "Oauth"),
            ("SAML", "Saml"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            version: "cwe-1.0".to_string(),
            acronyms,
        }
    }
}

/// Batch driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of records processed per run
    pub max_records: usize,

    /// Fan extraction out over worker threads
    pub parallel: bool,

    /// Log progress every N records
    pub progress_interval: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_records: 2000,
            parallel: true,
            progress_interval: 100,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.batch.max_records, 2000);
        assert!(config.batch.parallel);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.naming.acronyms.get("SQL").map(String::as_str), Some("Sql"));
        assert_eq!(config.naming.acronyms.len(), 15);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "true".to_string()).unwrap());
        assert!(parse_flag("X", " ON ".to_string()).unwrap());
        assert!(!parse_flag("X", "0".to_string()).unwrap());
        assert!(parse_flag("X", "maybe".to_string()).is_err());
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<usize>("CYBERRULE_MAX_RECORDS", "lots".to_string()).unwrap_err();
        assert!(err.to_string().contains("CYBERRULE_MAX_RECORDS"));
    }

    #[test]
    fn test_from_file_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[batch]
max_records = 10
parallel = false

[naming]
version = "custom"
acronyms = {{ SQL = "Sql", NVD = "Nvd" }}
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.batch.max_records, 10);
        assert!(!config.batch.parallel);
        assert_eq!(config.batch.progress_interval, 100);
        assert_eq!(config.naming.version, "custom");
        assert_eq!(config.naming.acronyms.len(), 2);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file("/nonexistent/cyberrule.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError { .. }));
    }

    #[test]
    fn test_validate_zero_interval() {
        let mut config = AppConfig::default();
        config.batch.progress_interval = 0;
        assert!(config.validate().is_err());
    }
}
