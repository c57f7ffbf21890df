//! Configuration management for khata
//!
//! This module handles loading, validation, and management of
//! khata configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, ConfigErrorDetails, ConfigResult};

// ==================== Configuration Types ====================

/// Ledger document storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON ledger document
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Copy the previous document to `<path>.bak` before each save
    #[serde(default = "default_true")]
    pub backup: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            backup: true,
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/ledger.json")
}

fn default_true() -> bool {
    true
}

/// Credential pair written into a freshly initialized ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_operator_id")]
    pub id: String,
    #[serde(default = "default_operator_password")]
    pub password: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            id: default_operator_id(),
            password: default_operator_password(),
        }
    }
}

fn default_operator_id() -> String {
    "KINGG".to_string()
}

fn default_operator_password() -> String {
    "KINGG123".to_string()
}

/// Password policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Minimum number of characters for a new password
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
        }
    }
}

fn default_min_password_length() -> usize {
    4
}

/// Plain-text export layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// First line of the export
    #[serde(default = "default_report_title")]
    pub title: String,
    /// Last line of the export
    #[serde(default = "default_report_footer")]
    pub footer: String,
    /// Symbol printed before every amount
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Width of the `=` and `-` separator lines
    #[serde(default = "default_rule_width")]
    pub rule_width: usize,
    /// Export file name prefix; the date is appended
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_report_title(),
            footer: default_report_footer(),
            currency_symbol: default_currency_symbol(),
            rule_width: default_rule_width(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_report_title() -> String {
    "KINGG RESTAURANT LEDGER - BACKUP".to_string()
}

fn default_report_footer() -> String {
    "END OF BACKUP".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_rule_width() -> usize {
    80
}

fn default_file_prefix() -> String {
    "KINGG-Ledger-Backup".to_string()
}

/// Transient notice settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// How long a success or error notice stays visible
    #[serde(default = "default_notice_duration")]
    pub duration_ms: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_notice_duration(),
        }
    }
}

fn default_notice_duration() -> u64 {
    3000
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Document storage settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Default credentials for a new ledger
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Password policy
    #[serde(default)]
    pub security: SecurityConfig,
    /// Export layout
    #[serde(default)]
    pub report: ReportConfig,
    /// Notice settings
    #[serde(default)]
    pub notices: NoticeConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            },
            _ => ConfigError::IoError {
                path: path.to_string_lossy().to_string(),
                source: e,
            },
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.path".to_string(),
                reason: "Store path must not be empty".to_string(),
            });
        }

        if self.credentials.id.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "credentials.id".to_string(),
                reason: "Operator ID must not be empty".to_string(),
            });
        }

        if self.security.min_password_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "security.min_password_length".to_string(),
                reason: "Minimum password length must be at least 1".to_string(),
            });
        }

        if self.credentials.password.chars().count() < self.security.min_password_length {
            return Err(ConfigError::InvalidValue {
                field: "credentials.password".to_string(),
                reason: format!(
                    "Default password must be at least {} characters",
                    self.security.min_password_length
                ),
            });
        }

        if !(10..=200).contains(&self.report.rule_width) {
            return Err(ConfigError::InvalidValue {
                field: "report.rule_width".to_string(),
                reason: "Rule width must be between 10 and 200".to_string(),
            });
        }

        if self.notices.duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notices.duration_ms".to_string(),
                reason: "Notice duration must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the ledger document
    pub fn ledger_path(&self) -> PathBuf {
        self.store.path.clone()
    }

    /// Notice display time
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notices.duration_ms)
    }
}

// ==================== Tests ====================
