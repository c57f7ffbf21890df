//! Error types for khata-config

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config is not valid YAML: {message}")]
    InvalidYaml { message: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Cannot read config file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What the operator sees when the config cannot be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrorDetails {
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }
        Ok(())
    }
}

impl ConfigError {
    pub fn to_details(&self) -> ConfigErrorDetails {
        let hint = match self {
            ConfigError::FileNotFound { .. } | ConfigError::InvalidYaml { .. } => {
                Some("Run `khata config > khata.yaml` to start from the defaults.".to_string())
            }
            ConfigError::InvalidValue { field, .. } => {
                Some(format!("Fix `{}` or remove it to use the default.", field))
            }
            ConfigError::IoError { .. } => None,
        };
        ConfigErrorDetails {
            message: self.to_string(),
            hint,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_names_field() {
        let error = ConfigError::InvalidValue {
            field: "report.rule_width".to_string(),
            reason: "Rule width must be between 10 and 200".to_string(),
        };
        let details = error.to_details();
        assert_eq!(
            details.message,
            "Invalid value for report.rule_width: Rule width must be between 10 and 200"
        );
        assert!(details.to_string().contains("\nHint: Fix `report.rule_width`"));
    }

    #[test]
    fn test_io_error_has_no_hint() {
        let error = ConfigError::IoError {
            path: "khata.yaml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let details = error.to_details();
        assert!(details.hint.is_none());
        assert_eq!(details.to_string(), "Cannot read config file khata.yaml: denied");
    }
}
