//! Error types for khata-core
//!
//! Every failure is recoverable and reported back to the caller as a value.
//! Errors are grouped by category; [`CoreError`] wraps them all and carries
//! codes, severity and suggestions for the operator.

use khata_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    WrongPassword,
    WrongPin,
    InvalidLogin,
    WeakPassword,
    PasswordMismatch,
    InvalidAmount,
    MissingDate,
    InvalidDate,
    MissingTime,
    MissingName,
    InvalidMonth,
    TotalOverflow,
    InvalidPinFormat,
    DuplicatePin,
    PinsExhausted,
    UnknownCustomer,
    IndexOutOfRange,
    UnknownTransaction,
    CustomerExists,
    CorruptDocument,
    EncodeError,
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::WrongPassword => write!(f, "WRONG_PASSWORD"),
            ErrorCode::WrongPin => write!(f, "WRONG_PIN"),
            ErrorCode::InvalidLogin => write!(f, "INVALID_LOGIN"),
            ErrorCode::WeakPassword => write!(f, "WEAK_PASSWORD"),
            ErrorCode::PasswordMismatch => write!(f, "PASSWORD_MISMATCH"),
            ErrorCode::InvalidAmount => write!(f, "INVALID_AMOUNT"),
            ErrorCode::MissingDate => write!(f, "MISSING_DATE"),
            ErrorCode::InvalidDate => write!(f, "INVALID_DATE"),
            ErrorCode::MissingTime => write!(f, "MISSING_TIME"),
            ErrorCode::MissingName => write!(f, "MISSING_NAME"),
            ErrorCode::InvalidMonth => write!(f, "INVALID_MONTH"),
            ErrorCode::TotalOverflow => write!(f, "TOTAL_OVERFLOW"),
            ErrorCode::InvalidPinFormat => write!(f, "INVALID_PIN_FORMAT"),
            ErrorCode::DuplicatePin => write!(f, "DUPLICATE_PIN"),
            ErrorCode::PinsExhausted => write!(f, "PINS_EXHAUSTED"),
            ErrorCode::UnknownCustomer => write!(f, "UNKNOWN_CUSTOMER"),
            ErrorCode::IndexOutOfRange => write!(f, "INDEX_OUT_OF_RANGE"),
            ErrorCode::UnknownTransaction => write!(f, "UNKNOWN_TRANSACTION"),
            ErrorCode::CustomerExists => write!(f, "CUSTOMER_EXISTS"),
            ErrorCode::CorruptDocument => write!(f, "CORRUPT_DOCUMENT"),
            ErrorCode::EncodeError => write!(f, "ENCODE_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for operator-facing output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation refused
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - ledger unusable until the operator intervenes
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

// ==================== Error Categories ====================

/// Credential and PIN checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid Password")]
    WrongPassword,

    #[error("Invalid PIN")]
    WrongPin,

    #[error("Invalid ID or Password")]
    InvalidLogin,

    #[error("New password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("New passwords do not match")]
    PasswordMismatch,
}

/// Rejected operator input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Please select a date")]
    MissingDate,

    #[error("Invalid date: {value}")]
    InvalidDate { value: String },

    #[error("Please select a time")]
    MissingTime,

    #[error("Customer name is required")]
    MissingName,

    #[error("Invalid month: {value} (expected YYYY-MM or \"all\")")]
    InvalidMonth { value: String },

    #[error("Totals exceed the supported amount range")]
    TotalOverflow,
}

/// Customer PIN problems
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PinError {
    #[error("PIN must be exactly 4 digits")]
    InvalidFormat,

    #[error("This PIN is already in use")]
    Duplicate,

    #[error("All {capacity} PINs are already in use")]
    Exhausted { capacity: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("Customer not found: {name}")]
    UnknownCustomer { name: String },

    #[error("Transaction index {index} is out of range ({len} transactions)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Transaction not found: {id}")]
    UnknownTransaction { id: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DuplicateError {
    #[error("Customer already exists: {name}")]
    CustomerExists { name: String },
}

/// Main error type for khata-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pin(#[from] PinError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Duplicate(#[from] DuplicateError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Auth(e) => match e {
                AuthError::WrongPassword => ErrorCode::WrongPassword,
                AuthError::WrongPin => ErrorCode::WrongPin,
                AuthError::InvalidLogin => ErrorCode::InvalidLogin,
                AuthError::WeakPassword { .. } => ErrorCode::WeakPassword,
                AuthError::PasswordMismatch => ErrorCode::PasswordMismatch,
            },
            CoreError::Validation(e) => match e {
                ValidationError::InvalidAmount => ErrorCode::InvalidAmount,
                ValidationError::MissingDate => ErrorCode::MissingDate,
                ValidationError::InvalidDate { .. } => ErrorCode::InvalidDate,
                ValidationError::MissingTime => ErrorCode::MissingTime,
                ValidationError::MissingName => ErrorCode::MissingName,
                ValidationError::InvalidMonth { .. } => ErrorCode::InvalidMonth,
                ValidationError::TotalOverflow => ErrorCode::TotalOverflow,
            },
            CoreError::Pin(e) => match e {
                PinError::InvalidFormat => ErrorCode::InvalidPinFormat,
                PinError::Duplicate => ErrorCode::DuplicatePin,
                PinError::Exhausted { .. } => ErrorCode::PinsExhausted,
            },
            CoreError::NotFound(e) => match e {
                NotFoundError::UnknownCustomer { .. } => ErrorCode::UnknownCustomer,
                NotFoundError::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
                NotFoundError::UnknownTransaction { .. } => ErrorCode::UnknownTransaction,
            },
            CoreError::Duplicate(DuplicateError::CustomerExists { .. }) => ErrorCode::CustomerExists,
            CoreError::Storage(e) => match e {
                StoreError::CorruptDocument { .. } => ErrorCode::CorruptDocument,
                StoreError::EncodeError { .. } => ErrorCode::EncodeError,
                StoreError::IoError(_) => ErrorCode::IoError,
            },
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Auth(_) => ErrorSeverity::Warning,
            CoreError::Validation(ValidationError::TotalOverflow) => ErrorSeverity::Error,
            CoreError::Validation(_) => ErrorSeverity::Warning,
            CoreError::Pin(PinError::Exhausted { .. }) => ErrorSeverity::Error,
            CoreError::Pin(_) => ErrorSeverity::Warning,
            CoreError::NotFound(_) => ErrorSeverity::Info,
            CoreError::Duplicate(_) => ErrorSeverity::Warning,
            CoreError::Storage(StoreError::CorruptDocument { .. }) => ErrorSeverity::Critical,
            CoreError::Storage(_) => ErrorSeverity::Error,
        }
    }

    /// Whether the operator can simply retry with different input.
    /// A corrupt document needs manual repair.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoreError::Storage(StoreError::CorruptDocument { .. }))
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(
            self.code(),
            self.to_string(),
        );

        match self {
            CoreError::Auth(AuthError::WeakPassword { min }) => {
                details = details.with_suggestion(format!(
                    "Choose a password with at least {} characters.", min
                ));
            }
            CoreError::Pin(PinError::InvalidFormat) => {
                details = details.with_suggestion(
                    "Use exactly four digits, leading zeros are allowed (e.g. 0007).".to_string()
                );
            }
            CoreError::Pin(PinError::Duplicate) => {
                details = details.with_suggestion(
                    "Pick another PIN or let one be generated automatically.".to_string()
                );
            }
            CoreError::NotFound(NotFoundError::UnknownCustomer { name }) => {
                details = details.with_suggestion(format!(
                    "Check the spelling of '{}'; customer names are case-sensitive.", name
                ));
                details = details.with_suggestion(
                    "Use `khata customers` to list all customers.".to_string()
                );
            }
            CoreError::NotFound(NotFoundError::IndexOutOfRange { index, len }) => {
                details = details.with_detail(serde_json::json!({ "index": index, "len": len }));
                details = details.with_suggestion(
                    "Indexes refer to the full, unfiltered transaction list.".to_string()
                );
            }
            CoreError::Validation(ValidationError::InvalidDate { value }) => {
                details = details.with_detail(serde_json::json!({ "date": value }));
                details = details.with_suggestion(
                    "Dates are written as YYYY-MM-DD.".to_string()
                );
            }
            CoreError::Validation(ValidationError::TotalOverflow) => {
                details = details.with_suggestion(
                    "Delete the oversized transaction that pushed the totals out of range.".to_string()
                );
            }
            CoreError::Storage(StoreError::CorruptDocument { message }) => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
                details = details.with_suggestion(
                    "Restore the ledger from its .bak copy or an exported report.".to_string()
                );
                details = details.with_suggestion(
                    "Move the damaged file aside to start a fresh ledger.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Error Logging ====================

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Customer the operation targeted, if any
    pub customer: Option<String>,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            customer: None,
            data: serde_json::json!({}),
        }
    }

    /// Add the target customer
    pub fn with_customer(mut self, name: &str) -> Self {
        self.customer = Some(name.to_string());
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log a failed operation
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let customer = context.customer.as_deref().unwrap_or("-");
        match error.severity() {
            ErrorSeverity::Info | ErrorSeverity::Warning => log::warn!(
                target: "khata::error",
                "{} failed [{}] {} - customer: {}",
                context.operation,
                error.code(),
                error,
                customer
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "khata::error",
                "{} failed {} - customer: {} - data: {}",
                context.operation,
                error.to_details(),
                customer,
                context.data
            ),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::WrongPassword.to_string(), "WRONG_PASSWORD");
        assert_eq!(ErrorCode::InvalidPinFormat.to_string(), "INVALID_PIN_FORMAT");
        assert_eq!(ErrorCode::CorruptDocument.to_string(), "CORRUPT_DOCUMENT");
    }

    #[test]
    fn test_error_severity_display() {
        assert_eq!(ErrorSeverity::Info.to_string(), "info");
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_core_error_code() {
        let error: CoreError = AuthError::WrongPin.into();
        assert_eq!(error.code(), ErrorCode::WrongPin);

        let error: CoreError = NotFoundError::IndexOutOfRange { index: 3, len: 1 }.into();
        assert_eq!(error.code(), ErrorCode::IndexOutOfRange);

        let error: CoreError = PinError::Duplicate.into();
        assert_eq!(error.code(), ErrorCode::DuplicatePin);
    }

    #[test]
    fn test_messages_match_notices() {
        let error: CoreError = AuthError::WrongPassword.into();
        assert_eq!(error.to_string(), "Invalid Password");

        let error: CoreError = ValidationError::InvalidAmount.into();
        assert_eq!(error.to_string(), "Please enter a valid amount");

        let error: CoreError = AuthError::WeakPassword { min: 4 }.into();
        assert_eq!(error.to_string(), "New password must be at least 4 characters");
    }

    #[test]
    fn test_corrupt_document_is_critical() {
        let error: CoreError = StoreError::CorruptDocument { message: "EOF".to_string() }.into();
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(!error.is_recoverable());

        let details = error.to_details();
        assert!(details.details.is_some());
        assert_eq!(details.suggestions.len(), 2);
    }

    #[test]
    fn test_validation_is_recoverable() {
        let error: CoreError = ValidationError::MissingDate.into();
        assert!(error.is_recoverable());
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_error_details_unknown_customer() {
        let error: CoreError = NotFoundError::UnknownCustomer { name: "Raj".to_string() }.into();
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::UnknownCustomer);
        assert!(details.message.contains("Raj"));
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("add_transaction")
            .with_customer("Raj")
            .with_data("index", serde_json::json!(2));

        assert_eq!(context.operation, "add_transaction");
        assert_eq!(context.customer.as_deref(), Some("Raj"));
        assert_eq!(context.data["index"], 2);
    }
}
