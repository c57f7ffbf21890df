//! Basic types for the core ledger module

use khata_store::TransactionType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// Raw transaction fields as entered by the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub kind: TransactionType,
    pub amount: String,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
}

impl TransactionInput {
    pub fn new(kind: TransactionType, amount: &str, date: &str, time: &str) -> Self {
        Self {
            kind,
            amount: amount.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            notes: None,
        }
    }

    pub fn credit(amount: &str, date: &str, time: &str) -> Self {
        Self::new(TransactionType::Credit, amount, date, time)
    }

    pub fn payment(amount: &str, date: &str, time: &str) -> Self {
        Self::new(TransactionType::Payment, amount, date, time)
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// How a new customer's PIN is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinMode {
    /// Generate a unique PIN
    Auto,
    /// Use the operator's PIN after validation
    Custom(String),
}

/// Sign of a balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// Customer owes the restaurant
    Due,
    /// Restaurant owes the customer
    Advance,
    Balanced,
}

impl BalanceStatus {
    pub fn from_balance(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            BalanceStatus::Due
        } else if balance < Decimal::ZERO {
            BalanceStatus::Advance
        } else {
            BalanceStatus::Balanced
        }
    }

    /// Upper-case label used in exports
    pub fn label(&self) -> &'static str {
        match self {
            BalanceStatus::Due => "DUE",
            BalanceStatus::Advance => "ADVANCE",
            BalanceStatus::Balanced => "BALANCED",
        }
    }
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceStatus::Due => write!(f, "due"),
            BalanceStatus::Advance => write!(f, "advance"),
            BalanceStatus::Balanced => write!(f, "balanced"),
        }
    }
}

/// Notice kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown to the operator after an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// How long the notice stays visible before it is dismissed
    pub duration: Duration,
}

impl Notice {
    pub fn success(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            duration,
        }
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            duration,
        }
    }

    pub fn from_error(error: &CoreError, duration: Duration) -> Self {
        Self::error(error.to_string(), duration)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "✓ {}", self.message),
            NoticeKind::Error => write!(f, "✗ {}", self.message),
        }
    }
}
