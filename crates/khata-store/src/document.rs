//! Persisted ledger document
//!
//! One `LedgerDocument` holds everything: the operator credentials and the
//! customer map. It is always read and written as a whole.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Operator credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub id: String,
    pub password: String,
}

/// Transaction type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Customer took food on credit, increases what they owe
    Credit,
    /// Customer paid, decreases what they owe
    Payment,
}

impl TransactionType {
    /// Upper-case label used in exports
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Payment => "PAYMENT",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "credit" => Ok(TransactionType::Credit),
            "payment" | "paid" => Ok(TransactionType::Payment),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Credit => write!(f, "credit"),
            TransactionType::Payment => write!(f, "payment"),
        }
    }
}

/// A stored credit or payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identifier, assigned when the transaction is appended.
    /// Empty for documents written before identifiers existed.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    /// Calendar date (YYYY-MM-DD)
    #[serde(default)]
    pub date: String,
    /// Wall-clock time (HH:MM), display only
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    /// Get the transaction date as NaiveDate
    pub fn date_naive(&self) -> Option<NaiveDate> {
        let date = self.date.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                // tolerate full timestamps such as 2024-03-10T19:30:00Z
                date.get(..10)
                    .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            })
    }

    /// Get formatted datetime string (date + time)
    pub fn datetime(&self) -> String {
        if self.time.is_empty() {
            self.date.clone()
        } else {
            format!("{} {}", self.date, self.time)
        }
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionType::Credit
    }

    pub fn is_payment(&self) -> bool {
        self.kind == TransactionType::Payment
    }

    /// Amount as it affects the balance: credits add, payments subtract
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Credit => self.amount,
            TransactionType::Payment => -self.amount,
        }
    }
}

/// A customer's entry in the ledger; the name is the map key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub pin: String,
    /// Insertion order, not chronological
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Customer {
    pub fn new(pin: String) -> Self {
        Self {
            pin,
            transactions: Vec::new(),
        }
    }

    /// Position of the transaction with the given id
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }
}

/// The single root document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    pub credentials: Credentials,
    #[serde(default)]
    pub customers: IndexMap<String, Customer>,
}

impl LedgerDocument {
    /// Create an empty document with the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            customers: IndexMap::new(),
        }
    }

    pub fn customer(&self, name: &str) -> Option<&Customer> {
        self.customers.get(name)
    }

    pub fn customer_mut(&mut self, name: &str) -> Option<&mut Customer> {
        self.customers.get_mut(name)
    }

    /// PINs of every current customer
    pub fn pins(&self) -> HashSet<String> {
        self.customers.values().map(|c| c.pin.clone()).collect()
    }

    /// PINs of every customer except `name`
    pub fn pins_except(&self, name: &str) -> HashSet<String> {
        self.customers
            .iter()
            .filter(|(other, _)| other.as_str() != name)
            .map(|(_, c)| c.pin.clone())
            .collect()
    }

    pub fn transaction_count(&self) -> usize {
        self.customers.values().map(|c| c.transactions.len()).sum()
    }

    /// Give every transaction without an identifier a fresh one.
    /// Returns how many were assigned.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        for customer in self.customers.values_mut() {
            for transaction in customer.transactions.iter_mut().filter(|t| t.id.is_empty()) {
                transaction.id = khata_utils::generate_id();
                assigned += 1;
            }
        }
        assigned
    }
}
