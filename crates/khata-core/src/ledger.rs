//! Per-customer transaction ledger
//!
//! Transactions are kept in insertion order, which is not necessarily
//! chronological. Balances are always recomputed from the stored list.

use chrono::NaiveDate;
use khata_store::{Customer, Transaction, TransactionType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::{NotFoundError, ValidationError};
use crate::month::{MonthFilter, MonthFilterable, YearMonth};
use crate::types::{BalanceStatus, TransactionInput};

/// Credit and payment sums over a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub credit: Decimal,
    pub payment: Decimal,
}

impl Totals {
    /// Credit minus payment; positive means the customer owes
    pub fn balance(&self) -> Decimal {
        self.credit - self.payment
    }

    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::from_balance(self.balance())
    }

    /// Pointwise sum, failing when either side leaves the `Decimal` range
    pub fn checked_add(self, other: Totals) -> Result<Totals, ValidationError> {
        Ok(Totals {
            credit: self
                .credit
                .checked_add(other.credit)
                .ok_or(ValidationError::TotalOverflow)?,
            payment: self
                .payment
                .checked_add(other.payment)
                .ok_or(ValidationError::TotalOverflow)?,
        })
    }
}

/// Largest amount a single transaction may carry (one trillion)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Transaction ledger operations
pub struct TransactionLedger;

impl TransactionLedger {
    /// Parse an amount; it must be a positive number no larger than
    /// [`MAX_AMOUNT`]
    pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.contains('_') {
            return Err(ValidationError::InvalidAmount);
        }
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| ValidationError::InvalidAmount)?;
        if amount <= Decimal::ZERO || amount > MAX_AMOUNT {
            return Err(ValidationError::InvalidAmount);
        }
        Ok(amount)
    }

    /// Parse a required `YYYY-MM-DD` date
    pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
            value: trimmed.to_string(),
        })
    }

    /// Validate `input` and build the transaction that would be stored
    pub fn build_transaction(input: TransactionInput) -> Result<Transaction, ValidationError> {
        let amount = Self::parse_amount(&input.amount)?;
        let date = Self::parse_date(&input.date)?;

        let time = input.time.trim();
        if time.is_empty() {
            return Err(ValidationError::MissingTime);
        }

        let notes = match input.kind {
            TransactionType::Credit => input
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            TransactionType::Payment => None,
        };

        Ok(Transaction {
            id: khata_utils::generate_id(),
            kind: input.kind,
            amount,
            date: date.format("%Y-%m-%d").to_string(),
            time: time.to_string(),
            notes,
        })
    }

    /// Validate `input` and append it to the customer's transactions
    pub fn add_transaction(
        customer: &mut Customer,
        input: TransactionInput,
    ) -> Result<Transaction, ValidationError> {
        let transaction = Self::build_transaction(input)?;
        customer.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Remove the transaction at `index` of the full, unfiltered list
    pub fn delete_transaction(
        customer: &mut Customer,
        index: usize,
    ) -> Result<Transaction, NotFoundError> {
        let len = customer.transactions.len();
        if index >= len {
            return Err(NotFoundError::IndexOutOfRange { index, len });
        }
        Ok(customer.transactions.remove(index))
    }

    /// Remove the transaction with the given identifier
    pub fn delete_by_id(customer: &mut Customer, id: &str) -> Result<Transaction, NotFoundError> {
        let position = customer
            .position_of(id)
            .ok_or_else(|| NotFoundError::UnknownTransaction { id: id.to_string() })?;
        Ok(customer.transactions.remove(position))
    }

    /// Credit and payment sums over `transactions`
    pub fn totals<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Result<Totals, ValidationError> {
        transactions
            .into_iter()
            .try_fold(Totals::default(), |acc, t| {
                let entry = match t.kind {
                    TransactionType::Credit => Totals { credit: t.amount, payment: Decimal::ZERO },
                    TransactionType::Payment => Totals { credit: Decimal::ZERO, payment: t.amount },
                };
                acc.checked_add(entry)
            })
    }

    /// Credit and payment sums for one customer within `filter`
    pub fn customer_totals(
        customer: &Customer,
        filter: &MonthFilter,
    ) -> Result<Totals, ValidationError> {
        Self::totals(customer.transactions.iter().filter(|t| t.in_month(filter)))
    }

    /// Balance of one customer within `filter`
    pub fn compute_balance(
        customer: &Customer,
        filter: &MonthFilter,
    ) -> Result<Decimal, ValidationError> {
        Ok(Self::customer_totals(customer, filter)?.balance())
    }

    /// Whole-ledger totals: the pointwise sum of every customer's totals
    pub fn aggregate_totals<'a>(
        customers: impl IntoIterator<Item = &'a Customer>,
        filter: &MonthFilter,
    ) -> Result<Totals, ValidationError> {
        customers
            .into_iter()
            .try_fold(Totals::default(), |acc, c| {
                acc.checked_add(Self::customer_totals(c, filter)?)
            })
    }

    /// Distinct months with at least one dated transaction, most recent first
    pub fn list_available_months<'a>(
        customers: impl IntoIterator<Item = &'a Customer>,
    ) -> Vec<YearMonth> {
        let months: BTreeSet<YearMonth> = customers
            .into_iter()
            .flat_map(|c| c.transactions.iter())
            .filter_map(|t| t.date_naive())
            .map(|d| YearMonth::from_date(&d))
            .collect();
        months.into_iter().rev().collect()
    }

    /// Transactions within `filter`, in their original order
    pub fn filter_by_month<'a>(
        transactions: &'a [Transaction],
        filter: &MonthFilter,
    ) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| t.in_month(filter)).collect()
    }

    /// Like [`TransactionLedger::filter_by_month`], paired with each
    /// transaction's index in the unfiltered list
    pub fn filter_entries<'a>(
        transactions: &'a [Transaction],
        filter: &MonthFilter,
    ) -> Vec<(usize, &'a Transaction)> {
        transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| t.in_month(filter))
            .collect()
    }
}
