//! Report structures and the plain-text ledger export

use chrono::{NaiveDate, NaiveDateTime};
use khata_config::ReportConfig;
use khata_store::{LedgerDocument, Transaction};
use khata_utils::{format_amount, rule};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ValidationError;
use crate::ledger::{Totals, TransactionLedger};
use crate::month::{MonthFilter, YearMonth};
use crate::types::BalanceStatus;

/// Dashboard row for one customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerBalance {
    pub name: String,
    pub balance: Decimal,
    pub status: BalanceStatus,
    pub transaction_count: usize,
}

/// Whole-ledger figures for a month filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub filter: String,
    pub total_credit: Decimal,
    pub total_paid: Decimal,
    /// Credit minus paid
    pub outstanding: Decimal,
    pub customer_count: usize,
}

impl LedgerSummary {
    pub fn new(filter: &MonthFilter, totals: Totals, customer_count: usize) -> Self {
        Self {
            filter: filter.to_string(),
            total_credit: totals.credit,
            total_paid: totals.payment,
            outstanding: totals.balance(),
            customer_count,
        }
    }
}

/// A transaction in a filtered view with its position in the full list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    /// Index into the unfiltered transaction list, usable for deletion
    pub index: usize,
    pub transaction: Transaction,
}

/// A customer's ledger as shown after PIN entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerLedger {
    pub name: String,
    pub filter: String,
    pub totals: Totals,
    pub balance: Decimal,
    pub status: BalanceStatus,
    pub entries: Vec<LedgerEntry>,
    /// Months with transactions for this customer, most recent first
    pub months: Vec<YearMonth>,
}

/// `Generated:` timestamp, e.g. `10/3/2024, 7:30:00 pm`
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format("%-d/%-m/%Y, %-I:%M:%S %P").to_string()
}

/// Download name for an export made on `date`
pub fn export_file_name(prefix: &str, date: &NaiveDate) -> String {
    format!("{}-{}.txt", prefix, date.format("%Y-%m-%d"))
}

/// Render the whole ledger as the plain-text backup report.
///
/// Customers appear in the order they were added and transactions in
/// insertion order. The layout is parsed by external tooling and must stay
/// stable.
pub fn export_report(
    doc: &LedgerDocument,
    generated_at: &NaiveDateTime,
    config: &ReportConfig,
) -> Result<String, ValidationError> {
    let symbol = config.currency_symbol.as_str();
    let heavy = rule('=', config.rule_width);
    let light = rule('-', config.rule_width);

    let mut out = String::new();
    out.push_str(&format!("{}\n", config.title));
    out.push_str(&format!("Generated: {}\n", format_timestamp(generated_at)));
    out.push_str(&format!("{}\n\n", heavy));
    out.push_str("CUSTOMERS & TRANSACTIONS:\n\n");

    if doc.customers.is_empty() {
        out.push_str("No customers yet.\n");
    }

    for (position, (name, customer)) in doc.customers.iter().enumerate() {
        let totals = TransactionLedger::totals(&customer.transactions)?;

        out.push_str(&format!("{}. CUSTOMER: {}\n", position + 1, name));
        out.push_str(&format!("   Total Credit: {}\n", format_amount(symbol, totals.credit)));
        out.push_str(&format!("   Total Payment: {}\n", format_amount(symbol, totals.payment)));
        out.push_str(&format!(
            "   Balance: {} ({})\n\n",
            format_amount(symbol, totals.balance().abs()),
            totals.status().label()
        ));

        if customer.transactions.is_empty() {
            out.push_str("   No transactions yet.\n");
        } else {
            out.push_str("   TRANSACTIONS:\n");
            for (k, t) in customer.transactions.iter().enumerate() {
                out.push_str(&format!(
                    "   {}. {} {} | {} | {}",
                    k + 1,
                    t.date,
                    t.time,
                    t.kind.label(),
                    format_amount(symbol, t.amount)
                ));
                if let Some(notes) = t.notes.as_deref().filter(|n| !n.is_empty()) {
                    out.push_str(&format!(" | Notes: {}", notes));
                }
                out.push('\n');
            }
        }

        out.push_str(&format!("\n{}\n\n", light));
    }

    out.push_str(&format!("\n{}\n", heavy));
    out.push_str(&format!("{}\n", config.footer));
    Ok(out)
}
