//! Calendar-month filtering for transactions

use chrono::{Datelike, NaiveDate};
use khata_store::Transaction;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static MONTH_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").unwrap());

/// A calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(ValidationError::InvalidMonth {
                value: format!("{:04}-{:02}", year, month),
            })
        }
    }

    pub fn from_date(date: &NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Zero-padded `YYYY-MM` key
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Display label such as `March 2024`
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.key())
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::str::FromStr for YearMonth {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonth { value: s.to_string() };
        let caps = MONTH_KEY.captures(s.trim()).ok_or_else(invalid)?;
        let year = caps[1].parse::<i32>().map_err(|_| invalid())?;
        let month = caps[2].parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month).map_err(|_| invalid())
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Either every transaction or one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(YearMonth),
}

impl MonthFilter {
    pub fn is_all(&self) -> bool {
        matches!(self, MonthFilter::All)
    }

    /// Check if a date falls inside the filter
    pub fn contains(&self, date: &NaiveDate) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(month) => month.contains(date),
        }
    }

    /// Get a human-readable description of the filter
    pub fn description(&self) -> String {
        match self {
            MonthFilter::All => "All Time".to_string(),
            MonthFilter::Month(month) => month.label(),
        }
    }
}

impl std::str::FromStr for MonthFilter {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(MonthFilter::All)
        } else {
            trimmed.parse().map(MonthFilter::Month)
        }
    }
}

impl std::fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonthFilter::All => write!(f, "all"),
            MonthFilter::Month(month) => write!(f, "{}", month),
        }
    }
}

impl From<YearMonth> for MonthFilter {
    fn from(month: YearMonth) -> Self {
        MonthFilter::Month(month)
    }
}

/// Month filtering trait
pub trait MonthFilterable {
    /// Whether the item belongs to the filtered month
    fn in_month(&self, filter: &MonthFilter) -> bool;
}

impl MonthFilterable for Transaction {
    fn in_month(&self, filter: &MonthFilter) -> bool {
        match filter {
            MonthFilter::All => true,
            // an unparseable date never matches a specific month
            MonthFilter::Month(_) => self.date_naive().map_or(false, |d| filter.contains(&d)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_store::TransactionType;
    use rust_decimal_macros::dec;

    fn tx_on(date: &str) -> Transaction {
        Transaction {
            id: "t".to_string(),
            kind: TransactionType::Credit,
            amount: dec!(1),
            date: date.to_string(),
            time: String::new(),
            notes: None,
        }
    }

    #[test]
    fn test_year_month_parse() {
        let month: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(month, YearMonth { year: 2024, month: 3 });
        assert_eq!(month.key(), "2024-03");
        assert_eq!(month.label(), "March 2024");
    }

    #[test]
    fn test_year_month_rejects_bad_input() {
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-00".parse::<YearMonth>().is_err());
        assert!("2024-3".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_ordering() {
        let mut months = vec![
            YearMonth { year: 2023, month: 12 },
            YearMonth { year: 2024, month: 2 },
            YearMonth { year: 2024, month: 1 },
        ];
        months.sort();
        assert_eq!(months[0].key(), "2023-12");
        assert_eq!(months[2].key(), "2024-02");
    }

    #[test]
    fn test_month_filter_parse() {
        assert_eq!("all".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!("ALL".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!("".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!(
            "2024-04".parse::<MonthFilter>().unwrap(),
            MonthFilter::Month(YearMonth { year: 2024, month: 4 })
        );
        assert_eq!(MonthFilter::All.to_string(), "all");
        assert_eq!(MonthFilter::All.description(), "All Time");
    }

    #[test]
    fn test_transaction_in_month() {
        let march: MonthFilter = "2024-03".parse().unwrap();
        assert!(tx_on("2024-03-31").in_month(&march));
        assert!(!tx_on("2024-04-01").in_month(&march));
        assert!(!tx_on("2023-03-10").in_month(&march));
    }

    #[test]
    fn test_unparseable_date_only_matches_all() {
        let march: MonthFilter = "2024-03".parse().unwrap();
        let broken = tx_on("not a date");
        assert!(!broken.in_month(&march));
        assert!(broken.in_month(&MonthFilter::All));
    }
}
