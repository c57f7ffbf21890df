//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a number with thousands separators and at most three fraction digits.
///
/// Trailing zeros are dropped, so `1234.50` renders as `1,234.5`.
pub fn format_number(n: Decimal) -> String {
    let rounded = n
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::new();
    let mut count = 0;
    for c in int_part.chars().rev() {
        if count == 3 {
            grouped.push(',');
            count = 0;
        }
        grouped.push(c);
        count += 1;
    }
    let mut result: String = grouped.chars().rev().collect();

    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        result.insert(0, '-');
    }
    result
}

/// Format an amount prefixed with a currency symbol
pub fn format_amount(symbol: &str, n: Decimal) -> String {
    format!("{}{}", symbol, format_number(n))
}

/// A horizontal rule made of `width` copies of `ch`
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

/// Generate a unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
