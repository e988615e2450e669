//! Amount formatting for every render target.
//!
//! Amounts arrive from the server as floating point numbers. They are rounded
//! to whole cents, grouped, and printed with at most two fractional digits
//! (trailing zeros dropped), so `12000.0` renders as `12,000` and `10.5` as
//! `10.5`.

use serde::Deserialize;

/// Digit grouping used for the integer part of an amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Last three digits, then pairs: `12,34,567`.
    #[default]
    Indian,
    /// Thousands: `1,234,567`.
    Western,
}

/// How amounts are shown: grouping plus the currency symbol used in labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountFormat {
    pub grouping: Grouping,
    pub symbol: String,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self {
            grouping: Grouping::Indian,
            symbol: "₹".to_string(),
        }
    }
}

impl AmountFormat {
    pub fn new(grouping: Grouping, symbol: impl Into<String>) -> Self {
        Self {
            grouping,
            symbol: symbol.into(),
        }
    }

    /// Formats a bare amount, without the currency symbol.
    #[must_use]
    pub fn amount(&self, value: f64) -> String {
        format_amount(value, self.grouping)
    }

    /// Formats an amount prefixed by the currency symbol (`₹ 1,200`).
    #[must_use]
    pub fn currency(&self, value: f64) -> String {
        format!("{} {}", self.symbol, self.amount(value))
    }
}

/// Formats `value` with `grouping` and at most two fractional digits.
///
/// Non-finite values are treated like a missing amount and print as `0`.
#[must_use]
pub fn format_amount(value: f64, grouping: Grouping) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = group_digits(abs / 100, grouping);
    let frac = abs % 100;

    if frac == 0 {
        format!("{sign}{whole}")
    } else if frac % 10 == 0 {
        format!("{sign}{whole}.{}", frac / 10)
    } else {
        format!("{sign}{whole}.{frac:02}")
    }
}

fn group_digits(value: u64, grouping: Grouping) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let group = match grouping {
        Grouping::Indian => 2,
        Grouping::Western => 3,
    };

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
