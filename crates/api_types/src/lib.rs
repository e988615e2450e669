use serde::{Deserialize, Deserializer, Serialize};

/// Direction of a transaction as understood by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    #[default]
    Expense,
    Income,
}

impl Kind {
    /// Returns the canonical string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    /// Parses the wire representation, ignoring case and surrounding blanks.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            _ => None,
        }
    }
}

/// Decodes a JSON number that may be `null` or absent as `0`.
fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

pub mod transaction {
    use chrono::NaiveDate;

    use super::*;

    /// A transaction row as returned by `GET /api/expenses`.
    ///
    /// `kind` stays a plain string: imported rows may carry values the client
    /// does not know about and must still be displayed.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: i64,
        #[serde(default)]
        pub date: String,
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub kind: String,
        #[serde(default, deserialize_with = "zero_if_null")]
        pub amount: f64,
        #[serde(default)]
        pub notes: Option<String>,
    }

    /// Request body for `POST /api/expenses` and `PUT /api/expenses/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: Kind,
        pub title: String,
        pub amount: f64,
        pub category: String,
        pub date: NaiveDate,
        pub notes: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: i64,
    }
}

pub mod summary {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct Totals {
        #[serde(default, deserialize_with = "zero_if_null")]
        pub expense: f64,
        #[serde(default, deserialize_with = "zero_if_null")]
        pub income: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        #[serde(default, deserialize_with = "zero_if_null")]
        pub amount: f64,
    }

    /// Aggregate expense of one calendar month.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TrendBucket {
        pub y: i32,
        pub m: u32,
        #[serde(default, deserialize_with = "zero_if_null")]
        pub amount: f64,
    }

    /// Response of `GET /api/summary`.
    ///
    /// Each load replaces the previous one entirely.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct SummaryResult {
        /// `YYYY-MM` of the period the server resolved.
        #[serde(default)]
        pub month: Option<String>,
        #[serde(default)]
        pub totals: Totals,
        #[serde(default, deserialize_with = "zero_if_null")]
        pub budget: f64,
        #[serde(default)]
        pub categories: Vec<CategoryTotal>,
        #[serde(default)]
        pub trend: Vec<TrendBucket>,
    }
}

pub mod recurring {
    use chrono::NaiveDate;

    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Cadence {
        #[default]
        Monthly,
        Weekly,
    }

    impl Cadence {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Monthly => "monthly",
                Self::Weekly => "weekly",
            }
        }

        pub fn parse(raw: &str) -> Option<Self> {
            match raw.trim().to_ascii_lowercase().as_str() {
                "monthly" => Some(Self::Monthly),
                "weekly" => Some(Self::Weekly),
                _ => None,
            }
        }
    }

    /// Request body for `POST /api/recurring`. Never read back by the client.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct RecurringRuleNew {
        pub title: String,
        pub amount: f64,
        pub category: String,
        pub cadence: Cadence,
        pub next_date: NaiveDate,
        pub kind: Kind,
    }

    /// Response of `POST /api/run-recurring`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct RunRecurringResponse {
        #[serde(default)]
        pub created_dates: Vec<String>,
    }
}

pub mod transfer {
    use super::*;

    /// Response of the bulk upload endpoints (`import-csv`, `restore-json`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ImportResponse {
        #[serde(default)]
        pub inserted: u64,
    }
}

pub mod settings {
    use super::*;

    /// Request body for `POST /api/settings`.
    #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BudgetSettings {
        pub monthly_budget: f64,
    }
}
