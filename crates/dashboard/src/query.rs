//! Query string encoding for filter and period state.
//!
//! Absent or blank fields are skipped entirely: the server treats `q=` as a
//! filter on the empty string, which is not the same as no filter.

use chrono::NaiveDate;
use serde::Serialize;

use crate::state::{FilterState, PeriodSelection};

#[derive(Debug, Serialize)]
struct TransactionQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    q: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct PeriodQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    m: Option<u32>,
}

/// Encodes `filter` as `q`, `from`, `to`, `category`, `kind` (in that order).
pub fn encode_filter(filter: &FilterState) -> String {
    let query = TransactionQuery {
        q: filter.search_text(),
        from: filter.date_from,
        to: filter.date_to,
        category: filter.category_name(),
        kind: filter.kind.map(|kind| kind.as_str()),
    };
    serde_urlencoded::to_string(&query).unwrap_or_default()
}

/// Encodes `period` as `y`, `m`.
pub fn encode_period(period: &PeriodSelection) -> String {
    let query = PeriodQuery {
        y: period.year,
        m: period.month,
    };
    serde_urlencoded::to_string(&query).unwrap_or_default()
}

/// Appends `query` to `path`, leaving the path untouched when it is empty.
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}
