//! Client-side query state: the transaction filter and the selected month.
//!
//! Both live for the whole session, start from their defaults, and are only
//! changed by explicit user input. Nothing here is persisted.

use api_types::Kind;
use chrono::{Datelike, Months, NaiveDate};

/// Number of month buckets offered by the month selector.
pub const MONTHS_OFFERED: usize = 12;

/// Filters applied to the transaction table and to CSV exports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub category: Option<String>,
    pub kind: Option<Kind>,
}

impl FilterState {
    /// Search text as sent to the server, `None` when blank.
    pub fn search_text(&self) -> Option<&str> {
        non_blank(&self.query)
    }

    /// Category filter, `None` when unset or blank.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().and_then(non_blank)
    }

    pub fn is_empty(&self) -> bool {
        self.search_text().is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.category_name().is_none()
            && self.kind.is_none()
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Period the summary and charts are computed for.
///
/// Both fields absent means "let the server pick the current period".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodSelection {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl PeriodSelection {
    pub const CURRENT: PeriodSelection = PeriodSelection {
        year: None,
        month: None,
    };

    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
        }
    }

    /// Decodes a selector value such as `2026-3`.
    ///
    /// Anything that is not `<year>-<month 1..=12>` falls back to the current
    /// period.
    pub fn from_selector_value(value: &str) -> Self {
        let Some((year, month)) = value.trim().split_once('-') else {
            return Self::CURRENT;
        };
        match (year.parse::<i32>(), month.parse::<u32>()) {
            (Ok(year), Ok(month)) if (1..=12).contains(&month) => Self::new(year, month),
            _ => Self::CURRENT,
        }
    }

    /// Encodes the period the way the selector stores it (`2026-3`).
    pub fn selector_value(&self) -> Option<String> {
        Some(format!("{}-{}", self.year?, self.month?))
    }
}

/// One entry of the month selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOption {
    /// Human readable label, e.g. `Oct 2026`.
    pub label: String,
    /// Encoded `year-month` pair, e.g. `2026-10`.
    pub value: String,
}

/// The month selector: the twelve most recent months, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthSelector {
    options: Vec<MonthOption>,
    selected: usize,
}

impl MonthSelector {
    /// Builds the selector ending at the month containing `today`, with that
    /// month selected.
    pub fn populate(today: NaiveDate) -> Self {
        let first = today.with_day(1).unwrap_or(today);
        let options = (0..MONTHS_OFFERED as u32)
            .filter_map(|offset| first.checked_sub_months(Months::new(offset)))
            .map(|date| MonthOption {
                label: date.format("%b %Y").to_string(),
                value: format!("{}-{}", date.year(), date.month()),
            })
            .collect();

        Self {
            options,
            selected: 0,
        }
    }

    pub fn options(&self) -> &[MonthOption] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&MonthOption> {
        self.options.get(self.selected)
    }

    /// Resolves the selection into a period; an empty selector means the
    /// current period.
    pub fn period(&self) -> PeriodSelection {
        self.selected()
            .map(|option| PeriodSelection::from_selector_value(&option.value))
            .unwrap_or(PeriodSelection::CURRENT)
    }

    /// Selects the option at `index`; out of range indexes are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.options.len() && index != self.selected {
            self.selected = index;
            return true;
        }
        false
    }

    /// Moves one month back in time (down the list).
    pub fn select_older(&mut self) -> bool {
        self.select(self.selected + 1)
    }

    /// Moves one month forward in time (up the list).
    pub fn select_newer(&mut self) -> bool {
        match self.selected.checked_sub(1) {
            Some(index) => self.select(index),
            None => false,
        }
    }
}
