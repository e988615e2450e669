//! User actions as data.
//!
//! Every mutation is a [`Command`] carrying the raw form input. Its
//! [`Action`] tag decides which render targets are reloaded once the server
//! accepted the write ([`Action::refresh_set`]).

use std::path::PathBuf;

use api_types::{
    Kind,
    recurring::{Cadence, RecurringRuleNew},
    transaction::TransactionNew,
};
use chrono::NaiveDate;
use thiserror::Error;

use crate::{state::FilterState, views::TransactionRow};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("invalid kind (expected expense or income): {0}")]
    InvalidKind(String),
    #[error("invalid cadence (expected monthly or weekly): {0}")]
    InvalidCadence(String),
}

/// Render targets that must be reloaded after an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSet {
    pub transactions: bool,
    /// Summary panel and both charts, for the selected period.
    pub summary: bool,
    pub categories: bool,
}

impl RefreshSet {
    pub const NONE: RefreshSet = RefreshSet {
        transactions: false,
        summary: false,
        categories: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateTransaction,
    UpdateTransaction,
    DeleteTransaction,
    CreateRecurring,
    RunRecurring,
    ImportCsv,
    RestoreBackup,
    SaveBudget,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::CreateTransaction,
        Action::UpdateTransaction,
        Action::DeleteTransaction,
        Action::CreateRecurring,
        Action::RunRecurring,
        Action::ImportCsv,
        Action::RestoreBackup,
        Action::SaveBudget,
    ];

    pub const fn refresh_set(self) -> RefreshSet {
        match self {
            Action::CreateTransaction | Action::UpdateTransaction => RefreshSet {
                transactions: true,
                summary: true,
                categories: true,
            },
            Action::DeleteTransaction | Action::RunRecurring | Action::RestoreBackup => {
                RefreshSet {
                    transactions: true,
                    summary: true,
                    categories: false,
                }
            }
            Action::CreateRecurring => RefreshSet::NONE,
            Action::ImportCsv => RefreshSet {
                transactions: true,
                summary: false,
                categories: false,
            },
            Action::SaveBudget => RefreshSet {
                transactions: false,
                summary: true,
                categories: false,
            },
        }
    }

    /// Whether the originating form is emptied after a successful write.
    pub const fn clears_form(self) -> bool {
        matches!(self, Action::CreateTransaction | Action::CreateRecurring)
    }
}

/// Raw input of the add/edit transaction form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub kind: String,
    pub title: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub notes: String,
}

impl TransactionForm {
    /// Pre-fills the form from a displayed row, for editing.
    pub fn from_row(row: &TransactionRow) -> Self {
        Self {
            kind: row.kind.clone(),
            title: row.title.clone(),
            amount: row.value.to_string(),
            category: row.category.clone(),
            date: row.date.clone(),
            notes: row.notes.clone(),
        }
    }

    /// Builds the request body. Missing required fields are sent as-is and
    /// left to the server to reject.
    pub fn collect(&self, today: NaiveDate) -> Result<TransactionNew, FormError> {
        Ok(TransactionNew {
            kind: parse_kind(&self.kind)?,
            title: self.title.trim().to_string(),
            amount: parse_amount(&self.amount)?,
            category: self.category.trim().to_string(),
            date: parse_date(&self.date, today)?,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Raw input of the recurring rule form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurringForm {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub cadence: String,
    pub next_date: String,
    pub kind: String,
}

impl RecurringForm {
    pub fn collect(&self, today: NaiveDate) -> Result<RecurringRuleNew, FormError> {
        let cadence = if self.cadence.trim().is_empty() {
            Cadence::default()
        } else {
            Cadence::parse(&self.cadence)
                .ok_or_else(|| FormError::InvalidCadence(self.cadence.trim().to_string()))?
        };

        Ok(RecurringRuleNew {
            title: self.title.trim().to_string(),
            amount: parse_amount(&self.amount)?,
            category: self.category.trim().to_string(),
            cadence,
            next_date: parse_date(&self.next_date, today)?,
            kind: parse_kind(&self.kind)?,
        })
    }
}

/// Raw input of the budget field; empty means no budget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetForm {
    pub monthly_budget: String,
}

impl BudgetForm {
    pub fn collect(&self) -> Result<f64, FormError> {
        parse_amount(&self.monthly_budget)
    }
}

/// Raw input of the filter bar. Blank fields are not filtered on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub query: String,
    pub date_from: String,
    pub date_to: String,
    pub category: String,
    pub kind: String,
}

impl FilterForm {
    pub fn from_state(filter: &FilterState) -> Self {
        Self {
            query: filter.query.clone(),
            date_from: filter.date_from.map(|d| d.to_string()).unwrap_or_default(),
            date_to: filter.date_to.map(|d| d.to_string()).unwrap_or_default(),
            category: filter.category.clone().unwrap_or_default(),
            kind: filter.kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
        }
    }

    pub fn collect(&self) -> Result<FilterState, FormError> {
        let kind = match self.kind.trim() {
            "" => None,
            raw => Some(Kind::parse(raw).ok_or_else(|| FormError::InvalidKind(raw.to_string()))?),
        };
        let category = self.category.trim();

        Ok(FilterState {
            query: self.query.trim().to_string(),
            date_from: parse_optional_date(&self.date_from)?,
            date_to: parse_optional_date(&self.date_to)?,
            category: (!category.is_empty()).then(|| category.to_string()),
            kind,
        })
    }
}

/// A user action that writes to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateTransaction(TransactionForm),
    UpdateTransaction { id: i64, form: TransactionForm },
    DeleteTransaction { id: i64 },
    CreateRecurring(RecurringForm),
    RunRecurring,
    ImportCsv { path: PathBuf },
    RestoreBackup { path: PathBuf },
    SaveBudget(BudgetForm),
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::CreateTransaction(_) => Action::CreateTransaction,
            Command::UpdateTransaction { .. } => Action::UpdateTransaction,
            Command::DeleteTransaction { .. } => Action::DeleteTransaction,
            Command::CreateRecurring(_) => Action::CreateRecurring,
            Command::RunRecurring => Action::RunRecurring,
            Command::ImportCsv { .. } => Action::ImportCsv,
            Command::RestoreBackup { .. } => Action::RestoreBackup,
            Command::SaveBudget(_) => Action::SaveBudget,
        }
    }
}

/// File endpoints. Downloading never changes server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    /// CSV of the transactions matching the current filter.
    ExportCsv,
    /// JSON dump of every transaction.
    BackupJson,
}

impl DownloadKind {
    /// File name used when the server does not suggest one.
    pub fn default_file_name(self) -> &'static str {
        match self {
            DownloadKind::ExportCsv => "expenses.csv",
            DownloadKind::BackupJson => "expenses_backup.json",
        }
    }
}

/// Parses a decimal amount; an empty field counts as `0`.
///
/// `,` is a digit grouping separator, as in the displayed amounts
/// (`1,200`, `12,34,567`). A single comma followed by one or two digits and
/// no `.` is read as a decimal comma (`12,5`).
pub fn parse_amount(raw: &str) -> Result<f64, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let invalid = || FormError::InvalidAmount(trimmed.to_string());
    // Grouping never follows the decimal point.
    if let Some((_, fraction)) = trimmed.split_once('.')
        && fraction.contains(',')
    {
        return Err(invalid());
    }
    let normalized = match trimmed.split_once(',') {
        Some((whole, fraction))
            if !trimmed.contains('.')
                && !fraction.contains(',')
                && (1..=2).contains(&fraction.len())
                && fraction.bytes().all(|b| b.is_ascii_digit()) =>
        {
            format!("{whole}.{fraction}")
        }
        _ => trimmed.replace(',', ""),
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(invalid)
}

fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate(trimmed.to_string()))
}

fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::InvalidDate(trimmed.to_string()))
}

fn parse_kind(raw: &str) -> Result<Kind, FormError> {
    if raw.trim().is_empty() {
        return Ok(Kind::default());
    }
    Kind::parse(raw).ok_or_else(|| FormError::InvalidKind(raw.trim().to_string()))
}
