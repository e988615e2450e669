use api_types::summary::SummaryResult;

use crate::money::AmountFormat;

/// `true` when spending went over a configured (non-zero) budget.
pub fn budget_exceeded(expense: f64, budget: f64) -> bool {
    expense > budget && budget > 0.0
}

/// The summary panel: formatted totals, budget and the optional alert banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryPanel {
    /// `YYYY-MM` resolved by the server, when it reports one.
    pub month: Option<String>,
    pub expense: String,
    pub income: String,
    pub budget: String,
    /// Banner text; `None` hides the banner.
    pub alert: Option<String>,
}

impl SummaryPanel {
    pub fn from_summary(summary: &SummaryResult, format: &AmountFormat) -> Self {
        let expense = summary.totals.expense;
        let budget = summary.budget;

        let alert = budget_exceeded(expense, budget).then(|| {
            format!(
                "Warning: You exceeded your monthly budget by {}",
                format.currency(expense - budget)
            )
        });

        Self {
            month: summary.month.clone(),
            expense: format.amount(expense),
            income: format.amount(summary.totals.income),
            budget: format.amount(budget),
            alert,
        }
    }
}
