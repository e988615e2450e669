//! The dashboard controller: owns the render targets and the query state,
//! runs mutation handlers and reloads whatever each action invalidates.
//!
//! Every operation takes `&mut self`, so two loads can never overlap on the
//! same dashboard: the last one started is also the last one applied.

use std::path::{Path, PathBuf};

use api_types::summary::SummaryResult;
use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    client::{ApiError, Client},
    commands::{Action, Command, DownloadKind, FormError, RefreshSet},
    money::AmountFormat,
    state::{FilterState, MonthSelector, PeriodSelection},
    views::{CanvasId, ChartRegistry, ChartSlot, ChartSpec, ChartSurface, SummaryPanel, TransactionTable},
};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("cannot write download: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a mutation the server accepted.
#[derive(Debug)]
pub struct Outcome {
    pub action: Action,
    /// Confirmation shown to the user.
    pub message: String,
    /// Result of reloading the action's refresh set. A failure here does not
    /// undo the write.
    pub refresh: Result<(), ApiError>,
}

pub struct Dashboard<S: ChartSurface = ChartRegistry> {
    client: Client,
    format: AmountFormat,
    surface: S,
    filter: FilterState,
    months: MonthSelector,
    summary: Option<SummaryPanel>,
    budget: Option<f64>,
    category_chart: ChartSlot,
    trend_chart: ChartSlot,
    table: TransactionTable,
    categories: Vec<String>,
}

impl<S: ChartSurface> Dashboard<S> {
    pub fn new(client: Client, format: AmountFormat, surface: S) -> Self {
        Self {
            client,
            format,
            surface,
            filter: FilterState::default(),
            months: MonthSelector::default(),
            summary: None,
            budget: None,
            category_chart: ChartSlot::new(CanvasId::Category),
            trend_chart: ChartSlot::new(CanvasId::Trend),
            table: TransactionTable::default(),
            categories: Vec::new(),
        }
    }

    /// Startup: fills the month selector (current month selected), then
    /// loads categories, the transaction table and the summary.
    pub async fn init(&mut self, today: NaiveDate) -> Result<(), ApiError> {
        self.months = MonthSelector::populate(today);
        self.load_categories().await;
        let transactions = self.load_transactions().await;
        let summary = self.load_summary().await;
        transactions.and(summary)
    }

    /// Reloads the category list. Failures keep the previous list.
    pub async fn load_categories(&mut self) {
        match self.client.categories().await {
            Ok(categories) => self.categories = categories,
            Err(err) => tracing::warn!("failed to load categories: {err}"),
        }
    }

    pub async fn load_transactions(&mut self) -> Result<(), ApiError> {
        let transactions = self.client.transactions(&self.filter).await?;
        tracing::debug!("loaded {} transactions", transactions.len());
        self.table.replace(&transactions, &self.format);
        Ok(())
    }

    /// Reloads the summary panel and both charts for the selected month.
    pub async fn load_summary(&mut self) -> Result<(), ApiError> {
        let period = self.months.period();
        let summary = self.client.summary(&period).await?;
        self.render_summary(&summary);
        Ok(())
    }

    fn render_summary(&mut self, summary: &SummaryResult) {
        self.summary = Some(SummaryPanel::from_summary(summary, &self.format));
        self.budget = Some(summary.budget);
        self.category_chart
            .render(&mut self.surface, ChartSpec::category(summary));
        self.trend_chart
            .render(&mut self.surface, ChartSpec::trend(summary));
    }

    /// Reloads the render targets named by `set`, table first.
    pub async fn refresh(&mut self, set: RefreshSet) -> Result<(), ApiError> {
        if set.transactions {
            self.load_transactions().await?;
        }
        if set.summary {
            self.load_summary().await?;
        }
        if set.categories {
            self.load_categories().await;
        }
        Ok(())
    }

    /// Runs one mutation and its refresh set.
    ///
    /// When the write fails nothing is reloaded and every view keeps its
    /// content. Once the write succeeded the call returns `Ok`, with any
    /// reload failure carried in [`Outcome::refresh`].
    pub async fn dispatch(
        &mut self,
        command: Command,
        today: NaiveDate,
    ) -> Result<Outcome, DashboardError> {
        let action = command.action();
        let message = self.mutate(command, today).await.inspect_err(|err| {
            tracing::warn!("{action:?} failed: {err}");
        })?;
        tracing::info!("{action:?}: {message}");

        let refresh = self.refresh(action.refresh_set()).await;
        if let Err(err) = &refresh {
            tracing::warn!("refresh after {action:?} failed: {err}");
        }
        Ok(Outcome {
            action,
            message,
            refresh,
        })
    }

    async fn mutate(&self, command: Command, today: NaiveDate) -> Result<String, DashboardError> {
        let message = match command {
            Command::CreateTransaction(form) => {
                let payload = form.collect(today)?;
                let created = self.client.create_transaction(&payload).await?;
                tracing::debug!("created transaction {}", created.id);
                "Transaction added".to_string()
            }
            Command::UpdateTransaction { id, form } => {
                let payload = form.collect(today)?;
                self.client.update_transaction(id, &payload).await?;
                "Transaction updated".to_string()
            }
            Command::DeleteTransaction { id } => {
                self.client.delete_transaction(id).await?;
                "Transaction deleted".to_string()
            }
            Command::CreateRecurring(form) => {
                let rule = form.collect(today)?;
                self.client.create_recurring(&rule).await?;
                "Recurring added".to_string()
            }
            Command::RunRecurring => {
                let res = self.client.run_recurring().await?;
                format!("Recurring run. Added dates: {}", res.created_dates.join(","))
            }
            Command::ImportCsv { path } => {
                let res = self.client.import_csv(&path).await?;
                format!("Imported: {}", res.inserted)
            }
            Command::RestoreBackup { path } => {
                let res = self.client.restore_json(&path).await?;
                format!("Restored: {}", res.inserted)
            }
            Command::SaveBudget(form) => {
                let monthly_budget = form.collect()?;
                self.client.save_budget(monthly_budget).await?;
                "Budget saved".to_string()
            }
        };
        Ok(message)
    }

    /// Downloads a file endpoint into `dir` and returns the written path.
    ///
    /// The CSV export honours the current filter. No view is reloaded.
    pub async fn download(&self, kind: DownloadKind, dir: &Path) -> Result<PathBuf, DashboardError> {
        let download = match kind {
            DownloadKind::ExportCsv => self.client.export_csv(&self.filter).await?,
            DownloadKind::BackupJson => self.client.backup_json().await?,
        };
        let file_name = download
            .file_name
            .unwrap_or_else(|| kind.default_file_name().to_string());

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, download.content).await?;
        tracing::info!("{kind:?} written to {}", path.display());
        Ok(path)
    }

    /// Replaces the filter and reloads the transaction table.
    pub async fn apply_filter(&mut self, filter: FilterState) -> Result<(), ApiError> {
        self.filter = filter;
        self.load_transactions().await
    }

    /// Selects a month of the selector and reloads the summary for it.
    pub async fn select_month(&mut self, index: usize) -> Result<(), ApiError> {
        self.months.select(index);
        self.load_summary().await
    }

    pub fn months_mut(&mut self) -> &mut MonthSelector {
        &mut self.months
    }

    pub fn months(&self) -> &MonthSelector {
        &self.months
    }

    pub fn period(&self) -> PeriodSelection {
        self.months.period()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn summary(&self) -> Option<&SummaryPanel> {
        self.summary.as_ref()
    }

    /// Budget reported by the last summary load, used to pre-fill the budget
    /// form.
    pub fn budget(&self) -> Option<f64> {
        self.budget
    }

    pub fn table(&self) -> &TransactionTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TransactionTable {
        &mut self.table
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn chart(&self, canvas: CanvasId) -> &ChartSlot {
        match canvas {
            CanvasId::Category => &self.category_chart,
            CanvasId::Trend => &self.trend_chart,
        }
    }

    pub fn format(&self) -> &AmountFormat {
        &self.format
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
