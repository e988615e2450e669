use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::{
    client::{ApiError, Client},
    commands::{
        Action, BudgetForm, Command, DownloadKind, FilterForm, RecurringForm, RefreshSet,
        TransactionForm,
    },
    config::AppConfig,
    dashboard::{Dashboard, Outcome},
    error::{AppError, Result},
    money::AmountFormat,
    state::FilterState,
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
    views::ChartRegistry,
};

const TOAST_TTL: Duration = Duration::from_secs(4);

const TRANSACTION_FIELDS: &[&str] = &["Kind", "Title", "Amount", "Category", "Date", "Notes"];
const RECURRING_FIELDS: &[&str] = &["Title", "Amount", "Category", "Cadence", "Next date", "Kind"];
const FILTER_FIELDS: &[&str] = &["Search", "From", "To", "Category", "Kind"];
const BUDGET_FIELDS: &[&str] = &["Monthly budget"];
const PATH_FIELDS: &[&str] = &["File path"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    AddTransaction,
    EditTransaction(i64),
    Filter,
    Recurring,
    Budget,
    ImportCsv,
    RestoreBackup,
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::AddTransaction => "Add transaction",
            Self::EditTransaction(_) => "Edit transaction",
            Self::Filter => "Filter transactions",
            Self::Recurring => "Add recurring rule",
            Self::Budget => "Monthly budget",
            Self::ImportCsv => "Import CSV",
            Self::RestoreBackup => "Restore JSON backup",
        }
    }

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::AddTransaction | Self::EditTransaction(_) => TRANSACTION_FIELDS,
            Self::Filter => FILTER_FIELDS,
            Self::Recurring => RECURRING_FIELDS,
            Self::Budget => BUDGET_FIELDS,
            Self::ImportCsv | Self::RestoreBackup => PATH_FIELDS,
        }
    }
}

/// An open form: one text value per label of its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub kind: FormKind,
    pub values: Vec<String>,
    pub focus: usize,
    /// Last error reported for this form.
    pub message: Option<String>,
}

impl FormState {
    pub fn new(kind: FormKind, mut values: Vec<String>) -> Self {
        values.resize(kind.labels().len(), String::new());
        Self {
            kind,
            values,
            focus: 0,
            message: None,
        }
    }

    pub fn blank(kind: FormKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn with_transaction(kind: FormKind, form: &TransactionForm) -> Self {
        let values = vec![
            form.kind.clone(),
            form.title.clone(),
            form.amount.clone(),
            form.category.clone(),
            form.date.clone(),
            form.notes.clone(),
        ];
        Self::new(kind, values)
    }

    pub fn with_recurring(form: &RecurringForm) -> Self {
        let values = vec![
            form.title.clone(),
            form.amount.clone(),
            form.category.clone(),
            form.cadence.clone(),
            form.next_date.clone(),
            form.kind.clone(),
        ];
        Self::new(FormKind::Recurring, values)
    }

    pub fn with_filter(form: &FilterForm) -> Self {
        let values = vec![
            form.query.clone(),
            form.date_from.clone(),
            form.date_to.clone(),
            form.category.clone(),
            form.kind.clone(),
        ];
        Self::new(FormKind::Filter, values)
    }

    /// Label and current value of every field, in display order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.kind
            .labels()
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    fn value(&self, index: usize) -> String {
        self.values.get(index).cloned().unwrap_or_default()
    }

    fn next_field(&mut self) {
        if !self.values.is_empty() {
            self.focus = (self.focus + 1) % self.values.len();
        }
    }

    fn prev_field(&mut self) {
        if !self.values.is_empty() {
            self.focus = (self.focus + self.values.len() - 1) % self.values.len();
        }
    }

    fn active_mut(&mut self) -> Option<&mut String> {
        self.values.get_mut(self.focus)
    }

    pub fn transaction(&self) -> TransactionForm {
        TransactionForm {
            kind: self.value(0),
            title: self.value(1),
            amount: self.value(2),
            category: self.value(3),
            date: self.value(4),
            notes: self.value(5),
        }
    }

    pub fn recurring(&self) -> RecurringForm {
        RecurringForm {
            title: self.value(0),
            amount: self.value(1),
            category: self.value(2),
            cadence: self.value(3),
            next_date: self.value(4),
            kind: self.value(5),
        }
    }

    pub fn filter(&self) -> FilterForm {
        FilterForm {
            query: self.value(0),
            date_from: self.value(1),
            date_to: self.value(2),
            category: self.value(3),
            kind: self.value(4),
        }
    }

    /// The mutation this form submits; `None` for the filter form.
    pub fn command(&self) -> Option<Command> {
        let command = match self.kind {
            FormKind::AddTransaction => Command::CreateTransaction(self.transaction()),
            FormKind::EditTransaction(id) => Command::UpdateTransaction {
                id,
                form: self.transaction(),
            },
            FormKind::Recurring => Command::CreateRecurring(self.recurring()),
            FormKind::Budget => Command::SaveBudget(BudgetForm {
                monthly_budget: self.value(0),
            }),
            FormKind::ImportCsv => Command::ImportCsv {
                path: PathBuf::from(self.value(0).trim()),
            },
            FormKind::RestoreBackup => Command::RestoreBackup {
                path: PathBuf::from(self.value(0).trim()),
            },
            FormKind::Filter => return None,
        };
        Some(command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Form(FormState),
    ConfirmDelete { id: i64, title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
}

impl ToastState {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_TTL
    }
}

#[derive(Debug)]
pub struct AppState {
    pub mode: Mode,
    pub toast: Option<ToastState>,
    pub base_url: String,
}

pub struct App {
    config: AppConfig,
    dashboard: Dashboard,
    pub state: AppState,
    transaction_draft: TransactionForm,
    recurring_draft: RecurringForm,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let format = AmountFormat::new(config.grouping, config.currency_symbol.clone());
        let dashboard = Dashboard::new(client, format, ChartRegistry::new());
        let state = AppState {
            mode: Mode::Browse,
            toast: None,
            base_url: config.base_url.clone(),
        };

        Ok(Self {
            config,
            dashboard,
            state,
            transaction_draft: TransactionForm::default(),
            recurring_draft: RecurringForm::default(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let init = self.dashboard.init(today()).await;
        self.report(init);
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            if self.state.toast.as_ref().is_some_and(ToastState::expired) {
                self.state.toast = None;
            }

            terminal
                .draw(|frame| ui::render(frame, &self.dashboard, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await?
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return Ok(());
        }

        match self.state.mode {
            Mode::Browse => self.handle_browse(action).await,
            Mode::Form(_) => self.handle_form(action).await,
            Mode::ConfirmDelete { .. } => self.handle_confirm(action).await,
        }
        Ok(())
    }

    async fn handle_browse(&mut self, action: AppAction) {
        match action {
            AppAction::Up | AppAction::Input('k') => self.dashboard.table_mut().select_prev(),
            AppAction::Down | AppAction::Input('j') => self.dashboard.table_mut().select_next(),
            AppAction::Left | AppAction::Input('[') => self.shift_month(true).await,
            AppAction::Right | AppAction::Input(']') => self.shift_month(false).await,
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Input('a') => {
                let form = FormState::with_transaction(
                    FormKind::AddTransaction,
                    &self.transaction_draft,
                );
                self.open_form(form);
            }
            AppAction::Input('e') => {
                if let Some(row) = self.dashboard.table().selected() {
                    let form = FormState::with_transaction(
                        FormKind::EditTransaction(row.id),
                        &TransactionForm::from_row(row),
                    );
                    self.open_form(form);
                }
            }
            AppAction::Input('d') => {
                if let Some(row) = self.dashboard.table().selected() {
                    self.state.mode = Mode::ConfirmDelete {
                        id: row.id,
                        title: row.title.clone(),
                    };
                }
            }
            AppAction::Input('f' | '/') => {
                let form = FormState::with_filter(&FilterForm::from_state(self.dashboard.filter()));
                self.open_form(form);
            }
            AppAction::Input('c') => {
                if !self.dashboard.filter().is_empty() {
                    let result = self.dashboard.apply_filter(FilterState::default()).await;
                    self.report(result);
                }
            }
            AppAction::Input('m') => {
                let form = FormState::with_recurring(&self.recurring_draft);
                self.open_form(form);
            }
            AppAction::Input('u') => self.run_command(Command::RunRecurring).await,
            AppAction::Input('b') => {
                let budget = self
                    .dashboard
                    .budget()
                    .filter(|budget| *budget > 0.0)
                    .map(|budget| budget.to_string())
                    .unwrap_or_default();
                self.open_form(FormState::new(FormKind::Budget, vec![budget]));
            }
            AppAction::Input('i') => self.open_form(FormState::blank(FormKind::ImportCsv)),
            AppAction::Input('o') => self.open_form(FormState::blank(FormKind::RestoreBackup)),
            AppAction::Input('x') => self.download(DownloadKind::ExportCsv).await,
            AppAction::Input('s') => self.download(DownloadKind::BackupJson).await,
            AppAction::Input('r') => {
                let summary = RefreshSet {
                    summary: true,
                    ..RefreshSet::NONE
                };
                let result = self.dashboard.refresh(summary).await;
                if result.is_ok() {
                    self.toast(ToastLevel::Info, "Summary refreshed");
                }
                self.report(result);
            }
            _ => {}
        }
    }

    async fn handle_form(&mut self, action: AppAction) {
        let Mode::Form(form) = &mut self.state.mode else {
            return;
        };

        match action {
            AppAction::Cancel => {
                let form = form.clone();
                self.keep_draft(&form);
                self.state.mode = Mode::Browse;
            }
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::PrevField | AppAction::Up => form.prev_field(),
            AppAction::Backspace => {
                if let Some(value) = form.active_mut() {
                    value.pop();
                }
            }
            AppAction::Input(ch) => {
                if let Some(value) = form.active_mut() {
                    value.push(ch);
                }
            }
            AppAction::Submit => {
                let form = form.clone();
                self.submit(form).await;
            }
            _ => {}
        }
    }

    async fn handle_confirm(&mut self, action: AppAction) {
        let Mode::ConfirmDelete { id, .. } = self.state.mode else {
            return;
        };

        match action {
            AppAction::Submit | AppAction::Input('y') => {
                self.state.mode = Mode::Browse;
                self.run_command(Command::DeleteTransaction { id }).await;
            }
            AppAction::Cancel | AppAction::Input('n') => self.state.mode = Mode::Browse,
            _ => {}
        }
    }

    fn open_form(&mut self, form: FormState) {
        self.state.mode = Mode::Form(form);
    }

    /// Create forms keep their input when dismissed.
    fn keep_draft(&mut self, form: &FormState) {
        match form.kind {
            FormKind::AddTransaction => self.transaction_draft = form.transaction(),
            FormKind::Recurring => self.recurring_draft = form.recurring(),
            _ => {}
        }
    }

    fn clear_draft(&mut self, action: Action) {
        match action {
            Action::CreateTransaction => self.transaction_draft = TransactionForm::default(),
            Action::CreateRecurring => self.recurring_draft = RecurringForm::default(),
            _ => {}
        }
    }

    async fn submit(&mut self, form: FormState) {
        if let Some(command) = form.command() {
            self.run_command(command).await;
            return;
        }

        match form.filter().collect() {
            Ok(filter) => {
                self.state.mode = Mode::Browse;
                let result = self.dashboard.apply_filter(filter).await;
                self.report(result);
            }
            Err(err) => self.fail(err.to_string()),
        }
    }

    /// Runs a mutation. On failure an open form stays open with its input.
    async fn run_command(&mut self, command: Command) {
        match self.dashboard.dispatch(command, today()).await {
            Ok(outcome) => self.accept(outcome),
            Err(err) => self.fail(err.to_string()),
        }
    }

    /// Closes the form of an accepted write. The draft is cleared even when
    /// the reload afterwards failed, so resubmitting cannot duplicate it.
    fn accept(&mut self, outcome: Outcome) {
        if outcome.action.clears_form() {
            self.clear_draft(outcome.action);
        }
        self.state.mode = Mode::Browse;
        match outcome.refresh {
            Ok(()) => self.toast(ToastLevel::Success, outcome.message),
            Err(err) => self.toast(
                ToastLevel::Error,
                format!("{}, but reload failed: {err}", outcome.message),
            ),
        }
    }

    async fn download(&mut self, kind: DownloadKind) {
        let dir = PathBuf::from(&self.config.download_dir);
        match self.dashboard.download(kind, &dir).await {
            Ok(path) => self.toast(ToastLevel::Success, format!("Saved {}", path.display())),
            Err(err) => self.fail(err.to_string()),
        }
    }

    async fn shift_month(&mut self, older: bool) {
        let months = self.dashboard.months();
        let current = months.selected_index();
        let index = if older {
            current + 1
        } else {
            match current.checked_sub(1) {
                Some(index) => index,
                None => return,
            }
        };
        if index >= months.options().len() {
            return;
        }

        let result = self.dashboard.select_month(index).await;
        self.report(result);
    }

    fn report(&mut self, result: std::result::Result<(), ApiError>) {
        if let Err(err) = result {
            tracing::warn!("load failed: {err}");
            self.fail(err.to_string());
        }
    }

    fn fail(&mut self, message: String) {
        if let Mode::Form(form) = &mut self.state.mode {
            form.message = Some(message.clone());
        }
        self.toast(ToastLevel::Error, message);
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.state.toast = Some(ToastState::new(level, message));
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
