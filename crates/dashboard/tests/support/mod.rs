//! In-process stand-in for the expense tracker backend.
//!
//! Implements every endpoint the dashboard calls on top of an in-memory
//! store, records each request line (`METHOD /path?query`) and can be told to
//! fail writes or the categories endpoint.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    net::SocketAddr,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use api_types::{
    recurring::{Cadence, RecurringRuleNew},
    settings::BudgetSettings,
    summary::{CategoryTotal, SummaryResult, Totals, TrendBucket},
    transaction::{Transaction, TransactionNew},
};
use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{Datelike, Months, NaiveDate};
use ledgerdash::{Dashboard, client::Client, money::AmountFormat, views::ChartRegistry};
use serde_json::json;
use uuid::Uuid;

/// Month the fake server treats as "now" when no period is requested.
pub const SERVER_MONTH: (i32, u32) = (2026, 10);

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[derive(Debug, Default)]
pub struct Backend {
    pub transactions: Vec<Transaction>,
    next_id: i64,
    pub budget: f64,
    pub rules: Vec<RecurringRuleNew>,
    pub requests: Vec<String>,
    pub uploads: Vec<String>,
    /// When set, every write answers with this status and body.
    pub fail_writes: Option<(StatusCode, String)>,
    pub fail_categories: bool,
    /// When set, `GET /api/expenses` answers 500.
    pub fail_listing: bool,
    /// When set, the CSV export answers with these bytes verbatim.
    pub raw_export: Option<Vec<u8>>,
}

impl Backend {
    pub fn insert(&mut self, date: &str, title: &str, amount: f64, category: &str, kind: &str) -> i64 {
        self.next_id += 1;
        self.transactions.push(Transaction {
            id: self.next_id,
            date: date.to_string(),
            title: title.to_string(),
            category: (!category.is_empty()).then(|| category.to_string()),
            kind: kind.to_string(),
            amount,
            notes: None,
        });
        self.next_id
    }

    fn write_failure(&self) -> Option<Response> {
        self.fail_writes
            .clone()
            .map(|(status, body)| (status, body).into_response())
    }

    fn filtered(&self, params: &HashMap<String, String>) -> Vec<Transaction> {
        let param = |key: &str| params.get(key).map(String::as_str).filter(|v| !v.is_empty());
        let mut rows: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|tx| {
                param("q").is_none_or(|q| tx.title.to_lowercase().contains(&q.to_lowercase()))
                    && param("from").is_none_or(|from| tx.date.as_str() >= from)
                    && param("to").is_none_or(|to| tx.date.as_str() <= to)
                    && param("category").is_none_or(|c| tx.category.as_deref() == Some(c))
                    && param("kind").is_none_or(|kind| tx.kind == kind)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        rows
    }

    fn summary(&self, y: Option<i32>, m: Option<u32>) -> SummaryResult {
        let (y, m) = match (y, m) {
            (Some(y), Some(m)) => (y, m),
            _ => SERVER_MONTH,
        };
        let month = format!("{y}-{m:02}");

        let mut totals = Totals::default();
        let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for tx in &self.transactions {
            let in_month = tx.date.starts_with(&month);
            if tx.kind == "income" {
                if in_month {
                    totals.income += tx.amount;
                }
                continue;
            }
            if in_month {
                totals.expense += tx.amount;
                let category = tx.category.clone().unwrap_or_else(|| "Uncategorized".into());
                *by_category.entry(category).or_default() += tx.amount;
            }
            if let Ok(date) = NaiveDate::parse_from_str(&tx.date, "%Y-%m-%d") {
                *by_month.entry((date.year(), date.month())).or_default() += tx.amount;
            }
        }

        let mut categories: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, amount)| CategoryTotal { category, amount })
            .collect();
        categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        SummaryResult {
            month: Some(month),
            totals,
            budget: self.budget,
            categories,
            trend: by_month
                .into_iter()
                .map(|((y, m), amount)| TrendBucket { y, m, amount })
                .collect(),
        }
    }
}

type Shared = Arc<Mutex<Backend>>;

pub struct TestServer {
    pub addr: SocketAddr,
    state: Shared,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Shared::default();

        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> Client {
        Client::new(&self.url()).unwrap()
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.client(), AmountFormat::default(), ChartRegistry::new())
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut Backend) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    /// Request lines recorded since the last call.
    pub fn take_requests(&self) -> Vec<String> {
        self.with(|backend| std::mem::take(&mut backend.requests))
    }
}

/// A fresh directory under `target/test_files`.
pub fn temp_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_files")
        .join(Uuid::new_v4().to_string());
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/categories", get(categories))
        .route("/api/summary", get(summary))
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route("/api/expenses/{id}", put(update_expense).delete(delete_expense))
        .route("/api/recurring", post(create_recurring))
        .route("/api/run-recurring", post(run_recurring))
        .route("/api/import-csv", post(import_csv))
        .route("/api/restore-json", post(restore_json))
        .route("/api/settings", post(save_settings))
        .route("/api/export-csv", get(export_csv))
        .route("/api/backup-json", get(backup_json))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri());
    state.lock().unwrap().requests.push(line);
    next.run(request).await
}

async fn ping() -> &'static str {
    "pong"
}

async fn categories(State(state): State<Shared>) -> Response {
    let backend = state.lock().unwrap();
    if backend.fail_categories {
        return (StatusCode::INTERNAL_SERVER_ERROR, "categories unavailable").into_response();
    }
    let names: BTreeSet<String> = backend
        .transactions
        .iter()
        .filter_map(|tx| tx.category.clone())
        .collect();
    Json(names.into_iter().collect::<Vec<_>>()).into_response()
}

async fn summary(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let y = params.get("y").and_then(|y| y.parse().ok());
    let m = params.get("m").and_then(|m| m.parse().ok());
    Json(state.lock().unwrap().summary(y, m)).into_response()
}

async fn list_expenses(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let backend = state.lock().unwrap();
    if backend.fail_listing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "db busy").into_response();
    }
    Json(backend.filtered(&params)).into_response()
}

async fn create_expense(State(state): State<Shared>, Json(payload): Json<TransactionNew>) -> Response {
    let mut backend = state.lock().unwrap();
    if let Some(failure) = backend.write_failure() {
        return failure;
    }
    if payload.title.is_empty() || payload.amount == 0.0 {
        return (StatusCode::BAD_REQUEST, "title and amount are required").into_response();
    }
    let id = backend.insert(
        &payload.date.to_string(),
        &payload.title,
        payload.amount,
        &payload.category,
        payload.kind.as_str(),
    );
    (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
}

async fn update_expense(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(payload): Json<TransactionNew>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Some(failure) = backend.write_failure() {
        return failure;
    }
    let Some(tx) = backend.transactions.iter_mut().find(|tx| tx.id == id) else {
        return (StatusCode::NOT_FOUND, "transaction not found").into_response();
    };
    tx.date = payload.date.to_string();
    tx.title = payload.title;
    tx.amount = payload.amount;
    tx.category = (!payload.category.is_empty()).then_some(payload.category);
    tx.kind = payload.kind.as_str().to_string();
    tx.notes = Some(payload.notes);
    Json(json!({ "ok": true })).into_response()
}

async fn delete_expense(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut backend = state.lock().unwrap();
    if let Some(failure) = backend.write_failure() {
        return failure;
    }
    backend.transactions.retain(|tx| tx.id != id);
    Json(json!({ "ok": true })).into_response()
}

async fn create_recurring(
    State(state): State<Shared>,
    Json(rule): Json<RecurringRuleNew>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Some(failure) = backend.write_failure() {
        return failure;
    }
    backend.rules.push(rule);
    (StatusCode::CREATED, Json(json!({ "ok": true }))).into_response()
}

/// Books every rule due on or before the fake "today" and advances it.
async fn run_recurring(State(state): State<Shared>) -> Response {
    let mut backend = state.lock().unwrap();
    if let Some(failure) = backend.write_failure() {
        return failure;
    }
    let mut created = Vec::new();
    let mut rules = std::mem::take(&mut backend.rules);
    for rule in &mut rules {
        while rule.next_date <= today() {
            let date = rule.next_date.to_string();
            backend.insert(&date, &rule.title, rule.amount, &rule.category, rule.kind.as_str());
            created.push(date);
            rule.next_date = match rule.cadence {
                Cadence::Monthly => rule.next_date + Months::new(1),
                Cadence::Weekly => rule.next_date + chrono::Days::new(7),
            };
        }
    }
    backend.rules = rules;
    Json(json!({ "created_dates": created })).into_response()
}

async fn read_upload(mut multipart: Multipart) -> (String, String) {
    let field = multipart.next_field().await.unwrap().unwrap();
    assert_eq!(field.name(), Some("file"));
    let name = field.file_name().unwrap_or_default().to_string();
    let text = field.text().await.unwrap();
    (name, text)
}

/// Accepts `date,title,amount,category,kind` rows after a header line.
async fn import_csv(State(state): State<Shared>, multipart: Multipart) -> Response {
    let (name, text) = read_upload(multipart).await;
    let mut backend = state.lock().unwrap();
    if let Some(failure) = backend.write_failure() {
        return failure;
    }
    backend.uploads.push(name);
    let mut inserted = 0;
    for line in text.lines().skip(1).filter(|line| !line.trim().is_empty()) {
        let cols: Vec<&str> = line.split(',').map(str::trim).collect();
        let [date, title, amount, category, kind] = cols.as_slice() else {
            continue;
        };
        let amount = amount.parse().unwrap_or(0.0);
        backend.insert(date, title, amount, category, kind);
        inserted += 1;
    }
    Json(json!({ "inserted": inserted })).into_response()
}

/// Replaces every transaction with the uploaded JSON array.
async fn restore_json(State(state): State<Shared>, multipart: Multipart) -> Response {
    let (name, text) = read_upload(multipart).await;
    let Ok(rows) = serde_json::from_str::<Vec<Transaction>>(&text) else {
        return (StatusCode::BAD_REQUEST, "invalid backup").into_response();
    };
    let mut backend = state.lock().unwrap();
    if let Some(failure) = backend.write_failure() {
        return failure;
    }
    backend.uploads.push(name);
    backend.transactions.clear();
    for tx in &rows {
        let category = tx.category.clone().unwrap_or_default();
        backend.insert(&tx.date, &tx.title, tx.amount, &category, &tx.kind);
    }
    Json(json!({ "inserted": rows.len() })).into_response()
}

async fn save_settings(
    State(state): State<Shared>,
    Json(settings): Json<BudgetSettings>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Some(failure) = backend.write_failure() {
        return failure;
    }
    backend.budget = settings.monthly_budget;
    Json(json!({ "ok": true })).into_response()
}

async fn export_csv(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let rows = {
        let backend = state.lock().unwrap();
        if let Some(raw) = backend.raw_export.clone() {
            return ([(header::CONTENT_TYPE, "text/csv")], raw).into_response();
        }
        backend.filtered(&params)
    };
    let mut body = String::from("id,date,title,amount,category,kind\n");
    for tx in rows {
        body.push_str(&format!(
            "{},{},{},{},{},{}\n",
            tx.id,
            tx.date,
            tx.title,
            tx.amount,
            tx.category.unwrap_or_default(),
            tx.kind
        ));
    }
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"expenses_20261019_1200.csv\"",
            ),
        ],
        body,
    )
        .into_response()
}

/// Served without a file name so the client falls back to its default.
async fn backup_json(State(state): State<Shared>) -> Response {
    let rows = state.lock().unwrap().transactions.clone();
    let body = serde_json::to_string(&rows).unwrap();
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
