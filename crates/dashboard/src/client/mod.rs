//! The API gateway: every network call of the dashboard goes through
//! [`Client::request`].
//!
//! A non-success status is turned into [`ApiError::Status`] carrying the
//! response body as message. Successful bodies are decoded as JSON when the
//! server declares `application/json`, and returned as text otherwise. File
//! downloads skip decoding and keep the raw bytes. Requests are never retried.

use std::path::Path;

use api_types::{
    recurring::{RecurringRuleNew, RunRecurringResponse},
    settings::BudgetSettings,
    summary::SummaryResult,
    transaction::{Transaction, TransactionCreated, TransactionNew},
    transfer::ImportResponse,
};
use reqwest::{
    Method, StatusCode, Url,
    header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap},
    multipart,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    query::{encode_filter, encode_period, with_query},
    state::{FilterState, PeriodSelection},
};

const DEFAULT_ERROR_MESSAGE: &str = "API error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("cannot read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A successfully decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Text(String),
}

impl Body {
    /// Decodes a JSON body into `T`. A text body is decoded as JSON too, so a
    /// server that forgets the content type still works for typed calls.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Body::Json(value) => Ok(serde_json::from_value(value)?),
            Body::Text(text) => Ok(serde_json::from_str(&text)?),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Body::Json(value) => value.to_string(),
            Body::Text(text) => text,
        }
    }
}

/// Payload of a request.
#[derive(Debug)]
pub enum Payload {
    Json(serde_json::Value),
    /// Multipart upload with a single `file` field.
    File { file_name: String, bytes: Vec<u8> },
}

#[derive(Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub payload: Option<Payload>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            payload: None,
        }
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            payload: None,
        }
    }

    pub fn put() -> Self {
        Self {
            method: Method::PUT,
            payload: None,
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            payload: None,
        }
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        self.payload = Some(Payload::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    pub fn file(mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.payload = Some(Payload::File {
            file_name: file_name.into(),
            bytes,
        });
        self
    }
}

/// A file body returned by a download endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// File name suggested by the server, if any.
    pub file_name: Option<String>,
    /// Body exactly as received.
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base_url =
            Url::parse(base_url).map_err(|err| ApiError::Url(format!("{base_url}: {err}")))?;
        // Without the trailing slash, join would replace the last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an API path (with optional query) below the base URL,
    /// keeping any path prefix the base carries.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Url(format!("{path}: {err}")))
    }

    /// Sends one request and normalizes the outcome.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Body, ApiError> {
        let (headers, bytes) = self.send(path, options).await?;
        if is_json(&headers) {
            return Ok(Body::Json(serde_json::from_slice(&bytes)?));
        }
        Ok(Body::Text(String::from_utf8_lossy(&bytes).into_owned()))
    }

    async fn send(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<(HeaderMap, Vec<u8>), ApiError> {
        let endpoint = self.url(path)?;
        let method = options.method;
        let mut req = self.http.request(method.clone(), endpoint);

        match options.payload {
            Some(Payload::Json(value)) => req = req.json(&value),
            Some(Payload::File { file_name, bytes }) => {
                let part = multipart::Part::bytes(bytes).file_name(file_name);
                req = req.multipart(multipart::Form::new().part("file", part));
            }
            None => {}
        }

        let res = req.send().await.map_err(|err| {
            tracing::debug!("request failed: {method} {path}: {err}");
            ApiError::Network(err)
        })?;

        let status = res.status();
        let headers = res.headers().clone();
        tracing::debug!("{method} {path} -> {status}");

        let bytes = res.bytes().await?.to_vec();
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            let message = if text.trim().is_empty() {
                DEFAULT_ERROR_MESSAGE.to_string()
            } else {
                text.into_owned()
            };
            return Err(ApiError::Status { status, message });
        }

        Ok((headers, bytes))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(path, RequestOptions::get()).await?.decode()
    }

    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("api/categories").await
    }

    pub async fn summary(&self, period: &PeriodSelection) -> Result<SummaryResult, ApiError> {
        self.get_json(&with_query("api/summary", &encode_period(period)))
            .await
    }

    pub async fn transactions(&self, filter: &FilterState) -> Result<Vec<Transaction>, ApiError> {
        self.get_json(&with_query("api/expenses", &encode_filter(filter)))
            .await
    }

    pub async fn create_transaction(
        &self,
        payload: &TransactionNew,
    ) -> Result<TransactionCreated, ApiError> {
        self.request("api/expenses", RequestOptions::post().json(payload)?)
            .await?
            .decode()
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        payload: &TransactionNew,
    ) -> Result<(), ApiError> {
        self.request(&format!("api/expenses/{id}"), RequestOptions::put().json(payload)?)
            .await?;
        Ok(())
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        self.request(&format!("api/expenses/{id}"), RequestOptions::delete())
            .await?;
        Ok(())
    }

    pub async fn create_recurring(&self, rule: &RecurringRuleNew) -> Result<(), ApiError> {
        self.request("api/recurring", RequestOptions::post().json(rule)?)
            .await?;
        Ok(())
    }

    pub async fn run_recurring(&self) -> Result<RunRecurringResponse, ApiError> {
        self.request("api/run-recurring", RequestOptions::post())
            .await?
            .decode()
    }

    pub async fn import_csv(&self, path: &Path) -> Result<ImportResponse, ApiError> {
        self.upload("api/import-csv", path).await
    }

    pub async fn restore_json(&self, path: &Path) -> Result<ImportResponse, ApiError> {
        self.upload("api/restore-json", path).await
    }

    async fn upload(&self, endpoint: &str, path: &Path) -> Result<ImportResponse, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        self.request(endpoint, RequestOptions::post().file(file_name, bytes))
            .await?
            .decode()
    }

    pub async fn save_budget(&self, monthly_budget: f64) -> Result<(), ApiError> {
        let payload = BudgetSettings { monthly_budget };
        self.request("api/settings", RequestOptions::post().json(&payload)?)
            .await?;
        Ok(())
    }

    /// Fetches a file endpoint; the body is kept as raw bytes.
    pub async fn download(&self, path: &str) -> Result<Download, ApiError> {
        let (headers, content) = self.send(path, RequestOptions::get()).await?;
        Ok(Download {
            file_name: attachment_name(&headers),
            content,
        })
    }

    pub async fn export_csv(&self, filter: &FilterState) -> Result<Download, ApiError> {
        self.download(&with_query("api/export-csv", &encode_filter(filter)))
            .await
    }

    pub async fn backup_json(&self) -> Result<Download, ApiError> {
        self.download("api/backup-json").await
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

/// Extracts `filename` from a `Content-Disposition: attachment` header.
fn attachment_name(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    value.split(';').find_map(|part| {
        let (key, name) = part.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = name.trim().trim_matches('"');
        // Downloads are written under the configured directory only.
        let name = Path::new(name).file_name()?.to_str()?;
        (!name.is_empty()).then(|| name.to_string())
    })
}
