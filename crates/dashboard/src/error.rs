use thiserror::Error;

use crate::{client::ApiError, dashboard::DashboardError};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Dashboard(#[from] DashboardError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("logging error: {0}")]
    Logging(String),
}
