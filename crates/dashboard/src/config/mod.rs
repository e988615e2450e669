use clap::Parser;
use serde::Deserialize;

use crate::{error::Result, money::Grouping};

const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub currency_symbol: String,
    pub grouping: Grouping,
    /// Directory where CSV exports and JSON backups are written.
    pub download_dir: String,
    pub log_file: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            currency_symbol: "₹".to_string(),
            grouping: Grouping::Indian,
            download_dir: ".".to_string(),
            log_file: "ledgerdash.log".to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ledgerdash", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the directory used for exports and backups.
    #[arg(long)]
    download_dir: Option<String>,
    /// Override the currency symbol shown next to amounts.
    #[arg(long)]
    currency_symbol: Option<String>,
    /// Digit grouping: `indian` (12,34,567) or `western` (1,234,567).
    #[arg(long)]
    grouping: Option<Grouping>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("LEDGERDASH"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(download_dir) = args.download_dir {
        settings.download_dir = download_dir;
    }
    if let Some(currency_symbol) = args.currency_symbol {
        settings.currency_symbol = currency_symbol;
    }
    if let Some(grouping) = args.grouping {
        settings.grouping = grouping;
    }

    Ok(settings)
}
