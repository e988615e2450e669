use std::{fs::OpenOptions, sync::Mutex};

use ledgerdash::{
    app::App,
    config::{self, AppConfig},
    error::{AppError, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;

    tracing::info!("Starting dashboard against {}", config.base_url);
    let mut app = App::new(config)?;
    app.run().await?;
    Ok(())
}

/// The terminal is owned by the UI, so logs go to a file.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledgerdash={level},api_types={level}",
            level = config.level
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
