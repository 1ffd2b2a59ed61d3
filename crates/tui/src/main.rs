mod app;
mod client;
mod config;
mod error;
mod export;
mod ui;

use std::sync::Arc;

use crate::error::Result;

/// Logging goes to a file, never to the terminal the UI owns. Nothing is
/// installed unless a log file is configured.
fn init_tracing(config: &config::AppConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "forziere_tui={level},engine={level}",
            level = config.log_level
        ))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;
    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
