//! Entrypoint.

use clap::Parser;
use config::Opts;
use dotenvy::dotenv;
use driver::Driver;
use runtime::{ShutdownSignal, shutdown_channel};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try the default .env file, and ignore if it doesn't exist.
        dotenv().ok();
    }

    let opts = Opts::parse();
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    info!("🔎 Logscope starting...");

    let contract = opts.contract.clone();
    let driver = Driver::new(opts).await?;

    let (handle, token) = shutdown_channel();
    tokio::spawn(async move {
        ShutdownSignal::new().await;
        info!("Shutdown signal received, finishing the current batch...");
        handle.trigger();
    });

    driver.backfill(&contract, &token).await
}
