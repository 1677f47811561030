//! HerbieBot: saves every picture sent to the bot into a directory.
//!
//! Set HERBIE_ACCESS_TOKEN (a `.env` file is read if present).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use herbie_bot::{Dispatcher, ShutdownSignal, TelegramClient};
use herbie_core::constants::DEFAULT_INTAKE_LOG_FILE;
use herbie_core::{init_file_logging, IntakeConfig};
use herbie_processing::{ExifMetadataReader, IntakePipeline};
use herbie_storage::MediaArchive;

#[derive(Parser)]
#[command(name = "herbiebot", about = "Telegram bot that archives received pictures")]
struct Args {
    /// Directory the received files are saved to
    save_dir: String,
    /// Log file, appended to
    #[arg(long = "logfile", default_value = DEFAULT_INTAKE_LOG_FILE)]
    logfile: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = IntakeConfig::from_env(&args.save_dir, args.logfile)?;
    let _guard = init_file_logging(&config.log_file, "info")?;

    tracing::info!(
        save_dir = %config.save_dir.display(),
        max_file_size_bytes = config.max_file_size_bytes,
        "Starting herbiebot"
    );

    let archive = MediaArchive::new(&config.save_dir)
        .await
        .context("Failed to open archive directory")?;
    let client = Arc::new(TelegramClient::from_config(&config)?);
    let pipeline = IntakePipeline::new(
        archive,
        client.clone(),
        Arc::new(ExifMetadataReader),
        config.max_file_size_bytes,
    );

    let mut shutdown = ShutdownSignal::install()?;
    let mut dispatcher = Dispatcher::new(client, pipeline);
    tokio::select! {
        _ = dispatcher.run() => {}
        reason = shutdown.recv() => {
            let reason = reason?;
            tracing::info!(?reason, "Shutting down");
        }
    }

    Ok(())
}
