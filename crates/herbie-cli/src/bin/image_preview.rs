//! Generate `_preview` JPEGs for every CR2/JPEG under a directory.
//!
//! Meant to be run periodically (cron). A pass that finds the lock file
//! prints a notice and exits successfully.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use herbie_cli::{run_pass, PassResult};
use herbie_core::constants::{ALREADY_RUNNING_TEXT, DEFAULT_LOCK_FILE, DEFAULT_PREVIEW_LOG_FILE};
use herbie_core::{init_file_logging, PreviewConfig};
use herbie_processing::ImageMagickTool;

#[derive(Parser)]
#[command(name = "image_preview", about = "Create preview images for a directory tree")]
struct Args {
    /// Root of the tree to scan
    root_dir: String,
    /// Log file, appended to
    #[arg(long = "logfile", default_value = DEFAULT_PREVIEW_LOG_FILE)]
    logfile: PathBuf,
    /// Log at debug level
    #[arg(long)]
    debug: bool,
    /// Lock file guarding against concurrent passes
    #[arg(long = "lockfile", default_value = DEFAULT_LOCK_FILE)]
    lockfile: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = PreviewConfig::from_env(&args.root_dir, args.logfile, args.lockfile, args.debug);

    let tool = Arc::new(ImageMagickTool::from_config(&config));
    let directive = if config.debug { "debug" } else { "info" };

    match run_pass(&config, tool, || init_file_logging(&config.log_file, directive)).await? {
        PassResult::AlreadyRunning => println!("{}", ALREADY_RUNNING_TEXT),
        PassResult::Completed(_) => {}
    }

    Ok(())
}
