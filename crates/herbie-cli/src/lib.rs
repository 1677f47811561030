//! Herbie command-line tools.
//!
//! `image_preview` runs one preview pass over a tree. The pass is guarded by a
//! lock file and logs only once the lock is held, so a second instance started
//! by cron leaves the running one's log alone.

use std::sync::Arc;

use herbie_core::PreviewConfig;
use herbie_processing::{InstanceLock, LockError, PreviewTool, RetryPolicy, ScanSummary, TreeScanner};

/// How a pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassResult {
    /// Another instance holds the lock; nothing was done
    AlreadyRunning,
    Completed(ScanSummary),
}

/// Run one preview pass under the instance lock.
///
/// `init_logging` is called after the lock is acquired; whatever it returns is
/// kept alive until the pass is over. The lock file is removed on every path
/// out of this function, including errors.
pub async fn run_pass<F, G>(
    config: &PreviewConfig,
    tool: Arc<dyn PreviewTool>,
    init_logging: F,
) -> anyhow::Result<PassResult>
where
    F: FnOnce() -> anyhow::Result<G>,
{
    let lock = match InstanceLock::acquire(&config.lock_file) {
        Ok(lock) => lock,
        Err(LockError::AlreadyRunning(_)) => return Ok(PassResult::AlreadyRunning),
        Err(e) => return Err(e.into()),
    };

    let _logging = init_logging()?;

    tracing::info!(
        root = %config.root_dir.display(),
        lock = %lock.path().display(),
        "Starting preview pass"
    );

    let scanner = TreeScanner::new(tool, RetryPolicy::from_config(config));
    let summary = scanner.scan(&config.root_dir).await;

    tracing::info!(
        generated = summary.generated,
        failed = summary.failed,
        "Finished preview pass"
    );

    if let Err(e) = lock.release() {
        tracing::warn!(error = %e, "Failed to remove lock file");
    }

    Ok(PassResult::Completed(summary))
}
