use std::path::Path;
use std::time::Duration;

use tokio::fs;

use herbie_core::constants::{CONVERSION_RETRY_DELAY_SECS, MAX_CONVERSION_ATTEMPTS};
use herbie_core::PreviewConfig;

use super::converter::{ConversionError, PreviewTool};
use super::staleness::{preview_freshness, Freshness};

/// How often and how patiently a single preview is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause between two attempts; not applied after the last one
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_CONVERSION_ATTEMPTS,
            delay: Duration::from_secs(CONVERSION_RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: config.retry_delay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    Converted { attempts: u32 },
    Failed { attempts: u32 },
}

impl ConversionOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            ConversionOutcome::Converted { attempts } | ConversionOutcome::Failed { attempts } => {
                *attempts
            }
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionOutcome::Converted { .. })
    }
}

/// Convert `source` into `artifact`, retrying on failure.
///
/// Stops at the first success. After a success the ownership change is
/// attempted once and its failure only logged. Never returns an error: a
/// source that cannot be converted is reported as [`ConversionOutcome::Failed`]
/// and the caller moves on.
pub async fn generate_with_retry(
    tool: &dyn PreviewTool,
    source: &Path,
    artifact: &Path,
    policy: RetryPolicy,
) -> ConversionOutcome {
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match tool.convert(source, artifact).await {
            Ok(()) => {
                tracing::info!(
                    source = %source.display(),
                    artifact = %artifact.display(),
                    attempt,
                    "Generated preview"
                );
                if let Err(e) = tool.change_owner(artifact).await {
                    log_tool_error(&e, artifact, "Could not change preview owner");
                }
                return ConversionOutcome::Converted { attempts: attempt };
            }
            Err(e) => {
                tracing::error!(attempt, max_attempts, "Preview conversion attempt failed");
                log_tool_error(&e, source, "Converter reported an error");
                if attempt < max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    discard_partial_artifact(source, artifact).await;
    tracing::error!(
        source = %source.display(),
        attempts = max_attempts,
        "Giving up on preview"
    );
    ConversionOutcome::Failed {
        attempts: max_attempts,
    }
}

fn log_tool_error(error: &ConversionError, path: &Path, message: &str) {
    match error {
        ConversionError::Failed { stdout, stderr, .. } => tracing::error!(
            path = %path.display(),
            error = %error,
            stdout = %stdout,
            stderr = %stderr,
            "{}",
            message
        ),
        ConversionError::Spawn { .. } => tracing::error!(
            path = %path.display(),
            error = %error,
            "{}",
            message
        ),
    }
}

/// A failed converter may still have written output. Drop it if it would
/// pass as an up-to-date preview on the next pass.
async fn discard_partial_artifact(source: &Path, artifact: &Path) {
    if let Ok(Freshness::Current) = preview_freshness(source, artifact).await {
        match fs::remove_file(artifact).await {
            Ok(()) => tracing::warn!(
                artifact = %artifact.display(),
                "Removed preview left behind by failed conversion"
            ),
            Err(e) => tracing::warn!(
                artifact = %artifact.display(),
                error = %e,
                "Could not remove preview left behind by failed conversion"
            ),
        }
    }
}
