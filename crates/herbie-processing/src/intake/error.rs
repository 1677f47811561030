use thiserror::Error;

use herbie_core::error::{ErrorMetadata, LogLevel};
use herbie_storage::StorageError;

use crate::metadata::MetadataError;

/// Failures while taking in one message
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Message carries no file to download")]
    MissingFile,

    #[error("Download failed: {0:#}")]
    Download(anyhow::Error),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ErrorMetadata for IntakeError {
    fn kind(&self) -> &'static str {
        match self {
            IntakeError::MissingFile => "MissingFile",
            IntakeError::Download(_) => "DownloadFailed",
            IntakeError::Metadata(_) => "MetadataError",
            IntakeError::Storage(e) => e.kind(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            IntakeError::MissingFile => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}
