use std::path::PathBuf;

use thiserror::Error;

/// Archive operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("No free name for {0} after {1} attempts")]
    NameExhausted(String, usize),

    #[error("Staging failed: {0}")]
    StagingFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Short variant name, used when the error is reported to a user.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::AlreadyExists(_) => "AlreadyExists",
            StorageError::NameExhausted(..) => "NameExhausted",
            StorageError::StagingFailed(_) => "StagingFailed",
            StorageError::IoError(_) => "IoError",
            StorageError::ConfigError(_) => "ConfigError",
        }
    }
}

/// Result type for archive operations
pub type StorageResult<T> = Result<T, StorageError>;
