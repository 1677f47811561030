//! Error reporting metadata
//!
//! Errors in the workspace are plain `thiserror` enums. The ones that cross a
//! user-facing boundary also implement [`ErrorMetadata`] so the boundary can
//! decide how loudly to log them and what kind name to show.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected conditions that need no attention
    Debug,
    /// Warning level - for rejected input
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be reported at a pipeline boundary.
pub trait ErrorMetadata {
    /// Short, stable name of the error kind (e.g. "DownloadFailed").
    fn kind(&self) -> &'static str;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Emit a tracing event at the level an error asks for.
#[macro_export]
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            $crate::error::LogLevel::Debug => $crate::__tracing::debug!($($arg)+),
            $crate::error::LogLevel::Warn => $crate::__tracing::warn!($($arg)+),
            $crate::error::LogLevel::Error => $crate::__tracing::error!($($arg)+),
        }
    };
}
