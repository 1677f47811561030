//! Herbie Core Library
//!
//! This crate provides the shared domain models, constants, configuration and
//! logging setup used by the intake service and the preview scanner.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod telemetry;

// Re-export commonly used types
pub use config::{expand_path, IntakeConfig, PreviewConfig};
pub use error::{ErrorMetadata, LogLevel};
pub use models::{DocumentFile, InboundMessage, MessagePayload, PhotoSize};
pub use telemetry::init_file_logging;

#[doc(hidden)]
pub use tracing as __tracing;
