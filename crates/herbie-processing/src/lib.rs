//! Herbie Processing Library
//!
//! The two file pipelines of the workspace:
//!
//! - [`intake`]: one inbound message at a time, stage → read metadata → name → publish.
//! - [`preview`]: one pass over a directory tree, regenerating stale previews with an
//!   external converter, serialized across processes by a lock file.

pub mod intake;
pub mod metadata;
pub mod preview;
pub mod validator;

// Re-export commonly used types
pub use intake::{
    BlobSource, IncomingBlob, IntakeError, IntakeOutcome, IntakePipeline, TransportKind,
};
pub use metadata::{ExifMetadataReader, MetadataError, MetadataReader, TagMap};
pub use preview::{
    ConversionError, ConversionOutcome, Freshness, ImageMagickTool, InstanceLock, LockError,
    PreviewTool, RetryPolicy, ScanSummary, TreeScanner,
};
pub use validator::{MediaValidator, ValidationError};
