//! Preview generation for a directory tree.
//!
//! For every directory holding at least one convertible image, previews live
//! in a `_preview` subdirectory next to the sources:
//!
//! ```text
//! photos/IMG_0001.CR2
//! photos/_preview/IMG_0001_preview.jpg
//! ```
//!
//! A preview is regenerated when it is missing or not strictly newer than its
//! source. A pass never raises; per-file and per-directory failures are logged
//! and counted in [`ScanSummary`].

mod converter;
mod lock;
mod retry;
mod scanner;
mod staleness;

pub use converter::{ConversionError, ImageMagickTool, PreviewTool};
pub use lock::{InstanceLock, LockError};
pub use retry::{generate_with_retry, ConversionOutcome, RetryPolicy};
pub use scanner::{is_convertible, preview_path_for, ScanSummary, TreeScanner};
pub use staleness::{preview_freshness, Freshness};
