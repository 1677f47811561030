//! Intake pipeline: resolve → check size → stage → download → read metadata → name → publish.
//!
//! One inbound message is handled at a time. Every failure after the size
//! check is reported back as [`IntakeOutcome::Failed`] and never propagates
//! to the transport loop.

mod error;
mod pipeline;
mod source;
mod types;

pub use error::IntakeError;
pub use pipeline::{resolve_blob, IntakePipeline};
pub use source::BlobSource;
pub use types::{IncomingBlob, IntakeOutcome, TransportKind};
