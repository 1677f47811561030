//! Types for the intake pipeline.

use std::path::PathBuf;

use herbie_core::constants::{
    too_large_text, FAILURE_TEXT_PREFIX, SAVED_DOCUMENT_TEXT, SAVED_IMAGE_TEXT, START_TEXT,
    VIDEO_REFUSAL_TEXT,
};

/// How the blob reached us; decides the wording of the success reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Sent as a file, original bytes
    Document,
    /// Sent as an inline photo, recompressed by the transport
    Photo,
}

/// The blob chosen from an inbound message, before anything is downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingBlob {
    pub file_id: String,
    /// Size reported by the transport; `0` when it reported none
    pub size_bytes: u64,
    /// Declared extension with leading dot, if the transport declared a type
    pub extension: Option<String>,
    pub transport: TransportKind,
    pub sender: String,
}

/// Result of handling one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Usage,
    VideoRefused,
    /// `max` is the configured ceiling in bytes
    TooLarge { size: u64, max: u64 },
    Saved { path: PathBuf, transport: TransportKind },
    Failed { kind: String, message: String },
}

impl IntakeOutcome {
    /// Text sent back to the sender.
    pub fn reply_text(&self) -> String {
        match self {
            IntakeOutcome::Usage => START_TEXT.to_string(),
            IntakeOutcome::VideoRefused => VIDEO_REFUSAL_TEXT.to_string(),
            IntakeOutcome::TooLarge { max, .. } => too_large_text(*max),
            IntakeOutcome::Saved {
                transport: TransportKind::Document,
                ..
            } => SAVED_DOCUMENT_TEXT.to_string(),
            IntakeOutcome::Saved {
                transport: TransportKind::Photo,
                ..
            } => SAVED_IMAGE_TEXT.to_string(),
            IntakeOutcome::Failed { kind, message } => {
                format!("{}{}: {}", FAILURE_TEXT_PREFIX, kind, message)
            }
        }
    }

    pub fn saved_path(&self) -> Option<&PathBuf> {
        match self {
            IntakeOutcome::Saved { path, .. } => Some(path),
            _ => None,
        }
    }
}
