use std::sync::Arc;

use herbie_core::error::ErrorMetadata;
use herbie_core::log_at;
use herbie_core::models::{extension_for_mime, InboundMessage, MessagePayload, PhotoSize};
use herbie_storage::MediaArchive;

use super::error::IntakeError;
use super::source::BlobSource;
use super::types::{IncomingBlob, IntakeOutcome, TransportKind};
use crate::metadata::{read_tags_blocking, MetadataReader};
use crate::validator::{MediaValidator, ValidationError};

/// Pick the blob to save from a document or photo message.
///
/// For photos the widest resolution wins; on equal widths the first one
/// listed is kept.
pub fn resolve_blob(message: &InboundMessage) -> Result<IncomingBlob, IntakeError> {
    let sender = message.sender_or_unknown().to_string();

    match &message.payload {
        MessagePayload::Document(document) => {
            if document.file_id.is_empty() {
                return Err(IntakeError::MissingFile);
            }
            Ok(IncomingBlob {
                file_id: document.file_id.clone(),
                size_bytes: document.file_size.unwrap_or(0),
                extension: document
                    .mime_type
                    .as_deref()
                    .and_then(extension_for_mime)
                    .map(str::to_string),
                transport: TransportKind::Document,
                sender,
            })
        }
        MessagePayload::PhotoSet(sizes) => {
            let mut best: Option<&PhotoSize> = None;
            for size in sizes {
                if best.map_or(true, |current| size.width > current.width) {
                    best = Some(size);
                }
            }
            let photo = best
                .filter(|p| !p.file_id.is_empty())
                .ok_or(IntakeError::MissingFile)?;

            Ok(IncomingBlob {
                file_id: photo.file_id.clone(),
                size_bytes: photo.file_size.unwrap_or(0),
                extension: None,
                transport: TransportKind::Photo,
                sender,
            })
        }
        MessagePayload::Start | MessagePayload::Video => Err(IntakeError::MissingFile),
    }
}

/// Turns inbound messages into published archive files.
pub struct IntakePipeline {
    archive: MediaArchive,
    source: Arc<dyn BlobSource>,
    metadata: Arc<dyn MetadataReader>,
    validator: MediaValidator,
}

impl IntakePipeline {
    pub fn new(
        archive: MediaArchive,
        source: Arc<dyn BlobSource>,
        metadata: Arc<dyn MetadataReader>,
        max_file_size: u64,
    ) -> Self {
        Self {
            archive,
            source,
            metadata,
            validator: MediaValidator::new(max_file_size),
        }
    }

    /// Handle one inbound message. Never fails; failures become [`IntakeOutcome::Failed`].
    pub async fn handle(&self, message: &InboundMessage) -> IntakeOutcome {
        match &message.payload {
            MessagePayload::Start => IntakeOutcome::Usage,
            MessagePayload::Video => {
                tracing::info!(sender = message.sender_or_unknown(), "Refused video message");
                IntakeOutcome::VideoRefused
            }
            MessagePayload::Document(_) | MessagePayload::PhotoSet(_) => {
                match self.ingest(message).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        log_at!(
                            e.log_level(),
                            kind = e.kind(),
                            error = %e,
                            sender = message.sender_or_unknown(),
                            "Intake failed"
                        );
                        IntakeOutcome::Failed {
                            kind: e.kind().to_string(),
                            message: e.to_string(),
                        }
                    }
                }
            }
        }
    }

    async fn ingest(&self, message: &InboundMessage) -> Result<IntakeOutcome, IntakeError> {
        let blob = resolve_blob(message)?;
        tracing::info!(
            sender = %blob.sender,
            file_id = %blob.file_id,
            size_bytes = blob.size_bytes,
            transport = ?blob.transport,
            extension = blob.extension.as_deref().unwrap_or("-"),
            "Captured message"
        );

        if let Err(ValidationError::FileTooLarge { size, max }) =
            self.validator.validate_file_size(blob.size_bytes)
        {
            tracing::info!(size, max, sender = %blob.sender, "Rejected oversized file");
            return Ok(IntakeOutcome::TooLarge { size, max });
        }

        let staged = self.archive.stage().await?;
        let written = self
            .source
            .download(&blob.file_id, staged.path())
            .await
            .map_err(IntakeError::Download)?;
        tracing::debug!(
            staged = %staged.path().display(),
            bytes = written,
            "Downloaded blob"
        );

        let tags = read_tags_blocking(self.metadata.clone(), staged.path()).await?;
        let name = self
            .archive
            .canonical_name(&tags, &blob.sender, blob.extension.as_deref())
            .await?;
        let path = self.archive.publish(staged, &name).await?;

        Ok(IntakeOutcome::Saved {
            path,
            transport: blob.transport,
        })
    }
}
