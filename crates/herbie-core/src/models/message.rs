use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_SENDER;

/// A file attached to a message as a document (sent without recompression).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub file_id: String,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
}

/// One resolution of an inline photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

/// What an inbound message carries, resolved once at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessagePayload {
    /// The `/start` command
    Start,
    Document(DocumentFile),
    /// Every resolution the transport offers for one inline photo
    PhotoSet(Vec<PhotoSize>),
    Video,
}

/// A transport-neutral inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub sender: Option<String>,
    pub payload: MessagePayload,
}

impl InboundMessage {
    pub fn new(sender: Option<String>, payload: MessagePayload) -> Self {
        Self { sender, payload }
    }

    /// Sender identity used for naming; `UNKNOWN` when the transport had none.
    pub fn sender_or_unknown(&self) -> &str {
        self.sender
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SENDER)
    }
}

/// Map a declared MIME type to a file extension (with leading dot).
///
/// Parameters such as `; charset=utf-8` are ignored. Unknown types give
/// `None` and the archive falls back to its default extension.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type.split(';').next().unwrap_or("").trim().to_lowercase();
    let ext = match essence.as_str() {
        // Images
        "image/jpeg" | "image/pjpeg" | "image/jpg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/heic" | "image/heic-sequence" => ".heic",
        "image/heif" | "image/heif-sequence" => ".heif",
        "image/avif" => ".avif",
        "image/tiff" => ".tiff",
        "image/bmp" | "image/x-ms-bmp" => ".bmp",
        "image/svg+xml" => ".svg",
        "image/x-icon" | "image/vnd.microsoft.icon" => ".ico",
        "image/x-canon-cr2" => ".cr2",
        "image/x-canon-cr3" => ".cr3",
        "image/x-nikon-nef" => ".nef",
        "image/x-sony-arw" => ".arw",
        "image/x-fuji-raf" => ".raf",
        "image/x-olympus-orf" => ".orf",
        "image/x-panasonic-rw2" => ".rw2",
        "image/x-adobe-dng" | "image/dng" => ".dng",
        // Video
        "video/mp4" => ".mp4",
        "video/quicktime" => ".mov",
        "video/x-msvideo" => ".avi",
        "video/x-matroska" => ".mkv",
        "video/webm" => ".webm",
        "video/mpeg" => ".mpeg",
        "video/3gpp" => ".3gp",
        "video/x-m4v" => ".m4v",
        // Audio
        "audio/mpeg" | "audio/mp3" => ".mp3",
        "audio/ogg" => ".ogg",
        "audio/wav" | "audio/x-wav" => ".wav",
        "audio/flac" => ".flac",
        "audio/aac" => ".aac",
        "audio/mp4" | "audio/x-m4a" => ".m4a",
        // Documents and archives
        "application/pdf" => ".pdf",
        "application/zip" | "application/x-zip-compressed" => ".zip",
        "application/x-7z-compressed" => ".7z",
        "application/x-rar-compressed" | "application/vnd.rar" => ".rar",
        "application/x-tar" => ".tar",
        "application/gzip" | "application/x-gzip" => ".gz",
        "application/json" => ".json",
        "application/xml" | "text/xml" => ".xml",
        "application/msword" => ".doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => ".docx",
        "application/vnd.ms-excel" => ".xls",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => ".xlsx",
        "text/plain" => ".txt",
        "text/csv" => ".csv",
        "text/html" => ".html",
        _ => return None,
    };
    Some(ext)
}
