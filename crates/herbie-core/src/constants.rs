//! Fixed limits, names and reply texts shared across the workspace.

/// Uploads larger than this are rejected before any download happens.
pub const MAX_FILE_SIZE_MB: u64 = 20;
pub const MAX_FILE_SIZE_BYTES: u64 = MAX_FILE_SIZE_MB * 1024 * 1024;

/// Sender identity used when the transport cannot name the sender.
pub const UNKNOWN_SENDER: &str = "UNKNOWN";

/// Extension used when the transport does not declare one.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Metadata tag carrying the capture time.
pub const CAPTURE_TIME_TAG: &str = "EXIF DateTimeOriginal";

/// Prefix for names whose capture time could not be recovered.
pub const UNKNOWN_TIME_MARKER: &str = "META_UNKNOWN";

/// Name of the per-directory preview cache.
pub const PREVIEW_DIR_NAME: &str = "_preview";

/// Suffix appended to the source stem to form the preview file name.
pub const PREVIEW_SUFFIX: &str = "_preview.jpg";

/// Lowercase extensions (without dot) the preview scanner converts.
pub const CONVERTIBLE_EXTENSIONS: &[&str] = &["cr2", "jpg", "jpeg"];

/// Raw format that needs an explicit format hint for the converter.
pub const RAW_FORMAT_EXTENSION: &str = "cr2";

pub const MAX_CONVERSION_ATTEMPTS: u32 = 3;
pub const CONVERSION_RETRY_DELAY_SECS: u64 = 10;
pub const PREVIEW_RESIZE: &str = "30%";
pub const PREVIEW_QUALITY: &str = "80%";
pub const PREVIEW_OWNER: &str = "nobody:nogroup";

pub const DEFAULT_INTAKE_LOG_FILE: &str = "herbiebot.log";
pub const DEFAULT_PREVIEW_LOG_FILE: &str = "image_preview.log";
pub const DEFAULT_LOCK_FILE: &str = "image_preview.lock";

/// Environment variable holding the transport access token.
pub const ACCESS_TOKEN_ENV: &str = "HERBIE_ACCESS_TOKEN";

// Reply texts
pub const START_TEXT: &str = "Hi, I'm HerbieBot. I will save every picture that is sent to me on \
the server I am running on. Please send pictures as documents to avoid loss of quality.";
pub const VIDEO_REFUSAL_TEXT: &str = "Sorry, I cannot handle videos.";
pub const TOO_LARGE_TEXT: &str = "Sorry, I cannot handle files larger than 20MB.";

/// Oversize reply for a configured ceiling; equals [`TOO_LARGE_TEXT`] at the default.
pub fn too_large_text(max_bytes: u64) -> String {
    format!(
        "Sorry, I cannot handle files larger than {}MB.",
        max_bytes / (1024 * 1024)
    )
}
pub const SAVED_DOCUMENT_TEXT: &str = "Saved file successfully.";
pub const SAVED_IMAGE_TEXT: &str = "Saved image successfully. Please consider sending images as \
files (attachment > file > gallery) for better quality if feasible.";
pub const FAILURE_TEXT_PREFIX: &str =
    "Saving the image failed, please try again later. Error Message: ";
pub const ALREADY_RUNNING_TEXT: &str = "Another running instance exists";
