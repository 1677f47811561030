//! Canonical naming for archived media.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Local};
use rand::RngCore;
use regex::Regex;
use tokio::fs;

use crate::error::{StorageError, StorageResult};
use herbie_core::constants::{CAPTURE_TIME_TAG, DEFAULT_EXTENSION, UNKNOWN_TIME_MARKER};

/// Hyphen insertions tried before falling back to a random token.
pub const MAX_COLLISION_PROBES: usize = 64;

const TOKEN_FALLBACK_ATTEMPTS: usize = 4;

static CAPTURE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}:[0-9]{2}:[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$")
        .expect("capture time pattern is valid")
});

/// Turn `YYYY:MM:DD HH:MM:SS` into `YYYY-MM-DD_HH-MM-SS`.
///
/// Returns `None` for anything that does not match the pattern exactly.
pub fn format_capture_time(raw: &str) -> Option<String> {
    if !CAPTURE_TIME_RE.is_match(raw) {
        return None;
    }
    Some(raw.replace(' ', "_").replace(':', "-"))
}

/// `META_UNKNOWN_YYYY-MM-DD_HH-MM-SS` for the given local time.
pub fn unknown_time_component(now: &DateTime<Local>) -> String {
    format!(
        "{}_{}",
        UNKNOWN_TIME_MARKER,
        now.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Name without extension: `<capture-time>_<sender>`.
pub fn canonical_stem(
    metadata: &HashMap<String, String>,
    sender: &str,
    now: &DateTime<Local>,
) -> String {
    let time = metadata
        .get(CAPTURE_TIME_TAG)
        .and_then(|raw| format_capture_time(raw))
        .unwrap_or_else(|| unknown_time_component(now));

    format!("{}_{}", time, sanitize_sender(sender))
}

/// Keep sender identities from introducing path components.
pub fn sanitize_sender(sender: &str) -> String {
    let cleaned: String = sender
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    if cleaned.contains("..") {
        cleaned.replace("..", "__")
    } else {
        cleaned
    }
}

/// Extension with a leading dot; `.jpe` becomes `.jpg`, missing becomes `.jpg`.
pub fn normalize_extension(extension: Option<&str>) -> String {
    let ext = match extension.map(str::trim) {
        Some(e) if !e.is_empty() && e != "." => e,
        _ => return DEFAULT_EXTENSION.to_string(),
    };

    let dotted = if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    };

    if dotted.eq_ignore_ascii_case(".jpe") {
        DEFAULT_EXTENSION.to_string()
    } else {
        dotted
    }
}

/// Candidate for the given probe: `probe` hyphens inserted before the extension.
pub fn probe_candidate(stem: &str, extension: &str, probe: usize) -> String {
    format!("{}{}{}", stem, "-".repeat(probe), extension)
}

/// Random URL-safe token with 256 bits of entropy.
pub fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// First name derived from `stem` + `extension` that does not exist in `dir`.
///
/// Tries the plain name, then up to [`MAX_COLLISION_PROBES`] hyphenated
/// variants, then `<stem>-<token><ext>` with a fresh random token.
pub async fn resolve_unique_name(dir: &Path, stem: &str, extension: &str) -> StorageResult<String> {
    for probe in 0..=MAX_COLLISION_PROBES {
        let candidate = probe_candidate(stem, extension, probe);
        if !fs::try_exists(dir.join(&candidate)).await? {
            if probe > 0 {
                tracing::debug!(name = %candidate, probes = probe, "Resolved name collision");
            }
            return Ok(candidate);
        }
    }

    tracing::warn!(
        stem = %stem,
        probes = MAX_COLLISION_PROBES,
        "Collision probes exhausted, falling back to random suffix"
    );

    for _ in 0..TOKEN_FALLBACK_ATTEMPTS {
        let candidate = format!("{}-{}{}", stem, random_token(), extension);
        if !fs::try_exists(dir.join(&candidate)).await? {
            return Ok(candidate);
        }
    }

    Err(StorageError::NameExhausted(
        format!("{}{}", stem, extension),
        MAX_COLLISION_PROBES + 1 + TOKEN_FALLBACK_ATTEMPTS,
    ))
}
