//! Capture-time metadata extraction
//!
//! The reader is a black box to the intake pipeline: it gets a path and
//! returns tag name → value. Only the capture time tag is ever looked up, so
//! [`ExifMetadataReader`] extracts that one field and nothing else.
//!
//! Files without EXIF data (inline photos, PDFs, ...) or with EXIF that does
//! not parse produce an empty map rather than an error. Only I/O failures are
//! reported.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Reader, Tag};
use thiserror::Error;

use herbie_core::constants::CAPTURE_TIME_TAG;

/// Tag name → value as returned by a [`MetadataReader`].
pub type TagMap = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata task failed: {0}")]
    Task(String),
}

/// Reads metadata tags from a file on disk.
pub trait MetadataReader: Send + Sync {
    fn read_tags(&self, path: &Path) -> Result<TagMap, MetadataError>;
}

/// EXIF reader backed by the kamadak-exif crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifMetadataReader;

impl MetadataReader for ExifMetadataReader {
    fn read_tags(&self, path: &Path) -> Result<TagMap, MetadataError> {
        let mut buffered = BufReader::new(File::open(path)?);

        let exif = match Reader::new().read_from_container(&mut buffered) {
            Ok(exif) => exif,
            Err(exif::Error::Io(e)) if e.kind() != std::io::ErrorKind::UnexpectedEof => {
                return Err(MetadataError::Io(e));
            }
            Err(e) => {
                // No or unreadable EXIF: the caller falls back to the unknown-time name
                tracing::debug!(path = %path.display(), error = %e, "No usable EXIF data");
                return Ok(TagMap::new());
            }
        };

        let mut tags = TagMap::new();
        if let Some(value) = exif
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .and_then(field_as_string)
        {
            tags.insert(CAPTURE_TIME_TAG.to_string(), value);
        }

        Ok(tags)
    }
}

/// Raw ASCII payload of an EXIF field, without trailing NULs or padding.
///
/// Non-ASCII values are ignored: the display form kamadak-exif renders for
/// date fields is not the on-disk `YYYY:MM:DD HH:MM:SS` layout.
fn field_as_string(field: &exif::Field) -> Option<String> {
    match &field.value {
        exif::Value::Ascii(ref vecs) => vecs.first().map(|v| {
            String::from_utf8_lossy(v)
                .trim_end_matches('\0')
                .trim()
                .to_string()
        }),
        _ => None,
    }
}

/// Read tags on the blocking pool so the async caller is not stalled on file I/O.
pub async fn read_tags_blocking(
    reader: std::sync::Arc<dyn MetadataReader>,
    path: &Path,
) -> Result<TagMap, MetadataError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || reader.read_tags(&path))
        .await
        .map_err(|e| MetadataError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Minimal JPEG: SOI, an APP1 Exif segment with a single
    /// DateTimeOriginal entry in the Exif sub-IFD, EOI.
    fn jpeg_with_capture_time(value: &str) -> Vec<u8> {
        assert_eq!(value.len(), 19);
        let mut tiff: Vec<u8> = Vec::new();
        // TIFF header, big endian, IFD0 at offset 8
        tiff.extend_from_slice(b"MM\x00\x2a\x00\x00\x00\x08");
        // IFD0: one entry, ExifIFDPointer (0x8769) LONG 1 -> offset 26
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x8769u16.to_be_bytes());
        tiff.extend_from_slice(&4u16.to_be_bytes());
        tiff.extend_from_slice(&1u32.to_be_bytes());
        tiff.extend_from_slice(&26u32.to_be_bytes());
        tiff.extend_from_slice(&0u32.to_be_bytes());
        // Exif IFD at 26: one entry, DateTimeOriginal (0x9003) ASCII 20 -> offset 44
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x9003u16.to_be_bytes());
        tiff.extend_from_slice(&2u16.to_be_bytes());
        tiff.extend_from_slice(&20u32.to_be_bytes());
        tiff.extend_from_slice(&44u32.to_be_bytes());
        tiff.extend_from_slice(&0u32.to_be_bytes());
        tiff.extend_from_slice(value.as_bytes());
        tiff.push(0);

        let mut app1 = b"Exif\x00\x00".to_vec();
        app1.extend_from_slice(&tiff);

        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
        jpeg.extend_from_slice(&app1);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }

    fn write_temp(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_capture_time() {
        let file = write_temp(&jpeg_with_capture_time("2021:05:01 10:00:00"));
        let tags = ExifMetadataReader.read_tags(file.path()).unwrap();
        assert_eq!(
            tags.get(CAPTURE_TIME_TAG).map(String::as_str),
            Some("2021:05:01 10:00:00")
        );
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_jpeg_without_exif_yields_empty_map() {
        let file = write_temp(&[0xFF, 0xD8, 0xFF, 0xD9]);
        let tags = ExifMetadataReader.read_tags(file.path()).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_unknown_format_yields_empty_map() {
        let file = write_temp(b"%PDF-1.7 not an image");
        let tags = ExifMetadataReader.read_tags(file.path()).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_corrupt_exif_yields_empty_map() {
        let mut data = jpeg_with_capture_time("2021:05:01 10:00:00");
        // Corrupt the TIFF byte order marker inside APP1
        data[12] = b'X';
        data[13] = b'X';
        let file = write_temp(&data);
        let tags = ExifMetadataReader.read_tags(file.path()).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_truncated_file_yields_empty_map() {
        let data = jpeg_with_capture_time("2021:05:01 10:00:00");
        let file = write_temp(&data[..20]);
        let tags = ExifMetadataReader.read_tags(file.path()).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ExifMetadataReader.read_tags(Path::new("/nonexistent/herbie/file.jpg"));
        assert!(matches!(result, Err(MetadataError::Io(_))));
    }

    #[tokio::test]
    async fn test_read_tags_blocking() {
        let file = write_temp(&jpeg_with_capture_time("2020:01:02 03:04:05"));
        let reader: std::sync::Arc<dyn MetadataReader> = std::sync::Arc::new(ExifMetadataReader);
        let tags = read_tags_blocking(reader, file.path()).await.unwrap();
        assert_eq!(
            tags.get(CAPTURE_TIME_TAG).map(String::as_str),
            Some("2020:01:02 03:04:05")
        );
    }
}
