use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

/// State of a preview relative to its source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Missing,
    /// Preview exists but is not strictly newer than the source
    Stale,
    Current,
}

impl Freshness {
    pub fn needs_generation(self) -> bool {
        !matches!(self, Freshness::Current)
    }
}

/// Compare modification times of `source` and its `artifact`.
///
/// Equal timestamps count as stale. Errors reading the source propagate; an
/// artifact that does not exist is [`Freshness::Missing`].
pub async fn preview_freshness(source: &Path, artifact: &Path) -> std::io::Result<Freshness> {
    let artifact_meta = match fs::metadata(artifact).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Freshness::Missing),
        Err(e) => return Err(e),
    };
    let source_modified = fs::metadata(source).await?.modified()?;
    let artifact_modified = artifact_meta.modified()?;

    if artifact_modified > source_modified {
        Ok(Freshness::Current)
    } else {
        Ok(Freshness::Stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_artifact() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        std::fs::write(&source, b"src").unwrap();

        let state = preview_freshness(&source, &dir.path().join("a_preview.jpg"))
            .await
            .unwrap();
        assert_eq!(state, Freshness::Missing);
        assert!(state.needs_generation());
    }

    #[tokio::test]
    async fn test_newer_artifact_is_current() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        let artifact = dir.path().join("a_preview.jpg");
        std::fs::write(&source, b"src").unwrap();
        std::fs::write(&artifact, b"prev").unwrap();
        set_file_mtime(&source, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();
        set_file_mtime(&artifact, FileTime::from_unix_time(1_600_000_100, 0)).unwrap();

        let state = preview_freshness(&source, &artifact).await.unwrap();
        assert_eq!(state, Freshness::Current);
        assert!(!state.needs_generation());
    }

    #[tokio::test]
    async fn test_equal_or_older_artifact_is_stale() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.jpg");
        let artifact = dir.path().join("a_preview.jpg");
        std::fs::write(&source, b"src").unwrap();
        std::fs::write(&artifact, b"prev").unwrap();

        let same = FileTime::from_unix_time(1_600_000_000, 0);
        set_file_mtime(&source, same).unwrap();
        set_file_mtime(&artifact, same).unwrap();
        assert_eq!(
            preview_freshness(&source, &artifact).await.unwrap(),
            Freshness::Stale
        );

        set_file_mtime(&artifact, FileTime::from_unix_time(1_500_000_000, 0)).unwrap();
        assert_eq!(
            preview_freshness(&source, &artifact).await.unwrap(),
            Freshness::Stale
        );
    }

    #[tokio::test]
    async fn test_missing_source_is_error() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("a_preview.jpg");
        std::fs::write(&artifact, b"prev").unwrap();

        assert!(preview_freshness(&dir.path().join("gone.jpg"), &artifact)
            .await
            .is_err());
    }
}
