use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs;

use crate::error::{StorageError, StorageResult};
use crate::naming::{canonical_stem, normalize_extension, random_token, resolve_unique_name};
use crate::staging::StagedFile;

const STAGING_ATTEMPTS: usize = 3;

/// Flat archive directory for incoming media
#[derive(Clone, Debug)]
pub struct MediaArchive {
    base_path: PathBuf,
}

impl MediaArchive {
    /// Create a new MediaArchive rooted at `base_path`, creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create archive directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(MediaArchive { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Reserve a fresh, randomly named file inside the archive directory.
    pub async fn stage(&self) -> StorageResult<StagedFile> {
        for _ in 0..STAGING_ATTEMPTS {
            let path = self.base_path.join(random_token());
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => {
                    tracing::debug!(path = %path.display(), "Staged file reserved");
                    return Ok(StagedFile::new(path));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::StagingFailed(format!(
                        "Failed to create {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }

        Err(StorageError::StagingFailed(format!(
            "No free staging name in {} after {} attempts",
            self.base_path.display(),
            STAGING_ATTEMPTS
        )))
    }

    /// Compute a canonical name that is free in the archive right now.
    ///
    /// The name is not reserved; [`MediaArchive::publish`] fails if another
    /// writer takes it first.
    pub async fn canonical_name(
        &self,
        metadata: &HashMap<String, String>,
        sender: &str,
        extension: Option<&str>,
    ) -> StorageResult<String> {
        let stem = canonical_stem(metadata, sender, &Local::now());
        let extension = normalize_extension(extension);
        resolve_unique_name(&self.base_path, &stem, &extension).await
    }

    /// Move a staged file to `name` inside the archive without ever overwriting.
    ///
    /// The destination is created as a hard link, which fails if the name is
    /// taken, and the staging name is dropped afterwards. On failure the staged
    /// file is left in place.
    pub async fn publish(&self, staged: StagedFile, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
            return Err(StorageError::ConfigError(format!(
                "Invalid archive name: {}",
                name
            )));
        }

        let destination = self.base_path.join(name);
        let start = std::time::Instant::now();

        match fs::hard_link(staged.path(), &destination).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(destination));
            }
            Err(e) => return Err(StorageError::IoError(e)),
        }

        if let Err(e) = fs::remove_file(staged.path()).await {
            tracing::warn!(
                staged = %staged.path().display(),
                error = %e,
                "Published file but could not drop the staging name"
            );
        }

        tracing::info!(
            path = %destination.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Saved file"
        );

        Ok(destination)
    }
}
