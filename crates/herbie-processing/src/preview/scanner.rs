use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use walkdir::{DirEntry, WalkDir};

use herbie_core::constants::{CONVERTIBLE_EXTENSIONS, PREVIEW_DIR_NAME, PREVIEW_SUFFIX};

use super::converter::PreviewTool;
use super::retry::{generate_with_retry, RetryPolicy};
use super::staleness::preview_freshness;

/// Counters for one pass over a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub directories: usize,
    /// Convertible images seen
    pub examined: usize,
    pub generated: usize,
    pub up_to_date: usize,
    pub failed: usize,
    /// Directories that could not be read or prepared
    pub skipped_directories: usize,
}

/// Whether the scanner converts this file, by case-insensitive extension.
pub fn is_convertible(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| CONVERTIBLE_EXTENSIONS.contains(&e.as_str()))
}

/// `<dir>/_preview/<stem>_preview.jpg` for a source at `<dir>/<stem>.<ext>`.
pub fn preview_path_for(source: &Path) -> Option<PathBuf> {
    let dir = source.parent()?;
    let stem = source.file_stem()?;

    let mut name = stem.to_os_string();
    name.push(PREVIEW_SUFFIX);
    Some(dir.join(PREVIEW_DIR_NAME).join(name))
}

fn is_preview_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == PREVIEW_DIR_NAME
}

/// Walks a tree once and regenerates stale previews.
pub struct TreeScanner {
    tool: Arc<dyn PreviewTool>,
    policy: RetryPolicy,
}

impl TreeScanner {
    pub fn new(tool: Arc<dyn PreviewTool>, policy: RetryPolicy) -> Self {
        Self { tool, policy }
    }

    /// Scan every directory under `root`, including `root` itself.
    ///
    /// `_preview` directories are never descended into. Unreadable
    /// directories are logged and skipped.
    pub async fn scan(&self, root: &Path) -> ScanSummary {
        let mut summary = ScanSummary::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_preview_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::error!(
                        path = ?e.path(),
                        error = %e,
                        "Skipping unreadable directory"
                    );
                    summary.skipped_directories += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                summary.directories += 1;
                self.scan_directory(entry.path(), &mut summary).await;
            }
        }

        tracing::info!(
            root = %root.display(),
            directories = summary.directories,
            examined = summary.examined,
            generated = summary.generated,
            up_to_date = summary.up_to_date,
            failed = summary.failed,
            skipped_directories = summary.skipped_directories,
            "Scan finished"
        );

        summary
    }

    async fn scan_directory(&self, dir: &Path, summary: &mut ScanSummary) {
        tracing::info!(dir = %dir.display(), "Scanning");

        let sources = match convertible_files(dir).await {
            Ok(sources) => sources,
            Err(e) => {
                tracing::error!(dir = %dir.display(), error = %e, "Failed to list directory");
                summary.skipped_directories += 1;
                return;
            }
        };

        if sources.is_empty() {
            return;
        }
        tracing::debug!(dir = %dir.display(), images = sources.len(), "Found convertible files");

        let preview_dir = dir.join(PREVIEW_DIR_NAME);
        if let Err(e) = fs::create_dir_all(&preview_dir).await {
            tracing::error!(
                dir = %preview_dir.display(),
                error = %e,
                "Failed to create preview directory"
            );
            summary.skipped_directories += 1;
            return;
        }

        for source in sources {
            summary.examined += 1;
            tracing::debug!(source = %source.display(), "Checking file");

            let Some(artifact) = preview_path_for(&source) else {
                continue;
            };

            let freshness = match preview_freshness(&source, &artifact).await {
                Ok(freshness) => freshness,
                Err(e) => {
                    tracing::error!(
                        source = %source.display(),
                        error = %e,
                        "Failed to compare modification times"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            if !freshness.needs_generation() {
                tracing::debug!(artifact = %artifact.display(), "Preview is newer than source");
                summary.up_to_date += 1;
                continue;
            }

            tracing::debug!(
                source = %source.display(),
                state = ?freshness,
                "Generating preview"
            );
            let outcome =
                generate_with_retry(self.tool.as_ref(), &source, &artifact, self.policy).await;
            if outcome.is_converted() {
                summary.generated += 1;
            } else {
                summary.failed += 1;
            }
            tracing::debug!(
                source = %source.display(),
                attempts = outcome.attempts(),
                converted = outcome.is_converted(),
                "Preview attempts finished"
            );
        }
    }
}

/// Regular files in `dir` (not recursive) the scanner converts, sorted by name.
async fn convertible_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_convertible(&path) {
            continue;
        }
        // Follows symlinks, so a link to an image counts as an image
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
            }
        }
    }

    files.sort();
    Ok(files)
}
