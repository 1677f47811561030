//! Preview passes over real directory trees with a recording converter.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use filetime::{set_file_mtime, FileTime};
use tempfile::tempdir;

use herbie_processing::{ConversionError, PreviewTool, RetryPolicy, ScanSummary, TreeScanner};

/// Writes a placeholder preview and records every call.
#[derive(Default)]
struct RecordingTool {
    conversions: Mutex<Vec<(PathBuf, PathBuf)>>,
    owners: Mutex<Vec<PathBuf>>,
    fail_for: Option<String>,
}

impl RecordingTool {
    fn conversions(&self) -> Vec<(PathBuf, PathBuf)> {
        self.conversions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PreviewTool for RecordingTool {
    async fn convert(&self, source: &Path, artifact: &Path) -> Result<(), ConversionError> {
        self.conversions
            .lock()
            .unwrap()
            .push((source.to_path_buf(), artifact.to_path_buf()));

        let name = source.file_name().unwrap().to_string_lossy().to_string();
        if self.fail_for.as_deref() == Some(name.as_str()) {
            return Err(ConversionError::Failed {
                program: "convert".to_string(),
                status: "exit status: 1".to_string(),
                stdout: String::new(),
                stderr: "unsupported".to_string(),
            });
        }
        std::fs::write(artifact, b"preview").unwrap();
        Ok(())
    }

    async fn change_owner(&self, artifact: &Path) -> Result<(), ConversionError> {
        self.owners.lock().unwrap().push(artifact.to_path_buf());
        Ok(())
    }
}

fn scanner(tool: Arc<RecordingTool>) -> TreeScanner {
    TreeScanner::new(
        tool,
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(1),
        },
    )
}

fn old(path: &Path) {
    set_file_mtime(path, FileTime::from_unix_time(1_500_000_000, 0)).unwrap();
}

#[tokio::test]
async fn converts_stale_image_and_ignores_other_files() {
    let root = tempdir().unwrap();
    let photos = root.path().join("photos");
    let notes = root.path().join("notes");
    std::fs::create_dir_all(&photos).unwrap();
    std::fs::create_dir_all(&notes).unwrap();
    std::fs::write(photos.join("photo.jpg"), b"jpeg").unwrap();
    std::fs::write(photos.join("readme.txt"), b"text").unwrap();
    std::fs::write(notes.join("todo.txt"), b"text").unwrap();

    let tool = Arc::new(RecordingTool::default());
    let summary = scanner(tool.clone()).scan(root.path()).await;

    assert_eq!(
        tool.conversions(),
        vec![(
            photos.join("photo.jpg"),
            photos.join("_preview").join("photo_preview.jpg")
        )]
    );
    assert_eq!(
        tool.owners.lock().unwrap().clone(),
        vec![photos.join("_preview").join("photo_preview.jpg")]
    );
    assert!(photos.join("_preview/photo_preview.jpg").exists());
    assert!(!notes.join("_preview").exists());
    assert!(!root.path().join("_preview").exists());

    assert_eq!(
        summary,
        ScanSummary {
            directories: 3,
            examined: 1,
            generated: 1,
            up_to_date: 0,
            failed: 0,
            skipped_directories: 0,
        }
    );
}

#[tokio::test]
async fn second_pass_skips_current_previews() {
    let root = tempdir().unwrap();
    let source = root.path().join("IMG_0001.CR2");
    std::fs::write(&source, b"raw").unwrap();
    old(&source);

    let tool = Arc::new(RecordingTool::default());
    let scanner = scanner(tool.clone());

    let first = scanner.scan(root.path()).await;
    assert_eq!(first.generated, 1);

    let second = scanner.scan(root.path()).await;
    assert_eq!(second.generated, 0);
    assert_eq!(second.up_to_date, 1);
    assert_eq!(tool.conversions().len(), 1);
    assert!(root.path().join("_preview/IMG_0001_preview.jpg").exists());
}

#[tokio::test]
async fn touched_source_is_regenerated() {
    let root = tempdir().unwrap();
    let source = root.path().join("a.jpeg");
    let preview_dir = root.path().join("_preview");
    std::fs::create_dir_all(&preview_dir).unwrap();
    std::fs::write(&source, b"new").unwrap();
    std::fs::write(preview_dir.join("a_preview.jpg"), b"old preview").unwrap();
    set_file_mtime(&source, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();
    set_file_mtime(
        preview_dir.join("a_preview.jpg"),
        FileTime::from_unix_time(1_600_000_000, 0),
    )
    .unwrap();

    let tool = Arc::new(RecordingTool::default());
    let summary = scanner(tool.clone()).scan(root.path()).await;

    assert_eq!(summary.generated, 1);
    assert_eq!(
        std::fs::read(preview_dir.join("a_preview.jpg")).unwrap(),
        b"preview"
    );
}

#[tokio::test]
async fn preview_directories_are_not_scanned() {
    let root = tempdir().unwrap();
    let preview_dir = root.path().join("_preview");
    std::fs::create_dir_all(&preview_dir).unwrap();
    std::fs::write(preview_dir.join("stray.jpg"), b"jpeg").unwrap();

    let tool = Arc::new(RecordingTool::default());
    let summary = scanner(tool.clone()).scan(root.path()).await;

    assert!(tool.conversions().is_empty());
    assert!(!preview_dir.join("_preview").exists());
    assert_eq!(summary.directories, 1);
}

#[tokio::test]
async fn failing_image_does_not_stop_the_pass() {
    let root = tempdir().unwrap();
    std::fs::write(root.path().join("a.jpg"), b"broken").unwrap();
    std::fs::write(root.path().join("b.jpg"), b"fine").unwrap();

    let tool = Arc::new(RecordingTool {
        fail_for: Some("a.jpg".to_string()),
        ..Default::default()
    });
    let summary = scanner(tool.clone()).scan(root.path()).await;

    // three attempts on a.jpg, one on b.jpg
    assert_eq!(tool.conversions().len(), 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.generated, 1);
    assert!(!root.path().join("_preview/a_preview.jpg").exists());
    assert!(root.path().join("_preview/b_preview.jpg").exists());
}

#[tokio::test]
async fn missing_root_is_counted_not_raised() {
    let root = tempdir().unwrap();
    let tool = Arc::new(RecordingTool::default());

    let summary = scanner(tool).scan(&root.path().join("does-not-exist")).await;

    assert_eq!(summary.directories, 0);
    assert_eq!(summary.skipped_directories, 1);
}
