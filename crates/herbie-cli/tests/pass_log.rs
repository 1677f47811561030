//! Log output of a full pass. Kept in its own test binary because it installs
//! the global subscriber.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::tempdir;

use herbie_cli::{run_pass, PassResult};
use herbie_core::{init_file_logging, PreviewConfig};
use herbie_processing::{ConversionError, PreviewTool};

struct WritingTool;

#[async_trait]
impl PreviewTool for WritingTool {
    async fn convert(&self, _source: &Path, artifact: &Path) -> Result<(), ConversionError> {
        std::fs::write(artifact, b"preview").unwrap();
        Ok(())
    }

    async fn change_owner(&self, _artifact: &Path) -> Result<(), ConversionError> {
        Ok(())
    }
}

#[tokio::test]
async fn every_visited_directory_is_logged() {
    let workspace = tempdir().unwrap();
    let root = workspace.path().join("photos");
    let empty = root.join("empty");
    let notes = root.join("notes");
    std::fs::create_dir_all(&empty).unwrap();
    std::fs::create_dir_all(&notes).unwrap();
    std::fs::write(notes.join("readme.txt"), b"text").unwrap();
    std::fs::write(root.join("photo.jpg"), b"jpeg").unwrap();

    let config = PreviewConfig::from_lookup(
        root.to_str().unwrap(),
        workspace.path().join("image_preview.log"),
        workspace.path().join("image_preview.lock"),
        false,
        |key| match key {
            "PREVIEW_RETRY_DELAY_SECS" => Some("0".to_string()),
            _ => None,
        },
    );

    let log_file = config.log_file.clone();
    let result = run_pass(&config, Arc::new(WritingTool), || {
        init_file_logging(&log_file, "info")
    })
    .await
    .unwrap();

    match result {
        PassResult::Completed(summary) => {
            assert_eq!(summary.directories, 3);
            assert_eq!(summary.generated, 1);
        }
        other => panic!("expected completed pass, got {:?}", other),
    }

    let log = std::fs::read_to_string(&log_file).unwrap();
    let scanned: Vec<&str> = log.lines().filter(|l| l.contains("Scanning")).collect();
    assert_eq!(scanned.len(), 3, "log was:\n{}", log);
    assert!(scanned.iter().any(|l| l.contains(&*empty.to_string_lossy())));
    assert!(scanned.iter().any(|l| l.contains(&*notes.to_string_lossy())));
    // directories without images get no preview directory
    assert!(!empty.join("_preview").exists());
}
