use std::path::Path;

use async_trait::async_trait;

/// Fetches a blob from the transport into a local file.
#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Download the blob identified by `file_id` into `destination`, which already
    /// exists and is empty. Returns the number of bytes written.
    async fn download(&self, file_id: &str, destination: &Path) -> anyhow::Result<u64>;
}
