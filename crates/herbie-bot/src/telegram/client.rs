use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use herbie_core::IntakeConfig;
use herbie_processing::BlobSource;

use super::types::{ApiResponse, File, SendMessage, Update};

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Bot API client.
///
/// The access token is part of every URL, so transport errors are stripped of
/// their URL before they are logged or shown to a user.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
    poll_timeout_secs: u64,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

impl TelegramClient {
    pub fn new(base_url: &str, token: String, poll_timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS.max(poll_timeout_secs + 10)))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            poll_timeout_secs,
        })
    }

    pub fn from_config(config: &IntakeConfig) -> Result<Self> {
        Self::new(
            &config.api_url,
            config.access_token.clone(),
            config.poll_timeout_secs,
        )
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    pub fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url, self.token, file_path)
    }

    async fn read_response<T: DeserializeOwned>(
        response: reqwest::Response,
        method: &str,
    ) -> Result<T> {
        let status = response.status();
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("Invalid {} response (HTTP {})", method, status))?;

        if !body.ok {
            return Err(anyhow::anyhow!(
                "{} failed with code {}: {}",
                method,
                body.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                body.description.unwrap_or_else(|| "Unknown error".to_string())
            ));
        }

        body.result
            .with_context(|| format!("{} returned no result", method))
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let mut query = vec![("timeout", self.poll_timeout_secs.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&query)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to poll for updates")?;

        Self::read_response(response, "getUpdates").await
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File> {
        let response = self
            .client
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to request file info")?;

        Self::read_response(response, "getFile").await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to send reply")?;

        let _: serde_json::Value = Self::read_response(response, "sendMessage").await?;
        Ok(())
    }

    /// Stream a file from the file endpoint into `destination`, truncating it first.
    async fn download_to(&self, file_path: &str, destination: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(self.file_url(file_path))
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to start download")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Download failed with status {}", status));
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(destination)
            .await
            .with_context(|| format!("Failed to open {}", destination.display()))?;

        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| e.without_url())
            .context("Download interrupted")?
        {
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", destination.display()))?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

#[async_trait]
impl BlobSource for TelegramClient {
    async fn download(&self, file_id: &str, destination: &Path) -> Result<u64> {
        let file = self.get_file(file_id).await?;
        let file_path = file
            .file_path
            .with_context(|| format!("No download path for file {}", file_id))?;

        let written = self.download_to(&file_path, destination).await?;
        tracing::debug!(file_id, bytes = written, "Downloaded file");
        Ok(written)
    }
}
