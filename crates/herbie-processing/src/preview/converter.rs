//! External converter and ownership tools

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use herbie_core::constants::{PREVIEW_QUALITY, PREVIEW_RESIZE, RAW_FORMAT_EXTENSION};
use herbie_core::PreviewConfig;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: String,
        stdout: String,
        stderr: String,
    },
}

/// Produces previews and hands them to the serving user.
#[async_trait]
pub trait PreviewTool: Send + Sync {
    /// Write a downscaled preview of `source` to `artifact`.
    async fn convert(&self, source: &Path, artifact: &Path) -> Result<(), ConversionError>;

    /// Change ownership of a freshly written preview.
    async fn change_owner(&self, artifact: &Path) -> Result<(), ConversionError>;
}

/// ImageMagick `convert` plus `chown`, run as child processes.
#[derive(Debug, Clone)]
pub struct ImageMagickTool {
    convert_path: String,
    chown_path: String,
    owner: Option<String>,
}

impl ImageMagickTool {
    pub fn new(convert_path: String, chown_path: String, owner: Option<String>) -> Self {
        Self {
            convert_path,
            chown_path,
            owner,
        }
    }

    pub fn from_config(config: &PreviewConfig) -> Self {
        Self::new(
            config.convert_path.clone(),
            config.chown_path.clone(),
            config.owner.clone(),
        )
    }

    /// Input argument for the converter; raw files get an explicit `cr2:` format hint.
    pub fn input_argument(source: &Path) -> OsString {
        let is_raw = source
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(RAW_FORMAT_EXTENSION));

        if is_raw {
            let mut arg = OsString::from(format!("{}:", RAW_FORMAT_EXTENSION));
            arg.push(source.as_os_str());
            arg
        } else {
            source.as_os_str().to_os_string()
        }
    }

    pub fn convert_args(source: &Path, artifact: &Path) -> Vec<OsString> {
        vec![
            Self::input_argument(source),
            OsString::from("-resize"),
            OsString::from(PREVIEW_RESIZE),
            OsString::from("-quality"),
            OsString::from(PREVIEW_QUALITY),
            artifact.as_os_str().to_os_string(),
        ]
    }
}

#[async_trait]
impl PreviewTool for ImageMagickTool {
    async fn convert(&self, source: &Path, artifact: &Path) -> Result<(), ConversionError> {
        run(&self.convert_path, &Self::convert_args(source, artifact)).await
    }

    async fn change_owner(&self, artifact: &Path) -> Result<(), ConversionError> {
        let Some(owner) = &self.owner else {
            return Ok(());
        };
        let args = vec![OsString::from(owner), artifact.as_os_str().to_os_string()];
        run(&self.chown_path, &args).await
    }
}

async fn run(program: &str, args: &[OsString]) -> Result<(), ConversionError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| ConversionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ConversionError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
