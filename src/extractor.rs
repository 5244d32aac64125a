//! Adapter around the external extraction engine
//!
//! The engine is the `yt-dlp` executable, run as a child process that prints
//! the info document of a page as JSON without downloading anything. The
//! [`Extractor`] trait is the seam handlers depend on.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::error::ApiError;
use crate::model::{ExtractionResult, ValidatedUrl};

/// Failures of a single extraction call
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Engine exited unsuccessfully; carries its diagnostic output
    #[error("{0}")]
    Failed(String),

    #[error("Failed to parse extractor output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Extraction timed out after {0:?}")]
    TimedOut(Duration),
}

/// Resolves a page URL into the engine's info document
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &ValidatedUrl) -> Result<ExtractionResult, ExtractError>;
}

/// `yt-dlp` invoked as a child process
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Reports the engine version, used as a startup availability probe
    pub async fn version(&self) -> Result<String, ExtractError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            return Err(ExtractError::Failed(failure_message(&output.stderr)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn spawn_error(&self, source: io::Error) -> ExtractError {
        ExtractError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn extract(&self, url: &ValidatedUrl) -> Result<ExtractionResult, ExtractError> {
        let output = Command::new(&self.program)
            .args([
                "--dump-single-json",
                "--skip-download",
                "--quiet",
                "--no-warnings",
            ])
            .arg(url.as_str())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| self.spawn_error(source))?;

        if !output.status.success() {
            return Err(ExtractError::Failed(failure_message(&output.stderr)));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

fn failure_message(stderr: &[u8]) -> String {
    let message = String::from_utf8_lossy(stderr).trim().to_string();
    if message.is_empty() {
        "Extractor exited with an error".to_string()
    } else {
        message
    }
}

/// Runs one bounded extraction and reduces it to the direct media URL
///
/// Every failure, including a result without a media URL, becomes a
/// `video_url_extraction_error`. Nothing is retried.
pub async fn resolve_media_url(
    extractor: &dyn Extractor,
    url: &ValidatedUrl,
    timeout: Duration,
) -> Result<String, ApiError> {
    let result = match tokio::time::timeout(timeout, extractor.extract(url)).await {
        Ok(result) => result,
        Err(_) => Err(ExtractError::TimedOut(timeout)),
    };

    let info = result.map_err(|err| {
        tracing::warn!(url = %url, error = %err, "extraction failed");
        ApiError::extraction(err.to_string())
    })?;

    match info.media_url() {
        Some(media_url) => {
            tracing::info!(
                url = %url,
                extractor = info.extractor_key.as_deref().unwrap_or("-"),
                title = info.title.as_deref().unwrap_or("-"),
                "extraction succeeded"
            );
            Ok(media_url.to_string())
        }
        None => {
            tracing::warn!(url = %url, "extraction returned no media URL");
            Err(ApiError::extraction("No video URL found"))
        }
    }
}
