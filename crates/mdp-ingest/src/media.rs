//! Channel-scoped media storage
//!
//! Downloads message attachments and persists them under
//! `<media_root>/<channel>/<message_id>.<ext>`. Message ids are unique per
//! channel, so the name cannot collide across messages.

use crate::config::ApiConfig;
use crate::models::MediaRef;
use mdp_common::checksum::{sha256_bytes, sha256_file};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Errors from media transfer or persistence. Non-fatal for the parent
/// record: the orchestrator logs the failure and persists the record
/// without a media reference.
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0} downloading media")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writer for binary attachments, one directory per channel
pub struct MediaStore {
    client: Client,
    root: PathBuf,
    max_retries: u32,
}

impl MediaStore {
    /// Create a new media store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, api: &ApiConfig) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(api.timeout())
            .user_agent("mdp-ingest/0.1")
            .build()?;

        Ok(Self {
            client,
            root: root.into(),
            max_retries: api.max_retries,
        })
    }

    /// Download an attachment and persist it, returning the stored path.
    ///
    /// Ingestion is at-least-once, so the target file may already exist
    /// from an earlier pass. When the existing content matches the
    /// downloaded bytes the file is left untouched; otherwise it is
    /// replaced and the divergence logged.
    pub async fn store(
        &self,
        channel_id: &str,
        message_id: i64,
        media: &MediaRef,
    ) -> Result<String, MediaError> {
        let dir = self.root.join(channel_id);
        tokio::fs::create_dir_all(&dir).await?;

        let ext = sanitize_ext(&media.ext);
        let target = dir.join(format!("{}.{}", message_id, ext));

        let bytes = self.download_with_retry(&media.url).await?;
        let digest = sha256_bytes(&bytes);

        if target.exists() {
            match sha256_file(&target) {
                Ok(existing) if existing == digest => {
                    debug!(
                        channel = channel_id,
                        message_id,
                        path = %target.display(),
                        "media already stored, skipping rewrite"
                    );
                    return Ok(target.to_string_lossy().into_owned());
                },
                Ok(_) => {
                    warn!(
                        channel = channel_id,
                        message_id,
                        path = %target.display(),
                        "existing media diverges from source, replacing"
                    );
                },
                Err(e) => {
                    warn!(
                        channel = channel_id,
                        message_id,
                        error = %e,
                        "could not hash existing media, replacing"
                    );
                },
            }
        }

        tokio::fs::write(&target, &bytes).await?;
        info!(
            channel = channel_id,
            message_id,
            bytes = bytes.len(),
            path = %target.display(),
            "media stored"
        );

        Ok(target.to_string_lossy().into_owned())
    }

    /// Download URL with retry and exponential backoff
    async fn download_with_retry(&self, url: &str) -> Result<Vec<u8>, MediaError> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.download(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        url,
                        error = %e,
                        "media download attempt failed"
                    );
                    last_error = Some(e);

                    if attempt < self.max_retries {
                        let backoff_secs = 2u64.pow(attempt);
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    }
                },
            }
        }

        // max_retries >= 1, so at least one attempt ran and set last_error
        Err(last_error.unwrap_or(MediaError::Status(0)))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, MediaError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(MediaError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Keep extensions to a safe alphanumeric token; anything else becomes "bin".
fn sanitize_ext(ext: &str) -> String {
    let trimmed = ext.trim_start_matches('.');
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        trimmed.to_ascii_lowercase()
    } else {
        "bin".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_ext() {
        assert_eq!(sanitize_ext("jpg"), "jpg");
        assert_eq!(sanitize_ext(".PNG"), "png");
        assert_eq!(sanitize_ext("../../etc/passwd"), "bin");
        assert_eq!(sanitize_ext(""), "bin");
    }
}
