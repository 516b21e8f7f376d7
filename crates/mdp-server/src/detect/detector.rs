//! Inference backend client

use super::models::RawDetection;
use super::{DetectConfig, DetectError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use tracing::debug;

/// Abstraction over the object-detection backend.
///
/// The pipeline only needs boxes for an image on disk; how they are
/// produced (remote inference service, embedded runtime) stays behind
/// this trait.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, image: &Path) -> Result<Vec<RawDetection>>;
}

/// HTTP client for a detection inference service
///
/// Posts raw image bytes and expects a JSON array of boxes back.
pub struct HttpDetector {
    client: Client,
    url: String,
}

impl HttpDetector {
    /// Create a new detector client from configuration
    pub fn new(config: &DetectConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent("mdp-server/0.1")
            .build()?;

        Ok(Self {
            client,
            url: config.inference_url.clone(),
        })
    }
}

#[async_trait]
impl Detector for HttpDetector {
    async fn detect(&self, image: &Path) -> Result<Vec<RawDetection>> {
        let bytes = tokio::fs::read(image).await?;
        debug!(image = %image.display(), bytes = bytes.len(), "submitting image for detection");

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DetectError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}
