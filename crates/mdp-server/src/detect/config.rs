//! Detection pipeline configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Detection pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectConfig {
    /// Whether the pipeline runs at server startup
    pub enabled: bool,
    /// Root of the media directory written by the ingester
    pub media_root: PathBuf,
    /// Inference backend endpoint accepting raw image bytes
    pub inference_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Detections below this confidence are discarded
    pub min_confidence: f64,
}

impl DetectConfig {
    /// Load detection configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            enabled: std::env::var("MDP_DETECT_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            media_root: std::env::var("MDP_DETECT_MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/media")),
            inference_url: std::env::var("MDP_DETECT_INFERENCE_URL")
                .unwrap_or_else(|_| "http://localhost:9000/detect".to_string()),
            timeout_secs: std::env::var("MDP_DETECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            min_confidence: std::env::var("MDP_DETECT_MIN_CONFIDENCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.25),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.inference_url.is_empty() {
            anyhow::bail!("MDP_DETECT_INFERENCE_URL cannot be empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("MDP_DETECT_TIMEOUT_SECS must be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            anyhow::bail!(
                "MDP_DETECT_MIN_CONFIDENCE must be within [0, 1], got: {}",
                self.min_confidence
            );
        }
        Ok(())
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            media_root: PathBuf::from("./data/media"),
            inference_url: "http://localhost:9000/detect".to_string(),
            timeout_secs: 60,
            min_confidence: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(DetectConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        let mut config = DetectConfig::default();
        config.inference_url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let mut config = DetectConfig::default();
        config.min_confidence = 1.5;
        assert!(config.validate().is_err());
    }
}
