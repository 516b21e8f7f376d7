//! Ingestion configuration
//!
//! All knobs come from MDP_INGEST_* environment variables (a `.env` file is
//! honored). Configuration is constructed once and passed into component
//! constructors; no component reads the environment on its own.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Ordered channel entries, each "username" or "username=Display Title"
    pub channels: Vec<String>,
    /// Usernames of channels whose media attachments are also captured
    pub media_channels: Vec<String>,
    /// Maximum messages per fetch invocation
    pub fetch_limit: usize,
    /// When false the orchestrator runs without a checkpoint store and every
    /// run starts from zero
    pub checkpointing: bool,
    /// Remote gateway settings
    pub api: ApiConfig,
    /// On-disk layout
    pub paths: DataPaths,
}

/// Channel-export gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the channel-export HTTP gateway
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per remote transfer (fetch and media download)
    pub max_retries: u32,
}

/// On-disk data layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Append-only CSV record log
    pub record_log: PathBuf,
    /// JSON checkpoint file (channel username -> last processed id)
    pub checkpoint_file: PathBuf,
    /// Root directory for downloaded media, one subdirectory per channel
    pub media_root: PathBuf,
}

fn default_channels() -> Vec<String> {
    [
        "doctorset=Doctors Ethiopia",
        "chemed123=CheMed",
        "lobelia4cosmetics=Lobelia Cosmetics",
        "yetenaweg=Yetenaweg",
        "eahci=EAHCI",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_media_channels() -> Vec<String> {
    vec!["chemed123".to_string(), "lobelia4cosmetics".to_string()]
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl IngestConfig {
    /// Load ingestion configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let channels = std::env::var("MDP_INGEST_CHANNELS")
            .map(|raw| split_csv(&raw))
            .unwrap_or_else(|_| default_channels());

        let media_channels = std::env::var("MDP_INGEST_MEDIA_CHANNELS")
            .map(|raw| split_csv(&raw))
            .unwrap_or_else(|_| default_media_channels());

        let config = Self {
            channels,
            media_channels,
            fetch_limit: std::env::var("MDP_INGEST_FETCH_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            checkpointing: std::env::var("MDP_INGEST_CHECKPOINTING")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            api: ApiConfig {
                base_url: std::env::var("MDP_INGEST_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8081".to_string()),
                timeout_secs: std::env::var("MDP_INGEST_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
                max_retries: std::env::var("MDP_INGEST_MAX_RETRIES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3),
            },
            paths: DataPaths {
                record_log: std::env::var("MDP_INGEST_RECORD_LOG")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./data/records.csv")),
                checkpoint_file: std::env::var("MDP_INGEST_CHECKPOINT_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./data/checkpoints.json")),
                media_root: std::env::var("MDP_INGEST_MEDIA_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./data/media")),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.channels.is_empty() {
            anyhow::bail!("MDP_INGEST_CHANNELS cannot be empty");
        }
        if self.fetch_limit == 0 {
            anyhow::bail!("MDP_INGEST_FETCH_LIMIT must be greater than 0");
        }
        if self.api.base_url.is_empty() {
            anyhow::bail!("MDP_INGEST_API_URL cannot be empty");
        }
        if self.api.timeout_secs == 0 {
            anyhow::bail!("MDP_INGEST_API_TIMEOUT_SECS must be greater than 0");
        }
        if self.api.max_retries == 0 {
            anyhow::bail!("MDP_INGEST_MAX_RETRIES must be greater than 0");
        }

        let usernames: Vec<&str> = self
            .channels
            .iter()
            .map(|entry| entry.split_once('=').map_or(entry.as_str(), |(id, _)| id))
            .collect();
        for media_channel in &self.media_channels {
            if !usernames.contains(&media_channel.as_str()) {
                anyhow::bail!(
                    "MDP_INGEST_MEDIA_CHANNELS entry '{}' is not in MDP_INGEST_CHANNELS",
                    media_channel
                );
            }
        }

        Ok(())
    }
}

impl ApiConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            media_channels: default_media_channels(),
            fetch_limit: 100,
            checkpointing: true,
            api: ApiConfig {
                base_url: "http://localhost:8081".to_string(),
                timeout_secs: 30,
                max_retries: 3,
            },
            paths: DataPaths {
                record_log: PathBuf::from("./data/records.csv"),
                checkpoint_file: PathBuf::from("./data/checkpoints.json"),
                media_root: PathBuf::from("./data/media"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_is_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channels.len(), 5);
        assert_eq!(config.media_channels.len(), 2);
    }

    #[test]
    fn test_validation_empty_channels() {
        let mut config = IngestConfig::default();
        config.channels.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_fetch_limit() {
        let mut config = IngestConfig::default();
        config.fetch_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_media_channel() {
        let mut config = IngestConfig::default();
        config.media_channels.push("not-a-channel".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_media_channel_with_titled_entry() {
        // media channel names match the username part of "username=Title"
        let config = IngestConfig::default();
        assert!(config.media_channels.contains(&"chemed123".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_timeout_duration() {
        let config = IngestConfig::default();
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_split_csv_trims_and_skips_empty() {
        assert_eq!(split_csv(" a , b ,, c "), vec!["a", "b", "c"]);
    }
}
