//! Static channel registry
//!
//! Channels are fixed for the process lifetime and come from configuration;
//! there is no dynamic discovery.

use crate::config::IngestConfig;
use serde::{Deserialize, Serialize};

/// One configured channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique channel username
    pub id: String,
    /// Human-readable display title
    pub title: String,
    /// Whether media attachments are captured for this channel
    pub media_eligible: bool,
}

/// Ordered set of known channels with capability flags
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    channels: Vec<Channel>,
}

impl ChannelRegistry {
    /// Build the registry from configuration.
    ///
    /// Channel entries are "username" or "username=Display Title"; the title
    /// falls back to the username. Registry order is configuration order and
    /// is the order channels are processed in.
    pub fn from_config(config: &IngestConfig) -> Self {
        let channels = config
            .channels
            .iter()
            .map(|entry| {
                let (id, title) = match entry.split_once('=') {
                    Some((id, title)) => (id.trim(), title.trim()),
                    None => (entry.trim(), entry.trim()),
                };
                Channel {
                    id: id.to_string(),
                    title: title.to_string(),
                    media_eligible: config.media_channels.iter().any(|m| m == id),
                }
            })
            .collect();

        Self { channels }
    }

    /// Iterate channels in registry order
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    /// Look up a channel by username
    pub fn get(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Whether the given channel captures media
    pub fn is_media_eligible(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| c.media_eligible)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> IngestConfig {
        IngestConfig {
            channels: vec![
                "doctorset=Doctors Ethiopia".to_string(),
                "chemed123".to_string(),
            ],
            media_channels: vec!["chemed123".to_string()],
            ..IngestConfig::default()
        }
    }

    #[test]
    fn test_titled_and_untitled_entries() {
        let registry = ChannelRegistry::from_config(&test_config());
        assert_eq!(registry.len(), 2);

        let doctors = registry.get("doctorset").unwrap();
        assert_eq!(doctors.title, "Doctors Ethiopia");

        let chemed = registry.get("chemed123").unwrap();
        assert_eq!(chemed.title, "chemed123");
    }

    #[test]
    fn test_media_eligibility() {
        let registry = ChannelRegistry::from_config(&test_config());
        assert!(registry.is_media_eligible("chemed123"));
        assert!(!registry.is_media_eligible("doctorset"));
        assert!(!registry.is_media_eligible("unknown"));
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry = ChannelRegistry::from_config(&test_config());
        let ids: Vec<&str> = registry.channels().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["doctorset", "chemed123"]);
    }
}
