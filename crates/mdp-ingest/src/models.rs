//! Core data types for channel ingestion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remote media attachment descriptor carried by a message.
///
/// Only a pointer; bytes are fetched by the media store when the owning
/// channel is media-eligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Download URL for the attachment
    pub url: String,
    /// File extension hint (e.g. "jpg"); used for the on-disk name
    pub ext: String,
}

/// A message fetched from a remote channel.
///
/// Ephemeral: exists only between fetch and conversion to [`Record`].
/// Identifiers are assigned by the remote source and are unique and
/// strictly increasing within a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub channel_id: String,
    pub id: i64,
    pub text: Option<String>,
    pub date: DateTime<Utc>,
    pub media: Option<MediaRef>,
}

/// The persisted, flattened form of one ingested message.
///
/// Serialized as one CSV row in the record log; the field order here is the
/// column order of the log and must not change. Append-only: once written a
/// record is never mutated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub channel_title: String,
    pub channel_username: String,
    pub message_id: i64,
    /// Empty string when the source message carried no text
    pub message_text: String,
    /// RFC 3339 timestamp
    pub date: String,
    /// Absent unless the channel is media-eligible, the message carried
    /// media, and the download succeeded
    pub media_path: Option<String>,
}

impl Record {
    /// Flatten a message into its persisted form.
    pub fn from_message(
        channel_title: &str,
        message: &Message,
        media_path: Option<String>,
    ) -> Self {
        Self {
            channel_title: channel_title.to_string(),
            channel_username: message.channel_id.clone(),
            message_id: message.id,
            message_text: message.text.clone().unwrap_or_default(),
            date: message.date.to_rfc3339(),
            media_path,
        }
    }
}
