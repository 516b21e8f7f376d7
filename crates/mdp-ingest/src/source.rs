//! Message source abstraction and the HTTP gateway adapter
//!
//! The orchestrator only sees the [`MessageSource`] trait; the concrete
//! channel protocol lives behind it. The shipped adapter talks to a
//! channel-export HTTP gateway; a different protocol client slots in
//! without touching the orchestrator.

use crate::config::ApiConfig;
use crate::models::{MediaRef, Message};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors from the remote channel protocol. Channel-fatal for the current
/// pass; the next run resumes from the last durable checkpoint.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("rate limited by remote source")]
    RateLimited,

    #[error("HTTP status {0} from remote source")]
    Status(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Abstraction over the remote channel protocol.
///
/// `fetch` returns messages with ids strictly greater than `after_id`, in
/// ascending id order, at most `limit` of them, without skipping ids inside
/// the returned window. An empty batch means the channel is exhausted for
/// this pass; callers re-invoke with the new cursor for more.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch(
        &self,
        channel_id: &str,
        after_id: i64,
        limit: usize,
    ) -> Result<Vec<Message>, SourceError>;
}

/// Wire format of the channel-export gateway
#[derive(Debug, Deserialize)]
struct WireMessage {
    id: i64,
    #[serde(default)]
    text: Option<String>,
    date: DateTime<Utc>,
    #[serde(default)]
    media: Option<WireMedia>,
}

#[derive(Debug, Deserialize)]
struct WireMedia {
    url: String,
    #[serde(default)]
    ext: Option<String>,
}

impl WireMessage {
    fn into_message(self, channel_id: &str) -> Message {
        Message {
            channel_id: channel_id.to_string(),
            id: self.id,
            text: self.text,
            date: self.date,
            media: self.media.map(|m| MediaRef {
                url: m.url,
                ext: m.ext.unwrap_or_else(|| "bin".to_string()),
            }),
        }
    }
}

/// Adapter over the channel-export HTTP gateway
///
/// `GET {base}/channels/{id}/messages?after_id=&limit=` returning a JSON
/// array of messages. Window and ordering invariants are enforced locally
/// so a sloppy upstream cannot violate the [`MessageSource`] contract.
pub struct HttpMessageSource {
    client: Client,
    base_url: String,
}

impl HttpMessageSource {
    /// Create a new source adapter from gateway settings.
    pub fn new(api: &ApiConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(api.timeout())
            .user_agent("mdp-ingest/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MessageSource for HttpMessageSource {
    async fn fetch(
        &self,
        channel_id: &str,
        after_id: i64,
        limit: usize,
    ) -> Result<Vec<Message>, SourceError> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        let response = self
            .client
            .get(&url)
            .query(&[("after_id", after_id.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::UnknownChannel(channel_id.to_string()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let wire: Vec<WireMessage> = response.json().await?;
        let mut messages: Vec<Message> = wire
            .into_iter()
            .map(|w| w.into_message(channel_id))
            .collect();

        // Enforce the contract locally: strictly after the cursor, ascending,
        // unique, capped at the requested window size.
        messages.retain(|m| m.id > after_id);
        messages.sort_by_key(|m| m.id);
        messages.dedup_by_key(|m| m.id);
        messages.truncate(limit);

        debug!(
            channel = channel_id,
            after_id,
            count = messages.len(),
            "fetched message batch"
        );

        Ok(messages)
    }
}
