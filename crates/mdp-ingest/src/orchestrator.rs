//! Ingestion orchestrator
//!
//! Drives the per-channel fetch/persist/checkpoint cycle. Channels are
//! processed one at a time in registry order; a channel failure is recorded
//! and the run moves on, so one channel can never abort the others.
//!
//! Ordering invariant: a record is appended to the log before the channel
//! checkpoint advances to its id. The checkpoint at rest therefore always
//! names a record already on durable storage; a crash between the two steps
//! re-delivers at most one message, which the next run re-appends and the
//! cleaner deduplicates.

use crate::checkpoint::{CheckpointStore, PersistenceError};
use crate::media::MediaStore;
use crate::models::{Message, Record};
use crate::registry::{Channel, ChannelRegistry};
use crate::sink::{CsvRecordSink, WriteError};
use crate::source::{MessageSource, SourceError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Channel-fatal errors; each maps to one stage of the per-message cycle.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("record write error: {0}")]
    Write(#[from] WriteError),

    #[error("checkpoint persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Terminal state of one channel after a run
#[derive(Debug)]
pub enum ChannelOutcome {
    /// Source exhausted without error
    Done { processed: u64 },
    /// Channel aborted; records appended before the failure stay durable
    /// and the checkpoint reflects the last of them
    Failed { processed: u64, error: ChannelError },
}

impl ChannelOutcome {
    /// Messages durably recorded for this channel during the run
    pub fn processed(&self) -> u64 {
        match self {
            ChannelOutcome::Done { processed } => *processed,
            ChannelOutcome::Failed { processed, .. } => *processed,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, ChannelOutcome::Done { .. })
    }
}

/// Per-channel outcome plus the channel it belongs to
#[derive(Debug)]
pub struct ChannelReport {
    pub channel_id: String,
    pub outcome: ChannelOutcome,
}

/// Outcome of a whole run, one entry per configured channel
#[derive(Debug, Default)]
pub struct RunReport {
    pub channels: Vec<ChannelReport>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.channels.iter().filter(|c| c.outcome.is_done()).count()
    }

    pub fn failed(&self) -> usize {
        self.channels.len() - self.completed()
    }

    /// Total records appended across all channels
    pub fn records_written(&self) -> u64 {
        self.channels.iter().map(|c| c.outcome.processed()).sum()
    }

    /// True when every channel finished without error
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

/// Ingestion orchestrator
///
/// The checkpoint store is optional: `None` degrades to always starting
/// from zero through the same code path, with nothing persisted between
/// runs.
pub struct IngestOrchestrator<S: MessageSource> {
    registry: ChannelRegistry,
    source: S,
    sink: CsvRecordSink,
    media: MediaStore,
    checkpoints: Option<CheckpointStore>,
    fetch_limit: usize,
}

impl<S: MessageSource> IngestOrchestrator<S> {
    /// Create a new orchestrator
    pub fn new(
        registry: ChannelRegistry,
        source: S,
        sink: CsvRecordSink,
        media: MediaStore,
        checkpoints: Option<CheckpointStore>,
        fetch_limit: usize,
    ) -> Self {
        Self {
            registry,
            source,
            sink,
            media,
            checkpoints,
            fetch_limit,
        }
    }

    /// Run one ingestion pass over every configured channel.
    ///
    /// Never returns an error: failures are captured per channel in the
    /// report and logged.
    pub async fn run(&mut self) -> RunReport {
        let channels: Vec<Channel> = self.registry.channels().cloned().collect();
        info!(channels = channels.len(), "ingestion run started");

        let mut report = RunReport::default();

        for channel in channels {
            let outcome = self.run_channel(&channel).await;
            match &outcome {
                ChannelOutcome::Done { processed } => {
                    info!(channel = %channel.id, processed, "channel done");
                },
                ChannelOutcome::Failed { processed, error } => {
                    error!(
                        channel = %channel.id,
                        processed,
                        error = %error,
                        "channel failed, continuing with next"
                    );
                },
            }
            report.channels.push(ChannelReport {
                channel_id: channel.id.clone(),
                outcome,
            });
        }

        info!(
            completed = report.completed(),
            failed = report.failed(),
            records = report.records_written(),
            "ingestion run finished"
        );

        report
    }

    /// Process one channel to exhaustion or first fatal error.
    async fn run_channel(&mut self, channel: &Channel) -> ChannelOutcome {
        let mut cursor = self
            .checkpoints
            .as_ref()
            .and_then(|store| store.get(&channel.id))
            .unwrap_or(0);
        let mut processed = 0u64;

        info!(channel = %channel.id, cursor, "channel ingestion started");

        loop {
            let batch = match self
                .source
                .fetch(&channel.id, cursor, self.fetch_limit)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    return ChannelOutcome::Failed {
                        processed,
                        error: e.into(),
                    }
                },
            };

            if batch.is_empty() {
                return ChannelOutcome::Done { processed };
            }

            for message in batch {
                if let Err(error) = self.ingest_message(channel, &message).await {
                    return ChannelOutcome::Failed { processed, error };
                }
                processed += 1;
                cursor = message.id;
            }
        }
    }

    /// Persist one message: media (best effort), record, then checkpoint.
    async fn ingest_message(
        &mut self,
        channel: &Channel,
        message: &Message,
    ) -> Result<(), ChannelError> {
        let media_path = match (&message.media, channel.media_eligible) {
            (Some(media), true) => {
                match self.media.store(&channel.id, message.id, media).await {
                    Ok(path) => Some(path),
                    Err(e) => {
                        // Media loss does not lose the message: the record
                        // is still written, without a media reference.
                        warn!(
                            channel = %channel.id,
                            message_id = message.id,
                            error = %e,
                            "media download failed, recording message without media"
                        );
                        None
                    },
                }
            },
            _ => None,
        };

        let record = Record::from_message(&channel.title, message, media_path);
        self.sink.append(&record)?;

        if let Some(store) = self.checkpoints.as_mut() {
            store.set(&channel.id, message.id)?;
        }

        debug!(channel = %channel.id, message_id = message.id, "message ingested");
        Ok(())
    }
}
