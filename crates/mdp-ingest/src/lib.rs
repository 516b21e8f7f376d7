//! MDP Ingest Library
//!
//! Resumable ingestion of medical Telegram-style channels into an
//! append-only record log.
//!
//! # Architecture
//!
//! - **config**: Environment-driven configuration (MDP_INGEST_* variables)
//! - **registry**: Static channel registry with media-eligibility flags
//! - **checkpoint**: Durable per-channel progress tracking (JSON file)
//! - **sink**: Append-only CSV record log with write-header-once semantics
//! - **media**: Channel-scoped media downloads with retry and dedup-by-digest
//! - **source**: `MessageSource` abstraction plus the HTTP gateway adapter
//! - **orchestrator**: Per-channel fetch/persist/checkpoint cycle with
//!   failure isolation
//! - **cleaner**: Batch normalization/deduplication of the record log
//!
//! # Example
//!
//! ```no_run
//! use mdp_ingest::{
//!     checkpoint::CheckpointStore, config::IngestConfig, media::MediaStore,
//!     orchestrator::IngestOrchestrator, registry::ChannelRegistry,
//!     sink::CsvRecordSink, source::HttpMessageSource,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::from_env()?;
//!     let registry = ChannelRegistry::from_config(&config);
//!     let source = HttpMessageSource::new(&config.api)?;
//!     let sink = CsvRecordSink::open(&config.paths.record_log)?;
//!     let media = MediaStore::new(&config.paths.media_root, &config.api)?;
//!     let checkpoints = Some(CheckpointStore::load(&config.paths.checkpoint_file)?);
//!
//!     let mut orchestrator =
//!         IngestOrchestrator::new(registry, source, sink, media, checkpoints, config.fetch_limit);
//!     let report = orchestrator.run().await;
//!     tracing::info!(records = report.records_written(), "run finished");
//!     Ok(())
//! }
//! ```

pub mod checkpoint;
pub mod cleaner;
pub mod config;
pub mod media;
pub mod models;
pub mod orchestrator;
pub mod registry;
pub mod sink;
pub mod source;

pub use checkpoint::{CheckpointStore, PersistenceError};
pub use cleaner::{CleanStats, DataCleaner};
pub use config::IngestConfig;
pub use media::{MediaError, MediaStore};
pub use models::{MediaRef, Message, Record};
pub use orchestrator::{ChannelError, ChannelOutcome, IngestOrchestrator, RunReport};
pub use registry::{Channel, ChannelRegistry};
pub use sink::{CsvRecordSink, WriteError};
pub use source::{HttpMessageSource, MessageSource, SourceError};
