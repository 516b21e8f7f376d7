//! Object detection over ingested media
//!
//! Walks the media directory the ingester populates, submits each image to
//! an inference backend, and stores sanitized detections in PostgreSQL.
//! Rows are keyed by image id with an existence check before insert, so the
//! pipeline can be re-run over the same media without duplicating results.
//!
//! # Architecture
//!
//! - **config**: MDP_DETECT_* environment configuration
//! - **models**: detection types and box sanitization
//! - **detector**: `Detector` trait plus the HTTP inference client
//! - **storage**: existence-checked inserts into `object_detections`
//! - **pipeline**: directory walk and per-image orchestration

pub mod config;
pub mod detector;
pub mod models;
pub mod pipeline;
pub mod storage;

use thiserror::Error;

/// Errors from the detection pipeline
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0} from inference backend")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for detection operations
pub type Result<T> = std::result::Result<T, DetectError>;

pub use config::DetectConfig;
pub use detector::{Detector, HttpDetector};
pub use models::{Detection, RawDetection};
pub use pipeline::{DetectStats, DetectionPipeline};
pub use storage::DetectionStorage;
