//! Detection pipeline orchestration
//!
//! Walks the channel-scoped media tree, runs the detector on every image
//! not yet in the results table, and stores sanitized boxes. A failure on
//! one image is logged and the walk continues.

use super::detector::Detector;
use super::models::{sanitize, Detection};
use super::storage::DetectionStorage;
use super::{DetectConfig, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Counters reported after a pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectStats {
    pub images_seen: u64,
    pub skipped_existing: u64,
    pub no_detections: u64,
    pub failed: u64,
    pub detections_stored: u64,
}

/// Object detection pipeline
pub struct DetectionPipeline<D: Detector> {
    detector: D,
    storage: DetectionStorage,
    config: DetectConfig,
}

impl<D: Detector> DetectionPipeline<D> {
    /// Create a new pipeline
    pub fn new(detector: D, storage: DetectionStorage, config: DetectConfig) -> Self {
        Self {
            detector,
            storage,
            config,
        }
    }

    /// Run one detection pass over the whole media tree.
    pub async fn run(&self) -> Result<DetectStats> {
        info!(media_root = %self.config.media_root.display(), "detection pass started");

        let images = collect_images(&self.config.media_root)?;
        let mut stats = DetectStats {
            images_seen: images.len() as u64,
            ..DetectStats::default()
        };

        for (image_id, path) in images {
            match self.process_image(&image_id, &path).await {
                Ok(ImageOutcome::AlreadyStored) => stats.skipped_existing += 1,
                Ok(ImageOutcome::NoDetections) => stats.no_detections += 1,
                Ok(ImageOutcome::Stored(rows)) => stats.detections_stored += rows,
                Err(e) => {
                    warn!(image_id = %image_id, error = %e, "image failed, continuing with next");
                    stats.failed += 1;
                },
            }
        }

        info!(
            seen = stats.images_seen,
            skipped = stats.skipped_existing,
            empty = stats.no_detections,
            failed = stats.failed,
            stored = stats.detections_stored,
            "detection pass finished"
        );

        Ok(stats)
    }

    async fn process_image(&self, image_id: &str, path: &Path) -> Result<ImageOutcome> {
        if self.storage.exists(image_id).await? {
            debug!(image_id, "already processed");
            return Ok(ImageOutcome::AlreadyStored);
        }

        let raw = self.detector.detect(path).await?;
        let kept = sanitize(raw, self.config.min_confidence);

        if kept.is_empty() {
            debug!(image_id, "no detections above threshold");
            return Ok(ImageOutcome::NoDetections);
        }

        let detections: Vec<Detection> = kept
            .into_iter()
            .map(|raw| Detection::from_raw(image_id, raw))
            .collect();

        let rows = self.storage.store_new(image_id, &detections).await?;
        Ok(ImageOutcome::Stored(rows))
    }
}

enum ImageOutcome {
    AlreadyStored,
    NoDetections,
    Stored(u64),
}

/// Enumerate image files under the channel-scoped media tree.
///
/// Image ids are `<channel>/<file name>`, matching the layout the ingester
/// writes; the listing is sorted so passes are deterministic.
pub fn collect_images(media_root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut images = Vec::new();

    let channels = match std::fs::read_dir(media_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(media_root = %media_root.display(), "media root missing, nothing to detect");
            return Ok(images);
        },
        Err(e) => return Err(e.into()),
    };

    for channel in channels {
        let channel = channel?;
        if !channel.file_type()?.is_dir() {
            continue;
        }
        let channel_name = channel.file_name().to_string_lossy().into_owned();

        for file in std::fs::read_dir(channel.path())? {
            let file = file?;
            let path = file.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()));
            if !is_image {
                continue;
            }

            let image_id = format!(
                "{}/{}",
                channel_name,
                file.file_name().to_string_lossy()
            );
            images.push((image_id, path));
        }
    }

    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_images_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let images = collect_images(&dir.path().join("nope")).unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn test_collect_images_channel_scoped_ids() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("chemed123")).unwrap();
        fs::create_dir_all(dir.path().join("lobelia4cosmetics")).unwrap();
        fs::write(dir.path().join("chemed123/101.jpg"), b"x").unwrap();
        fs::write(dir.path().join("lobelia4cosmetics/7.png"), b"x").unwrap();
        fs::write(dir.path().join("chemed123/notes.txt"), b"x").unwrap();
        // stray file at the root is not channel-scoped media
        fs::write(dir.path().join("orphan.jpg"), b"x").unwrap();

        let images = collect_images(dir.path()).unwrap();
        let ids: Vec<&str> = images.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["chemed123/101.jpg", "lobelia4cosmetics/7.png"]);
    }

    #[test]
    fn test_collect_images_is_sorted_and_case_insensitive_on_ext() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/2.JPG"), b"x").unwrap();
        fs::write(dir.path().join("a/1.jpeg"), b"x").unwrap();

        let images = collect_images(dir.path()).unwrap();
        let ids: Vec<&str> = images.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a/1.jpeg", "a/2.JPG"]);
    }
}
