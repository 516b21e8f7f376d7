//! Detection result storage
//!
//! The `object_detections` table is keyed by image id. Dedup here is an
//! existence check before insert rather than a cursor: the table is queried
//! by key, not iterated, so a checkpoint would buy nothing.

use super::models::Detection;
use super::Result;
use sqlx::PgPool;
use tracing::{debug, info};

/// Existence-checked writer for detection rows
pub struct DetectionStorage {
    pool: PgPool,
}

impl DetectionStorage {
    /// Create new storage over a connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether any detection rows exist for this image
    pub async fn exists(&self, image_id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM object_detections WHERE image_id = $1)"#,
        )
        .bind(image_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert detections for an image unless rows for it already exist.
    ///
    /// Returns the number of rows inserted (0 when the image was already
    /// processed).
    pub async fn store_new(&self, image_id: &str, detections: &[Detection]) -> Result<u64> {
        if self.exists(image_id).await? {
            debug!(image_id, "detections already stored, skipping insert");
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for detection in detections {
            sqlx::query(
                r#"
                INSERT INTO object_detections
                    (image_id, x_min, y_min, x_max, y_max, confidence, label)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&detection.image_id)
            .bind(detection.x_min)
            .bind(detection.y_min)
            .bind(detection.x_max)
            .bind(detection.y_max)
            .bind(detection.confidence)
            .bind(&detection.label)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(image_id, rows = detections.len(), "detections stored");
        Ok(detections.len() as u64)
    }
}
