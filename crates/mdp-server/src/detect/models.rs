//! Detection types and sanitization

use serde::{Deserialize, Serialize};

/// One bounding box as reported by the inference backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDetection {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub confidence: f64,
    pub label: String,
}

impl RawDetection {
    /// Box coordinates are non-negative and well ordered
    fn is_well_formed(&self) -> bool {
        self.x_min >= 0.0
            && self.y_min >= 0.0
            && self.x_max > self.x_min
            && self.y_max > self.y_min
    }
}

/// A sanitized detection bound to its source image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub image_id: String,
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub confidence: f64,
    pub label: String,
}

impl Detection {
    pub fn from_raw(image_id: &str, raw: RawDetection) -> Self {
        Self {
            image_id: image_id.to_string(),
            x_min: raw.x_min,
            y_min: raw.y_min,
            x_max: raw.x_max,
            y_max: raw.y_max,
            confidence: raw.confidence,
            label: raw.label,
        }
    }
}

/// Drop degenerate boxes and detections below the confidence floor.
pub fn sanitize(raw: Vec<RawDetection>, min_confidence: f64) -> Vec<RawDetection> {
    raw.into_iter()
        .filter(|d| d.is_well_formed() && d.confidence >= min_confidence)
        .collect()
}
