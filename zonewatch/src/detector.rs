//! Detector boundary. The model is a black box: frame in, detections
//! out. A failed per-frame detection is logged by the caller and the
//! frame skipped; only a failed load is fatal.

use std::fs;
use std::path::Path;

use anyhow::Context;
use image::RgbImage;
use zonewatch_common::detection::Detection;

pub trait Detector {
    fn detect(&mut self, frame: &RgbImage) -> anyhow::Result<Vec<Detection>>;
}

/// Replays detections from a serde_json sidecar file, the interchange
/// format produced by an external model run. Used for static-image mode.
pub struct JsonDetector {
    detections: Vec<Detection>,
}

impl JsonDetector {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read detections file {path:?}"))?;
        let detections: Vec<Detection> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse detections file {path:?}"))?;
        Ok(Self { detections })
    }
}

impl Detector for JsonDetector {
    fn detect(&mut self, _frame: &RgbImage) -> anyhow::Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }
}
