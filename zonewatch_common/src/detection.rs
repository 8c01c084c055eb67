//! Detection data model shared between the detector boundary and the
//! frame loop. Detections are produced fresh every frame and discarded
//! once the frame's rendering completes.

use serde::{Deserialize, Serialize};

/// Class label the zone logic reacts to. All other classes are drawn
/// but never evaluated for danger/proximity.
pub const PERSON_CLASS: &str = "person";

/// Default confidence threshold (60%).
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.6;

/// Axis-aligned box in source-frame pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Reflect the box horizontally within a frame of the given width.
    /// Used to correct detections when the active camera is front-facing
    /// and the feed is rendered mirrored.
    pub fn mirror_horizontal(&self, frame_width: f32) -> Self {
        Self {
            x: frame_width - self.x - self.width,
            ..*self
        }
    }
}

/// One output of the external object-detection model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    pub confidence: f32,
    pub bbox: BBox,
}

impl Detection {
    pub fn new(class_name: impl Into<String>, confidence: f32, bbox: BBox) -> Self {
        Self {
            class_name: class_name.into(),
            confidence,
            bbox,
        }
    }

    pub fn is_person(&self) -> bool {
        self.class_name == PERSON_CLASS
    }
}

/// Keep only detections at or above the confidence threshold.
///
/// Pure and idempotent: filtering an already-filtered list with the same
/// threshold yields the same list. The threshold may change between
/// frames without side effects.
pub fn filter_by_confidence(detections: Vec<Detection>, min_confidence: f32) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|det| det.confidence >= min_confidence)
        .collect()
}

/// Deduplicated class labels in first-occurrence order. Feeds the results
/// panel and the informational voice phrase.
pub fn unique_classes(detections: &[Detection]) -> Vec<&str> {
    let mut seen = Vec::new();
    for det in detections {
        if !seen.contains(&det.class_name.as_str()) {
            seen.push(det.class_name.as_str());
        }
    }
    seen
}
