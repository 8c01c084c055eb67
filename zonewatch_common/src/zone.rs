//! Per-frame zone evaluation: is a person inside the danger zone, and if
//! not, how close is the nearest one.

use crate::detection::Detection;
use crate::geometry::VideoRect;

/// Frame-level classification relative to the ROI. Derived fresh each
/// frame, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneState {
    /// At least one person detection has its center inside the ROI.
    Danger,
    /// No person inside, but at least one person exists; carries the
    /// minimum center-to-ROI-center distance.
    Proximity(f32),
    /// No person detections at all, or ROI inactive.
    Idle,
}

impl ZoneState {
    pub fn is_danger(&self) -> bool {
        matches!(self, ZoneState::Danger)
    }
}

/// Zone-level state plus a per-detection danger flag parallel to the
/// input slice, so every in-zone person is individually highlighted.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneEvaluation {
    pub state: ZoneState,
    pub in_zone: Vec<bool>,
}

impl ZoneEvaluation {
    fn idle(len: usize) -> Self {
        Self {
            state: ZoneState::Idle,
            in_zone: vec![false; len],
        }
    }
}

/// Evaluate filtered detections against the mapped ROI.
///
/// Only class "person" participates. Containment is center-point based
/// and boundary-inclusive. The scan does not stop at the first hit: all
/// in-zone persons are flagged for rendering, though the zone-level state
/// is `Danger` as soon as one qualifies.
pub fn evaluate(detections: &[Detection], roi: Option<&VideoRect>) -> ZoneEvaluation {
    let Some(roi) = roi else {
        return ZoneEvaluation::idle(detections.len());
    };

    let (center_x, center_y) = roi.center();
    let mut in_zone = vec![false; detections.len()];
    let mut danger = false;
    let mut min_distance: Option<f32> = None;

    for (i, det) in detections.iter().enumerate() {
        if !det.is_person() {
            continue;
        }
        let (cx, cy) = det.bbox.center();

        let dist = ((cx - center_x).powi(2) + (cy - center_y).powi(2)).sqrt();
        min_distance = Some(min_distance.map_or(dist, |d: f32| d.min(dist)));

        if roi.contains(cx, cy) {
            in_zone[i] = true;
            danger = true;
        }
    }

    let state = if danger {
        ZoneState::Danger
    } else if let Some(dist) = min_distance {
        ZoneState::Proximity(dist)
    } else {
        ZoneState::Idle
    };

    ZoneEvaluation { state, in_zone }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BBox;

    fn roi() -> VideoRect {
        VideoRect {
            x: 200.0,
            y: 100.0,
            width: 160.0,
            height: 120.0,
        }
    }

    fn person(x: f32, y: f32, w: f32, h: f32) -> Detection {
        Detection::new("person", 0.9, BBox::new(x, y, w, h))
    }

    #[test]
    fn test_person_center_inside_is_danger() {
        // bbox (190,90,40,40) has center (210,110), inside the mapped ROI.
        let dets = vec![person(190.0, 90.0, 40.0, 40.0)];
        let eval = evaluate(&dets, Some(&roi()));
        assert_eq!(eval.state, ZoneState::Danger);
        assert_eq!(eval.in_zone, vec![true]);
    }

    #[test]
    fn test_center_on_corner_is_danger() {
        // Center exactly on the ROI's top-left corner: inclusive, inside.
        let dets = vec![person(180.0, 80.0, 40.0, 40.0)]; // center (200,100)
        let eval = evaluate(&dets, Some(&roi()));
        assert_eq!(eval.state, ZoneState::Danger);
    }

    #[test]
    fn test_person_outside_reports_proximity() {
        // ROI center is (280,160); person center at (480,160) → dist 200.
        let dets = vec![person(460.0, 140.0, 40.0, 40.0)];
        let eval = evaluate(&dets, Some(&roi()));
        assert_eq!(eval.state, ZoneState::Proximity(200.0));
        assert_eq!(eval.in_zone, vec![false]);
    }

    #[test]
    fn test_proximity_takes_minimum_over_persons() {
        let dets = vec![
            person(460.0, 140.0, 40.0, 40.0), // dist 200
            person(360.0, 140.0, 40.0, 40.0), // dist 100
        ];
        let eval = evaluate(&dets, Some(&roi()));
        assert_eq!(eval.state, ZoneState::Proximity(100.0));
    }

    #[test]
    fn test_non_person_classes_never_trigger() {
        // A dog sitting dead-center in the ROI stays Idle.
        let dets = vec![Detection::new(
            "dog",
            0.99,
            BBox::new(260.0, 140.0, 40.0, 40.0),
        )];
        let eval = evaluate(&dets, Some(&roi()));
        assert_eq!(eval.state, ZoneState::Idle);
        assert_eq!(eval.in_zone, vec![false]);
    }

    #[test]
    fn test_all_in_zone_persons_are_flagged() {
        let dets = vec![
            person(260.0, 140.0, 40.0, 40.0), // inside
            person(460.0, 140.0, 40.0, 40.0), // outside
            person(240.0, 120.0, 40.0, 40.0), // inside
        ];
        let eval = evaluate(&dets, Some(&roi()));
        assert_eq!(eval.state, ZoneState::Danger);
        assert_eq!(eval.in_zone, vec![true, false, true]);
    }

    #[test]
    fn test_inactive_roi_is_idle() {
        let dets = vec![person(260.0, 140.0, 40.0, 40.0)];
        let eval = evaluate(&dets, None);
        assert_eq!(eval.state, ZoneState::Idle);
        assert_eq!(eval.in_zone, vec![false]);
    }

    #[test]
    fn test_no_detections_is_idle() {
        let eval = evaluate(&[], Some(&roi()));
        assert_eq!(eval.state, ZoneState::Idle);
        assert!(eval.in_zone.is_empty());
    }
}
