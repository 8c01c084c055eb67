//! Maps the zone evaluation to the ROI's visual style: a continuous
//! hue/opacity interpolation while a person approaches, a fixed pulsing
//! red state once one is inside.
//!
//! Pure function of the current frame. There is deliberately no
//! hysteresis; rapid flicker between label bands near a threshold is
//! accepted behavior.

use std::fmt;

use crate::zone::ZoneState;

/// Distance at which a person is considered fully safe, in units of the
/// ROI's proximity radius.
const SAFE_ZONE_RADII: f32 = 4.0;

/// Hue band edges for the proximity labels (HSL wheel, 0=red..120=green).
const IMMINENT_HUE: f32 = 40.0;
const CAUTION_HUE: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLabel {
    DangerDetected,
    DangerImminent,
    Caution,
    SafeZone,
}

impl AlertLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLabel::DangerDetected => "danger detected",
            AlertLabel::DangerImminent => "danger imminent",
            AlertLabel::Caution => "caution",
            AlertLabel::SafeZone => "safe zone",
        }
    }
}

impl fmt::Display for AlertLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ROI styling for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// HSL hue of the border, 0 (red) to 120 (green).
    pub border_hue: f32,
    /// Fill opacity; rises as a person approaches.
    pub fill_alpha: f32,
    pub label: AlertLabel,
    pub pulsing: bool,
}

/// Derive the ROI visual state from the zone evaluation. `radius` is the
/// ROI's proximity radius (its edge, in the distance unit used by
/// `ZoneState::Proximity`).
pub fn visual_state(state: ZoneState, radius: f32) -> VisualState {
    match state {
        ZoneState::Danger => VisualState {
            border_hue: 0.0,
            fill_alpha: 0.4,
            label: AlertLabel::DangerDetected,
            pulsing: true,
        },
        ZoneState::Proximity(distance) => {
            let danger_zone = radius;
            let safe_zone = radius * SAFE_ZONE_RADII;
            // 0 at/inside the ROI edge, 1 at/beyond four radii out.
            let factor = ((distance - danger_zone) / (safe_zone - danger_zone)).clamp(0.0, 1.0);

            let hue = factor * 120.0;
            let alpha = 0.1 + (1.0 - factor) * 0.2;
            let label = if hue < IMMINENT_HUE {
                AlertLabel::DangerImminent
            } else if hue < CAUTION_HUE {
                AlertLabel::Caution
            } else {
                AlertLabel::SafeZone
            };

            VisualState {
                border_hue: hue,
                fill_alpha: alpha,
                label,
                pulsing: false,
            }
        }
        ZoneState::Idle => VisualState {
            border_hue: 120.0,
            fill_alpha: 0.1,
            label: AlertLabel::SafeZone,
            pulsing: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_is_fixed_red_pulsing() {
        let vs = visual_state(ZoneState::Danger, 70.0);
        assert_eq!(vs.border_hue, 0.0);
        assert_eq!(vs.label, AlertLabel::DangerDetected);
        assert!(vs.pulsing);
    }

    #[test]
    fn test_idle_is_green_safe() {
        let vs = visual_state(ZoneState::Idle, 70.0);
        assert_eq!(vs.border_hue, 120.0);
        assert_eq!(vs.fill_alpha, 0.1);
        assert_eq!(vs.label, AlertLabel::SafeZone);
        assert!(!vs.pulsing);
    }

    #[test]
    fn test_proximity_at_edge_is_fully_red() {
        // Distance equal to the radius: factor 0.
        let vs = visual_state(ZoneState::Proximity(70.0), 70.0);
        assert_eq!(vs.border_hue, 0.0);
        assert!((vs.fill_alpha - 0.3).abs() < 1e-6);
        assert_eq!(vs.label, AlertLabel::DangerImminent);
        assert!(!vs.pulsing);
    }

    #[test]
    fn test_proximity_beyond_safe_zone_clamps_green() {
        // Distance past 4x radius: factor clamps to 1.
        let vs = visual_state(ZoneState::Proximity(1000.0), 70.0);
        assert_eq!(vs.border_hue, 120.0);
        assert!((vs.fill_alpha - 0.1).abs() < 1e-6);
        assert_eq!(vs.label, AlertLabel::SafeZone);
    }

    #[test]
    fn test_proximity_midpoint_is_caution() {
        // radius 100: danger at 100, safe at 400. Distance 250 → factor
        // 0.5 → hue 60, inside the caution band [40, 80).
        let vs = visual_state(ZoneState::Proximity(250.0), 100.0);
        assert_eq!(vs.border_hue, 60.0);
        assert_eq!(vs.label, AlertLabel::Caution);
        assert!((vs.fill_alpha - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_distance_inside_edge_clamps_to_zero() {
        // Closer than the radius still clamps factor to 0, not negative.
        let vs = visual_state(ZoneState::Proximity(10.0), 100.0);
        assert_eq!(vs.border_hue, 0.0);
        assert!((vs.fill_alpha - 0.3).abs() < 1e-6);
    }
}
